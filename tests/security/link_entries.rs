//! Hard links and special files inside TAR archives.

use super::Sandbox;
use super::id;
use cuepack_core::PackError;
use cuepack_core::ViolationKind;
use cuepack_core::list_archive;
use cuepack_core::test_utils::TarTestBuilder;
use cuepack_core::test_utils::wav_bytes;
use std::io::Write;

#[test]
fn test_hardlink_to_outside_rejected() {
    let sandbox = Sandbox::new();
    let data = TarTestBuilder::new()
        .add_file("mypack/stop/a.wav", &wav_bytes(64))
        .add_hardlink("mypack/stop/b.wav", "/etc/passwd")
        .build();

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    assert!(err.validation_report().unwrap().has(ViolationKind::SymlinkNotAllowed));
    sandbox.assert_outside_untouched();
}

#[test]
fn test_hardlink_within_pack_rejected() {
    let sandbox = Sandbox::new();
    let data = TarTestBuilder::new()
        .add_file("mypack/stop/a.wav", &wav_bytes(64))
        .add_hardlink("mypack/stop/b.wav", "mypack/stop/a.wav")
        .build();

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    assert_eq!(
        err.validation_report().unwrap().count(ViolationKind::SymlinkNotAllowed),
        1
    );
}

#[test]
fn test_hardlink_listed_as_symlink() {
    let data = TarTestBuilder::new()
        .add_hardlink("mypack/stop/b.wav", "mypack/stop/a.wav")
        .build();
    let mut archive = tempfile::NamedTempFile::with_suffix(".tar").unwrap();
    archive.write_all(&data).unwrap();

    let manifest = list_archive(archive.path()).unwrap();
    assert_eq!(manifest.entries[0].kind, cuepack_core::EntryKind::Symlink);
}

#[test]
fn test_fifo_makes_archive_unreadable() {
    let sandbox = Sandbox::new();
    let data = TarTestBuilder::new()
        .add_file("mypack/stop/a.wav", &wav_bytes(64))
        .add_fifo("mypack/stop/pipe.wav")
        .build();

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    assert!(matches!(err, PackError::ArchiveUnreadable { .. }));
    assert!(!sandbox.store.contains(&id("mypack")));
}
