//! Symlink escapes, in archives and on disk.

use super::Sandbox;
use super::id;
use cuepack_core::RejectReason;
use cuepack_core::ViolationKind;
use cuepack_core::sanitize_pack_dir;
use cuepack_core::test_utils::TarTestBuilder;
use cuepack_core::test_utils::ZipTestBuilder;
use cuepack_core::test_utils::wav_bytes;
use std::fs;

#[test]
fn test_tar_symlink_entry_rejected() {
    let sandbox = Sandbox::new();
    let target = sandbox.outside().join("secret.wav");
    let data = TarTestBuilder::new()
        .add_file("mypack/stop/ok.wav", &wav_bytes(64))
        .add_symlink("mypack/stop/link.wav", target.to_str().unwrap())
        .build();

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    assert!(err.validation_report().unwrap().has(ViolationKind::SymlinkNotAllowed));
    sandbox.assert_outside_untouched();
}

#[test]
fn test_zip_symlink_entry_rejected() {
    let sandbox = Sandbox::new();
    let data = ZipTestBuilder::new()
        .add_symlink("mypack/stop", "../../outside")
        .add_file("mypack/stop/evil.wav", &wav_bytes(64))
        .build();

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    let report = err.validation_report().unwrap();
    assert_eq!(report.count(ViolationKind::SymlinkNotAllowed), 1);
    sandbox.assert_outside_untouched();
}

#[test]
fn test_symlink_then_file_through_it() {
    let sandbox = Sandbox::new();
    let data = TarTestBuilder::new()
        .add_symlink("mypack/stop", "/")
        .add_file("mypack/stop/a.wav", &wav_bytes(64))
        .build();

    assert!(sandbox.store.install_bytes(&data, &id("mypack")).is_err());
    assert!(!sandbox.store.contains(&id("mypack")));
}

#[cfg(unix)]
mod on_disk {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn test_sanitizer_removes_symlinked_audio_without_reading_it() {
        let sandbox = Sandbox::new();
        let secret = sandbox.outside().join("secret.wav");
        fs::write(&secret, wav_bytes(256)).unwrap();

        let root = sandbox.temp.path().join("scratch/mypack");
        fs::create_dir_all(root.join("notification")).unwrap();
        fs::write(root.join("notification/real.wav"), wav_bytes(64)).unwrap();
        symlink(&secret, root.join("notification/a.wav")).unwrap();

        let report = sanitize_pack_dir(&root).unwrap();
        assert_eq!(report.removed.len(), 1);
        assert_eq!(report.removed[0].reason, RejectReason::Symlink);
        assert!(fs::symlink_metadata(root.join("notification/a.wav")).is_err());
        assert_eq!(fs::read(&secret).unwrap(), wav_bytes(256));
        assert_eq!(report.files_kept, 1);
    }

    #[test]
    fn test_sanitizer_does_not_descend_symlinked_event_dir() {
        let sandbox = Sandbox::new();
        fs::write(sandbox.outside().join("keep.wav"), wav_bytes(64)).unwrap();
        fs::write(sandbox.outside().join("junk.txt"), b"junk").unwrap();

        let root = sandbox.temp.path().join("scratch/mypack");
        fs::create_dir_all(&root).unwrap();
        symlink(sandbox.outside(), root.join("stop")).unwrap();

        let report = sanitize_pack_dir(&root).unwrap();
        assert_eq!(report.removed.len(), 1);
        assert_eq!(report.removed[0].reason, RejectReason::Symlink);
        assert!(sandbox.outside().join("keep.wav").exists());
        assert!(sandbox.outside().join("junk.txt").exists());
    }

    #[test]
    fn test_add_sound_refuses_symlink_source() {
        let sandbox = Sandbox::new();
        let data = ZipTestBuilder::new()
            .add_file("mypack/stop/a.wav", &wav_bytes(64))
            .build();
        sandbox.store.install_bytes(&data, &id("mypack")).unwrap();

        let secret = sandbox.outside().join("secret.wav");
        fs::write(&secret, wav_bytes(64)).unwrap();
        let link = sandbox.temp.path().join("innocent.wav");
        symlink(&secret, &link).unwrap();

        let err = sandbox
            .store
            .add_sound(&id("mypack"), cuepack_core::EventName::Stop, &link)
            .unwrap_err();
        assert!(err.is_security_violation());
        assert!(!sandbox.store.live_dir(&id("mypack")).join("stop/innocent.wav").exists());
    }
}
