//! Entry-count, size and decompression limits.

use super::Sandbox;
use super::id;
use cuepack_core::MAX_FILE_SIZE;
use cuepack_core::PackError;
use cuepack_core::QuotaResource;
use cuepack_core::test_utils::TarTestBuilder;
use cuepack_core::test_utils::ZipTestBuilder;
use cuepack_core::test_utils::gzip;
use cuepack_core::test_utils::wav_bytes;
use cuepack_core::test_utils::zstd_compress;

#[test]
fn test_entry_count_quota() {
    let sandbox = Sandbox::new();
    let mut builder = TarTestBuilder::new();
    for i in 0..=cuepack_core::policy::MAX_ARCHIVE_ENTRIES {
        builder = builder.add_directory(&format!("mypack/stop/{i}/"));
    }
    let data = gzip(&builder.build());

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    assert!(matches!(
        err.quota_resource(),
        Some(QuotaResource::EntryCount { .. })
    ));
    sandbox.assert_outside_untouched();
}

#[test]
fn test_highly_compressed_oversized_file_truncated_and_removed() {
    let sandbox = Sandbox::new();
    let size = usize::try_from(MAX_FILE_SIZE * 3).unwrap();
    let data = zstd_compress(
        &TarTestBuilder::new()
            .add_file("mypack/stop/bomb.wav", &wav_bytes(size))
            .add_file("mypack/stop/ok.wav", &wav_bytes(64))
            .build(),
    );
    assert!(data.len() < 1024 * 1024);

    let report = sandbox.store.install_bytes(&data, &id("mypack")).unwrap();
    assert_eq!(report.files_installed, 1);
    assert!(
        !sandbox
            .store
            .live_dir(&id("mypack"))
            .join("stop/bomb.wav")
            .exists()
    );
}

#[test]
fn test_oversized_zip_entry_removed() {
    let sandbox = Sandbox::new();
    let size = usize::try_from(MAX_FILE_SIZE).unwrap() + 1;
    let data = ZipTestBuilder::new()
        .add_deflated_file("mypack/stop/big.wav", &wav_bytes(size))
        .build();

    let report = sandbox.store.install_bytes(&data, &id("mypack")).unwrap();
    assert_eq!(report.files_installed, 0);
    assert!(report.had_removals());
}

#[test]
fn test_truncated_archive_is_unreadable() {
    let sandbox = Sandbox::new();
    let data = ZipTestBuilder::new()
        .add_file("mypack/stop/a.wav", &wav_bytes(4096))
        .build();
    let truncated = &data[..data.len() / 2];

    let err = sandbox.store.install_bytes(truncated, &id("mypack")).unwrap_err();
    assert!(matches!(err, PackError::ArchiveUnreadable { .. }));
}
