//! Zip-slip and path traversal attacks.

use super::Sandbox;
use super::id;
use cuepack_core::PackError;
use cuepack_core::ViolationKind;
use cuepack_core::test_utils::TarTestBuilder;
use cuepack_core::test_utils::ZipTestBuilder;
use cuepack_core::test_utils::wav_bytes;

fn expect_rejected(err: &PackError, kind: ViolationKind) {
    let report = err
        .validation_report()
        .unwrap_or_else(|| panic!("expected structural violation, got {err}"));
    assert!(report.has(kind), "missing {kind}: {:?}", report.violations());
}

#[test]
fn test_tar_parent_segments() {
    let paths = [
        "mypack/../../outside/evil.wav",
        "../outside/evil.wav",
        "mypack/stop/../../../outside/evil.wav",
        "mypack/stop/..",
        "mypack\\..\\..\\outside\\evil.wav",
    ];

    for path in paths {
        let sandbox = Sandbox::new();
        let data = TarTestBuilder::new()
            .add_file("mypack/stop/ok.wav", &wav_bytes(64))
            .add_raw_file(path, &wav_bytes(64))
            .build();

        let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
        expect_rejected(&err, ViolationKind::PathTraversal);
        assert!(!sandbox.store.contains(&id("mypack")), "{path}");
        sandbox.assert_outside_untouched();
    }
}

#[test]
fn test_zip_parent_segments() {
    let sandbox = Sandbox::new();
    let data = ZipTestBuilder::new()
        .add_file("mypack/stop/ok.wav", &wav_bytes(64))
        .add_file("mypack/stop/../../../outside/evil.wav", &wav_bytes(64))
        .build();

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    expect_rejected(&err, ViolationKind::PathTraversal);
    sandbox.assert_outside_untouched();
}

#[test]
fn test_absolute_paths() {
    let paths = ["/tmp/evil.wav", "\\evil.wav", "C:\\evil.wav", "c:/evil.wav"];

    for path in paths {
        let sandbox = Sandbox::new();
        let data = ZipTestBuilder::new().add_file(path, &wav_bytes(64)).build();

        let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
        expect_rejected(&err, ViolationKind::AbsolutePath);
        sandbox.assert_outside_untouched();
    }
}

#[test]
fn test_tar_absolute_raw_path() {
    let sandbox = Sandbox::new();
    let target = sandbox.outside().join("evil.wav");
    let data = TarTestBuilder::new()
        .add_raw_file(target.to_str().unwrap(), &wav_bytes(64))
        .build();

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    expect_rejected(&err, ViolationKind::AbsolutePath);
    sandbox.assert_outside_untouched();
}

#[test]
fn test_sibling_root_rejected() {
    let sandbox = Sandbox::new();
    let data = ZipTestBuilder::new()
        .add_file("mypack/stop/ok.wav", &wav_bytes(64))
        .add_file("otherpack/stop/hijack.wav", &wav_bytes(64))
        .build();

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    expect_rejected(&err, ViolationKind::UnexpectedRoot);
    assert!(sandbox.store.list_packs().unwrap().is_empty());
}

#[test]
fn test_staging_dir_not_reachable_as_root() {
    let sandbox = Sandbox::new();
    let data = ZipTestBuilder::new()
        .add_file(".staging/stop/a.wav", &wav_bytes(64))
        .build();

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    expect_rejected(&err, ViolationKind::UnexpectedRoot);
}

#[test]
fn test_every_violation_reported() {
    let sandbox = Sandbox::new();
    let data = TarTestBuilder::new()
        .add_raw_file("mypack/../a.wav", b"x")
        .add_raw_file("/abs.wav", b"x")
        .add_raw_file("mypack/stop/deep/a.wav", b"x")
        .add_raw_file("mypack/bogus/a.wav", b"x")
        .add_raw_file("mypack/stop/a.exe", b"x")
        .build();

    let err = sandbox.store.install_bytes(&data, &id("mypack")).unwrap_err();
    let report = err.validation_report().unwrap();
    for kind in [
        ViolationKind::PathTraversal,
        ViolationKind::AbsolutePath,
        ViolationKind::TooDeep,
        ViolationKind::InvalidEvent,
        ViolationKind::DisallowedExtension,
    ] {
        assert!(report.has(kind), "missing {kind}");
    }
}
