//! Integration tests for cuepack-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use cuepack_core::test_utils::TarTestBuilder;
use cuepack_core::test_utils::ZipTestBuilder;
use cuepack_core::test_utils::gzip;
use cuepack_core::test_utils::mp3_bytes;
use cuepack_core::test_utils::wav_bytes;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temp dir holding archives under test plus an isolated packs dir.
struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            temp: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn packs_dir(&self) -> PathBuf {
        self.temp.path().join("packs")
    }

    fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.temp.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = cuepack_cmd();
        cmd.env("CUEPACK_PACKS_DIR", self.packs_dir());
        cmd
    }

    fn install(&self, archive: &Path) {
        self.cmd().arg("install").arg(archive).assert().success();
    }
}

fn cuepack_cmd() -> Command {
    cargo_bin_cmd!("cuepack")
}

fn beeps_zip() -> Vec<u8> {
    ZipTestBuilder::new()
        .add_directory("beeps/")
        .add_file("beeps/stop/ding.wav", &wav_bytes(256))
        .add_file("beeps/stop/dong.wav", &wav_bytes(256))
        .add_file("beeps/session-start/hello.mp3", &mp3_bytes(128))
        .build()
}

fn traversal_tar() -> Vec<u8> {
    TarTestBuilder::new()
        .add_file("evil/stop/ok.wav", &wav_bytes(64))
        .add_raw_file("evil/../../etc/passwd", b"root:x:0:0")
        .build()
}

#[test]
fn test_version_flag() {
    cuepack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cuepack"));
}

#[test]
fn test_help_lists_commands() {
    cuepack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("pick"));
}

#[test]
fn test_validate_clean_archive_is_silent() {
    let ws = Workspace::new();
    let archive = ws.write("beeps.zip", &beeps_zip());

    cuepack_cmd()
        .arg("validate")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_validate_reports_each_violation() {
    let ws = Workspace::new();
    let archive = ws.write("evil.tar", &traversal_tar());

    let output = cuepack_cmd().arg("validate").arg(&archive).assert().failure();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();

    assert!(stdout.contains("path traversal: evil/../../etc/passwd"));
    assert!(stdout.lines().count() >= 1);
    assert!(!ws.packs_dir().exists(), "validate must not touch the packs dir");
}

#[test]
fn test_validate_finds_spoofed_audio() {
    let ws = Workspace::new();
    let archive = ws.write(
        "spoof.tar.gz",
        &gzip(
            &TarTestBuilder::new()
                .add_file("spoof/stop/real.wav", &wav_bytes(64))
                .add_file("spoof/stop/fake.mp3", b"#!/bin/sh\necho pwned\n")
                .build(),
        ),
    );

    cuepack_cmd()
        .arg("validate")
        .arg(&archive)
        .assert()
        .failure()
        .stdout(predicate::str::contains("spoof/stop/fake.mp3"))
        .stdout(predicate::str::contains("not a recognized audio format"));
}

#[test]
fn test_validate_wrong_root_with_explicit_pack() {
    let ws = Workspace::new();
    let archive = ws.write("beeps.zip", &beeps_zip());

    cuepack_cmd()
        .args(["validate", "--pack", "chimes"])
        .arg(&archive)
        .assert()
        .failure()
        .stdout(predicate::str::contains("unexpected top-level directory"));
}

#[test]
fn test_validate_json_failure() {
    let ws = Workspace::new();
    let archive = ws.write("evil.tar", &traversal_tar());

    let output = cuepack_cmd()
        .args(["--json", "validate"])
        .arg(&archive)
        .assert()
        .failure();
    let json: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();

    assert_eq!(json["operation"], "validate");
    assert_eq!(json["status"], "error");
    assert_eq!(json["data"]["passed"], false);
    assert!(json["data"]["messages"].as_array().unwrap().len() >= 1);
}

#[test]
fn test_validate_underivable_pack_id() {
    let ws = Workspace::new();
    let archive = ws.write("My Pack.zip", &beeps_zip());

    cuepack_cmd()
        .arg("validate")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pack"));
}

#[test]
fn test_validate_nonexistent_archive() {
    cuepack_cmd()
        .args(["validate", "/nonexistent/beeps.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR"));
}

#[test]
fn test_list_short() {
    let ws = Workspace::new();
    let archive = ws.write("beeps.zip", &beeps_zip());

    cuepack_cmd()
        .arg("list")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("beeps/stop/ding.wav"))
        .stdout(predicate::str::contains("beeps/session-start/hello.mp3"));
}

#[test]
fn test_list_long_shows_totals() {
    let ws = Workspace::new();
    let archive = ws.write("beeps.zip", &beeps_zip());

    cuepack_cmd()
        .args(["list", "--long", "-H"])
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 4 entries"));
}

#[test]
fn test_list_shows_hostile_paths_verbatim() {
    let ws = Workspace::new();
    let archive = ws.write("evil.tar", &traversal_tar());

    cuepack_cmd()
        .arg("list")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("evil/../../etc/passwd"));
}

#[test]
fn test_list_json() {
    let ws = Workspace::new();
    let archive = ws.write("beeps.zip", &beeps_zip());

    let output = cuepack_cmd()
        .args(["--json", "list"])
        .arg(&archive)
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();

    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["format"], "zip");
    assert_eq!(json["data"]["total_entries"], 4);
}

#[test]
fn test_install_and_list_packs() {
    let ws = Workspace::new();
    let archive = ws.write("beeps.zip", &beeps_zip());

    ws.cmd()
        .arg("install")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed pack 'beeps'"));

    assert!(ws.packs_dir().join("beeps/stop/ding.wav").is_file());

    ws.cmd()
        .arg("packs")
        .assert()
        .success()
        .stdout(predicate::str::diff("beeps\n"));
}

#[test]
fn test_install_rejects_traversal() {
    let ws = Workspace::new();
    let archive = ws.write("evil.tar", &traversal_tar());

    ws.cmd()
        .arg("install")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("was rejected"))
        .stderr(predicate::str::contains("HINT"));

    assert!(!ws.packs_dir().join("evil").exists());
    assert!(!ws.temp.path().join("etc").exists());
}

#[test]
fn test_install_with_explicit_pack_id() {
    let ws = Workspace::new();
    let archive = ws.write("download-1234.zip", &beeps_zip());

    ws.cmd()
        .args(["install", "--pack", "beeps"])
        .arg(&archive)
        .assert()
        .success();

    assert!(ws.packs_dir().join("beeps").is_dir());
}

#[test]
fn test_install_json_reports_removals() {
    let ws = Workspace::new();
    let archive = ws.write(
        "mixed.tar",
        &TarTestBuilder::new()
            .add_file("mixed/stop/good.wav", &wav_bytes(64))
            .add_file("mixed/stop/bad.wav", b"MZ\x90\x00 not audio")
            .build(),
    );

    let output = ws
        .cmd()
        .args(["--json", "install"])
        .arg(&archive)
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();

    assert_eq!(json["operation"], "install");
    assert_eq!(json["data"]["pack_id"], "mixed");
    assert_eq!(json["data"]["files_installed"], 1);
    assert!(json["data"]["entries_removed"].as_u64().unwrap() >= 1);
    assert!(!ws.packs_dir().join("mixed/stop/bad.wav").exists());
}

#[test]
fn test_install_unreachable_url_fails_cleanly() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["install", "--pack", "beeps", "http://127.0.0.1:9/beeps.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Download"));

    assert!(!ws.packs_dir().join("beeps").exists());
}

#[test]
fn test_sounds_and_pick() {
    let ws = Workspace::new();
    ws.install(&ws.write("beeps.zip", &beeps_zip()));

    ws.cmd()
        .args(["sounds", "beeps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stop (2)"))
        .stdout(predicate::str::contains("hello.mp3"));

    let output = ws.cmd().args(["pick", "beeps", "stop"]).assert().success();
    let picked = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let picked = PathBuf::from(picked.trim());
    assert!(picked.starts_with(ws.packs_dir().join("beeps").join("stop")));
    assert!(picked.is_file());
}

#[test]
fn test_pick_event_without_sounds() {
    let ws = Workspace::new();
    ws.install(&ws.write("beeps.zip", &beeps_zip()));

    ws.cmd()
        .args(["--json", "pick", "beeps", "notification"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"path\": null"));
}

#[test]
fn test_pick_unknown_event_is_usage_error() {
    cuepack_cmd()
        .args(["pick", "beeps", "reboot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown event 'reboot'"));
}

#[test]
fn test_add_sound() {
    let ws = Workspace::new();
    ws.install(&ws.write("beeps.zip", &beeps_zip()));
    let sound = ws.write("chime.wav", &wav_bytes(512));

    ws.cmd()
        .args(["add", "beeps", "notification"])
        .arg(&sound)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added chime.wav"));

    assert!(ws.packs_dir().join("beeps/notification/chime.wav").is_file());
}

#[test]
fn test_add_rejects_non_audio() {
    let ws = Workspace::new();
    ws.install(&ws.write("beeps.zip", &beeps_zip()));
    let fake = ws.write("payload.wav", b"#!/bin/sh\nrm -rf ~\n");

    ws.cmd()
        .args(["add", "beeps", "stop"])
        .arg(&fake)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rejected"));

    assert!(!ws.packs_dir().join("beeps/stop/payload.wav").exists());
}

#[test]
fn test_add_to_missing_pack() {
    let ws = Workspace::new();
    let sound = ws.write("chime.wav", &wav_bytes(512));

    ws.cmd()
        .args(["add", "ghost", "stop"])
        .arg(&sound)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not installed"));
}

#[test]
fn test_remove_pack() {
    let ws = Workspace::new();
    ws.install(&ws.write("beeps.zip", &beeps_zip()));

    ws.cmd()
        .args(["remove", "beeps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed pack 'beeps'"));

    assert!(!ws.packs_dir().join("beeps").exists());

    ws.cmd()
        .args(["remove", "beeps"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cuepack packs"));
}

#[test]
fn test_invalid_pack_id_argument() {
    cuepack_cmd()
        .args(["remove", "../etc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pack id"));
}

#[test]
fn test_quiet_install_prints_nothing() {
    let ws = Workspace::new();
    let archive = ws.write("beeps.zip", &beeps_zip());

    ws.cmd()
        .args(["--quiet", "install"])
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_packs_dir_flag_overrides_env() {
    let ws = Workspace::new();
    let archive = ws.write("beeps.zip", &beeps_zip());
    let other = ws.temp.path().join("other-packs");

    ws.cmd()
        .arg("--packs-dir")
        .arg(&other)
        .arg("install")
        .arg(&archive)
        .assert()
        .success();

    assert!(other.join("beeps").is_dir());
    assert!(!ws.packs_dir().join("beeps").exists());
}

#[test]
fn test_completion_bash() {
    cuepack_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cuepack"));
}
