//! Non-audio payloads disguised as audio.

use super::Sandbox;
use super::id;
use cuepack_core::EventName;
use cuepack_core::PackId;
use cuepack_core::RejectReason;
use cuepack_core::test_utils::ZipTestBuilder;
use cuepack_core::test_utils::wav_bytes;
use cuepack_core::verify_archive;
use std::io::Write;

const PAYLOADS: [&[u8]; 5] = [
    b"#!/bin/sh\nrm -rf ~\n",
    b"MZ\x90\x00\x03\x00\x00\x00\x04\x00\x00\x00",
    b"\x7fELF\x02\x01\x01\x00\x00\x00\x00\x00",
    b"<script>alert(1)</script>",
    b"RIFF\x00\x00\x00\x00AVI LIST",
];

#[test]
fn test_disguised_payloads_removed() {
    let sandbox = Sandbox::new();
    let mut builder = ZipTestBuilder::new().add_file("mypack/stop/real.wav", &wav_bytes(128));
    for (i, payload) in PAYLOADS.iter().enumerate() {
        builder = builder.add_file(&format!("mypack/session-end/fake{i}.wav"), payload);
        builder = builder.add_file(&format!("mypack/tool-failure/fake{i}.mp3"), payload);
    }
    let data = builder.build();

    let report = sandbox.store.install_bytes(&data, &id("mypack")).unwrap();
    assert_eq!(report.files_installed, 1);
    assert_eq!(report.files_extracted, 1 + 2 * PAYLOADS.len());

    let sounds = sandbox.store.pack_sounds(&id("mypack")).unwrap();
    assert_eq!(sounds.keys().copied().collect::<Vec<_>>(), vec![EventName::Stop]);
}

#[test]
fn test_verify_reports_spoofed_signatures() {
    let data = ZipTestBuilder::new()
        .add_file("mypack/prompt-submit/a.mp3", PAYLOADS[0])
        .add_file("mypack/prompt-submit/b.ogg", PAYLOADS[4])
        .build();
    let mut archive = tempfile::NamedTempFile::with_suffix(".zip").unwrap();
    archive.write_all(&data).unwrap();

    let report = verify_archive(archive.path(), &PackId::parse("mypack").unwrap()).unwrap();
    assert!(report.structural.is_pass());
    assert_eq!(report.content.len(), 2);
    assert!(
        report
            .content
            .iter()
            .all(|finding| finding.reason == RejectReason::UnrecognizedSignature)
    );
}

#[test]
fn test_add_sound_refuses_spoofed_file() {
    let sandbox = Sandbox::new();
    let data = ZipTestBuilder::new()
        .add_file("mypack/stop/a.wav", &wav_bytes(64))
        .build();
    sandbox.store.install_bytes(&data, &id("mypack")).unwrap();

    let source = sandbox.temp.path().join("script.wav");
    std::fs::write(&source, PAYLOADS[0]).unwrap();

    let err = sandbox
        .store
        .add_sound(&id("mypack"), EventName::Stop, &source)
        .unwrap_err();
    assert!(err.is_security_violation());
    assert_eq!(
        sandbox.store.pack_sounds(&id("mypack")).unwrap()[&EventName::Stop].len(),
        1
    );
}
