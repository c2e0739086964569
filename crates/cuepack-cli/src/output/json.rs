//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use cuepack_core::ArchiveManifest;
use cuepack_core::EventName;
use cuepack_core::InstallReport;
use cuepack_core::PackId;
use cuepack_core::VerificationReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ValidationOutput {
    archive: String,
    pack_id: String,
    format: String,
    total_entries: usize,
    passed: bool,
    messages: Vec<String>,
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    path: &'a str,
    kind: &'static str,
    size: u64,
}

#[derive(Serialize)]
struct ManifestOutput<'a> {
    format: String,
    total_entries: usize,
    total_size: u64,
    entries: Vec<EntryOutput<'a>>,
}

#[derive(Serialize)]
struct InstallOutput {
    pack_id: String,
    files_installed: usize,
    files_extracted: usize,
    entries_removed: usize,
    replaced_existing: bool,
    duration_ms: u128,
}

fn path_strings(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

impl OutputFormatter for JsonFormatter {
    fn format_validation(
        &self,
        archive: &Path,
        pack_id: &PackId,
        report: &VerificationReport,
    ) -> Result<()> {
        let data = ValidationOutput {
            archive: archive.display().to_string(),
            pack_id: pack_id.to_string(),
            format: report.format.to_string(),
            total_entries: report.total_entries,
            passed: report.passes(),
            messages: report.messages(),
        };

        if data.passed {
            Self::output(&JsonOutput::success("validate", data))
        } else {
            let error = format!("{} problem(s) found", data.messages.len());
            Self::output(&JsonOutput::failure("validate", data, error))
        }
    }

    fn format_manifest(
        &self,
        manifest: &ArchiveManifest,
        _long: bool,
        _human_readable: bool,
    ) -> Result<()> {
        let data = ManifestOutput {
            format: manifest.format.to_string(),
            total_entries: manifest.total_entries,
            total_size: manifest.total_size,
            entries: manifest
                .entries
                .iter()
                .map(|entry| EntryOutput {
                    path: &entry.path,
                    kind: entry.kind.as_str(),
                    size: entry.size,
                })
                .collect(),
        };
        Self::output(&JsonOutput::success("list", data))
    }

    fn format_install_result(&self, report: &InstallReport) -> Result<()> {
        let data = InstallOutput {
            pack_id: report.pack_id.to_string(),
            files_installed: report.files_installed,
            files_extracted: report.files_extracted,
            entries_removed: report.entries_removed,
            replaced_existing: report.replaced_existing,
            duration_ms: report.duration.as_millis(),
        };
        Self::output(&JsonOutput::success("install", data))
    }

    fn format_sound_added(&self, pack_id: &PackId, event: EventName, path: &Path) -> Result<()> {
        #[derive(Serialize)]
        struct AddOutput {
            pack_id: String,
            event: &'static str,
            path: String,
        }

        let data = AddOutput {
            pack_id: pack_id.to_string(),
            event: event.as_str(),
            path: path.display().to_string(),
        };
        Self::output(&JsonOutput::success("add", data))
    }

    fn format_packs(&self, packs: &[PackId]) -> Result<()> {
        let data: Vec<&str> = packs.iter().map(PackId::as_str).collect();
        Self::output(&JsonOutput::success("packs", data))
    }

    fn format_sounds(
        &self,
        pack_id: &PackId,
        sounds: &BTreeMap<EventName, Vec<PathBuf>>,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct SoundsOutput {
            pack_id: String,
            events: BTreeMap<&'static str, Vec<String>>,
        }

        let data = SoundsOutput {
            pack_id: pack_id.to_string(),
            events: sounds
                .iter()
                .map(|(event, files)| (event.as_str(), path_strings(files)))
                .collect(),
        };
        Self::output(&JsonOutput::success("sounds", data))
    }

    fn format_pick(&self, pack_id: &PackId, event: EventName, sound: Option<&Path>) -> Result<()> {
        #[derive(Serialize)]
        struct PickOutput {
            pack_id: String,
            event: &'static str,
            path: Option<String>,
        }

        let data = PickOutput {
            pack_id: pack_id.to_string(),
            event: event.as_str(),
            path: sound.map(|p| p.display().to_string()),
        };
        Self::output(&JsonOutput::success("pick", data))
    }

    fn format_removed(&self, pack_id: &PackId) -> Result<()> {
        #[derive(Serialize)]
        struct RemoveOutput {
            pack_id: String,
        }

        let data = RemoveOutput {
            pack_id: pack_id.to_string(),
        };
        Self::output(&JsonOutput::success("remove", data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unknown", format!("{error:?}"));
        let _ = Self::output(&output);
    }
}
