//! Output formatter trait for CLI results.

use anyhow::Result;
use cuepack_core::ArchiveManifest;
use cuepack_core::EventName;
use cuepack_core::InstallReport;
use cuepack_core::PackId;
use cuepack_core::VerificationReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the outcome of `validate`
    fn format_validation(
        &self,
        archive: &Path,
        pack_id: &PackId,
        report: &VerificationReport,
    ) -> Result<()>;

    /// Format an archive listing
    fn format_manifest(
        &self,
        manifest: &ArchiveManifest,
        long: bool,
        human_readable: bool,
    ) -> Result<()>;

    /// Format a completed install
    fn format_install_result(&self, report: &InstallReport) -> Result<()>;

    /// Format a sound added with `add`
    fn format_sound_added(&self, pack_id: &PackId, event: EventName, path: &Path) -> Result<()>;

    /// Format the installed packs
    fn format_packs(&self, packs: &[PackId]) -> Result<()>;

    /// Format the sounds of a pack
    fn format_sounds(
        &self,
        pack_id: &PackId,
        sounds: &BTreeMap<EventName, Vec<PathBuf>>,
    ) -> Result<()>;

    /// Format a preview pick
    fn format_pick(&self, pack_id: &PackId, event: EventName, sound: Option<&Path>) -> Result<()>;

    /// Format a removed pack
    fn format_removed(&self, pack_id: &PackId) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// An error result that still carries data, such as a failed validation.
    pub fn failure(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(data),
            error: Some(error.into()),
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
