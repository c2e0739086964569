//! Error conversion utilities for CLI.
//!
//! Converts cuepack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use cuepack_core::PackError;

/// Converts `PackError` to a user-friendly anyhow error.
///
/// `subject` names what was being processed: an archive path, a URL or a
/// pack id.
pub fn convert_pack_error(err: PackError, subject: &str) -> anyhow::Error {
    match err {
        PackError::StructuralViolation { report } => {
            let mut message = format!(
                "Archive '{subject}' was rejected: {} problem(s) found",
                report.len()
            );
            for violation in &report {
                message.push_str(&format!("\n  {violation}"));
            }
            anyhow!(
                "{message}\n\
                 HINT: Packs must contain only <pack-id>/<event>/<sound> audio files. \
                 Run 'cuepack validate' for a full report."
            )
        }
        PackError::ArchiveUnreadable { reason } => {
            anyhow!(
                "Cannot read archive '{subject}': {reason}\n\
                 HINT: Supported formats: zip, tar, tar.gz, tar.bz2, tar.xz, tar.zst. \
                 Encrypted archives are not supported."
            )
        }
        PackError::QuotaExceeded { resource } => {
            anyhow!(
                "Limit exceeded for '{subject}': {resource}\n\
                 HINT: Sound packs are limited in size and entry count; this archive is too large."
            )
        }
        PackError::ExtractionFailed { reason } => {
            anyhow!(
                "Extraction of '{subject}' failed: {reason}\n\
                 HINT: Nothing was installed. The archive may be corrupted."
            )
        }
        PackError::InstallFailed { pack_id, source } => {
            anyhow!(
                "Failed to install pack '{pack_id}': {source}\n\
                 HINT: The previously installed version, if any, is unchanged. \
                 Check permissions on the packs directory."
            )
        }
        PackError::ContentRejected { path, reason } => {
            anyhow!(
                "Rejected '{}': {reason}\n\
                 HINT: Accepted formats: wav, mp3, aiff, m4a, ogg, aac, up to 10 MiB.",
                path.display()
            )
        }
        PackError::PackNotFound { pack_id } => {
            anyhow!(
                "Pack '{pack_id}' is not installed\n\
                 HINT: Run 'cuepack packs' to see installed packs."
            )
        }
        PackError::DownloadFailed { reason } => {
            anyhow!(
                "Download of '{subject}' failed: {reason}\n\
                 HINT: Nothing was installed. Check the URL and your connection, then retry."
            )
        }
        PackError::Cancelled => anyhow!("Cancelled. Nothing was installed."),
        PackError::Io(io_err) => anyhow!("I/O error while processing '{subject}': {io_err}"),
        _ => anyhow::Error::from(err).context(format!("Error processing '{subject}'")),
    }
}

/// Adds context to a core result about the given subject.
pub fn add_archive_context<T>(result: Result<T, PackError>, subject: &str) -> anyhow::Result<T> {
    result.map_err(|e| convert_pack_error(e, subject))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuepack_core::ValidationReport;
    use cuepack_core::ViolationKind;
    use std::io;

    #[test]
    fn test_convert_structural_violation() {
        let mut report = ValidationReport::new();
        report.push(ViolationKind::PathTraversal, "beeps/../../etc/passwd");
        report.push(ViolationKind::SymlinkNotAllowed, "beeps/stop/a.wav");

        let converted = convert_pack_error(PackError::StructuralViolation { report }, "evil.zip");
        let msg = format!("{converted:?}");
        assert!(msg.contains("evil.zip"));
        assert!(msg.contains("2 problem(s)"));
        assert!(msg.contains("beeps/../../etc/passwd"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_download_failure() {
        let err = PackError::DownloadFailed {
            reason: "server returned HTTP 503".into(),
        };
        let converted = convert_pack_error(err, "https://example.com/p.zip");
        let msg = format!("{converted:?}");
        assert!(msg.contains("503"));
        assert!(msg.contains("Nothing was installed"));
    }

    #[test]
    fn test_convert_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let converted = convert_pack_error(PackError::Io(io_err), "pack.tar.gz");
        assert!(format!("{converted:?}").contains("I/O error"));
    }

    #[test]
    fn test_convert_other_keeps_source() {
        let err = PackError::InvalidPackId { id: "Bad Id".into() };
        let converted = convert_pack_error(err, "Bad Id");
        let msg = format!("{converted:?}");
        assert!(msg.contains("Error processing 'Bad Id'"));
        assert!(msg.contains("invalid pack id"));
    }
}
