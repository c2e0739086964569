//! Structural audit of archive listings.
//!
//! The audit looks only at entry metadata (path and kind). Every rule is
//! evaluated for every entry and all violations are collected; the caller
//! rejects the archive as a whole if any were found.

use crate::AudioFormat;
use crate::EventName;
use crate::PackId;
use crate::inspection::ArchiveEntry;
use crate::inspection::EntryKind;
use crate::inspection::ValidationReport;
use crate::inspection::ViolationKind;
use crate::policy::MAX_PATH_SEGMENTS;

/// Splits a stored entry path into its non-empty segments.
///
/// Both `/` and `\` separate segments. Empty segments produced by leading,
/// trailing or doubled separators are dropped; `.` and `..` are kept.
///
/// # Examples
///
/// ```
/// use cuepack_core::inspection::audit::split_segments;
///
/// assert_eq!(split_segments("pack/stop/a.wav"), ["pack", "stop", "a.wav"]);
/// assert_eq!(split_segments("pack\\stop//"), ["pack", "stop"]);
/// assert_eq!(split_segments("/../x"), ["..", "x"]);
/// ```
#[must_use]
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Returns `true` if `path` is rooted: it starts with a separator or a drive
/// prefix such as `C:`.
#[must_use]
pub fn is_rooted(path: &str) -> bool {
    let bytes = path.as_bytes();
    matches!(bytes.first(), Some(b'/' | b'\\'))
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Returns `true` if `path` refers to a parent directory: a `..` segment, or
/// `..` immediately before a separator anywhere in the path.
#[must_use]
pub fn has_parent_reference(path: &str) -> bool {
    split_segments(path).contains(&"..") || path.contains("../") || path.contains("..\\")
}

/// Audits a single entry, appending every violation to `report`.
pub fn audit_entry(entry: &ArchiveEntry, expected_root: &PackId, report: &mut ValidationReport) {
    let path = entry.path.as_str();
    let segments = split_segments(path);

    if has_parent_reference(path) {
        report.push(ViolationKind::PathTraversal, path);
    }
    if is_rooted(path) {
        report.push(ViolationKind::AbsolutePath, path);
    }
    if entry.kind == EntryKind::Symlink {
        report.push(ViolationKind::SymlinkNotAllowed, path);
    }
    if segments.len() > MAX_PATH_SEGMENTS {
        report.push(ViolationKind::TooDeep, path);
    }
    if segments.first() != Some(&expected_root.as_str()) {
        report.push(ViolationKind::UnexpectedRoot, path);
    }

    if let [_, event, file_name] = segments.as_slice()
        && entry.kind == EntryKind::File
    {
        if EventName::from_name(event).is_none() {
            report.push(ViolationKind::InvalidEvent, path);
        }
        if AudioFormat::from_file_name(file_name).is_none() {
            report.push(ViolationKind::DisallowedExtension, path);
        }
    }
}

/// Audits a whole listing against the expected pack id.
///
/// Never short-circuits: the returned report holds every violation of every
/// entry, in listing order.
///
/// # Examples
///
/// ```
/// use cuepack_core::PackId;
/// use cuepack_core::inspection::{ArchiveEntry, ViolationKind, audit_entries};
///
/// let id = PackId::parse("mypack")?;
/// let entries = vec![
///     ArchiveEntry::file("mypack/session-start/a.wav", 1024),
///     ArchiveEntry::file("mypack/../../etc/passwd", 10),
/// ];
///
/// let report = audit_entries(&entries, &id);
/// assert!(!report.is_pass());
/// assert!(report.has(ViolationKind::PathTraversal));
/// # Ok::<(), cuepack_core::PackError>(())
/// ```
#[must_use]
pub fn audit_entries(entries: &[ArchiveEntry], expected_root: &PackId) -> ValidationReport {
    let mut report = ValidationReport::new();
    for entry in entries {
        audit_entry(entry, expected_root, &mut report);
    }
    report
}
