//! Audit and verification reports.

use std::fmt;

use crate::error::RejectReason;
use crate::formats::ArchiveType;

/// Structural rule an archive entry broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Path contains a `..` segment.
    PathTraversal,
    /// Path is absolute or carries a drive prefix.
    AbsolutePath,
    /// Entry is a symbolic or hard link.
    SymlinkNotAllowed,
    /// Path has more than three segments.
    TooDeep,
    /// First segment is not the expected pack id.
    UnexpectedRoot,
    /// Event directory of a file is not a recognized event.
    InvalidEvent,
    /// File extension is not on the audio allow-list.
    DisallowedExtension,
}

impl ViolationKind {
    /// Every rule, in the order the auditor evaluates them.
    pub const ALL: [Self; 7] = [
        Self::PathTraversal,
        Self::AbsolutePath,
        Self::SymlinkNotAllowed,
        Self::TooDeep,
        Self::UnexpectedRoot,
        Self::InvalidEvent,
        Self::DisallowedExtension,
    ];

    /// Returns a stable identifier, suitable for machine output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PathTraversal => "path_traversal",
            Self::AbsolutePath => "absolute_path",
            Self::SymlinkNotAllowed => "symlink_not_allowed",
            Self::TooDeep => "too_deep",
            Self::UnexpectedRoot => "unexpected_root",
            Self::InvalidEvent => "invalid_event",
            Self::DisallowedExtension => "disallowed_extension",
        }
    }

    /// Returns a human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::PathTraversal => "path traversal",
            Self::AbsolutePath => "absolute path",
            Self::SymlinkNotAllowed => "symlink not allowed",
            Self::TooDeep => "path too deep",
            Self::UnexpectedRoot => "unexpected top-level directory",
            Self::InvalidEvent => "unknown event directory",
            Self::DisallowedExtension => "disallowed file extension",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// One structural violation: the rule and the offending path as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Rule that was broken.
    pub kind: ViolationKind,
    /// Entry path exactly as stored in the archive.
    pub path: String,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new<S: Into<String>>(kind: ViolationKind, path: S) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.path)
    }
}

/// Ordered result of a structural audit.
///
/// The audit passes if and only if no violation was recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Creates an empty (passing) report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Records a violation.
    pub fn push(&mut self, kind: ViolationKind, path: &str) {
        self.violations.push(Violation::new(kind, path));
    }

    /// Returns `true` if no violation was recorded.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` if no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations in the order they were found.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Iterates over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Number of violations of the given kind.
    #[must_use]
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Returns `true` if at least one violation of `kind` was recorded.
    #[must_use]
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

impl From<Vec<Violation>> for ValidationReport {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

/// A file the content audit would remove, found without extracting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFinding {
    /// Entry path as stored in the archive.
    pub path: String,
    /// Why the file would be removed.
    pub reason: RejectReason,
}

impl fmt::Display for ContentFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.path)
    }
}

/// Result of [`verify_archive`](crate::verify_archive): both audit phases,
/// run exhaustively.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    /// Detected archive format.
    pub format: ArchiveType,

    /// Number of entries listed.
    pub total_entries: usize,

    /// Structural audit result.
    pub structural: ValidationReport,

    /// Files the content audit would remove.
    pub content: Vec<ContentFinding>,
}

impl VerificationReport {
    /// Returns `true` if both phases found nothing.
    #[must_use]
    pub fn passes(&self) -> bool {
        self.structural.is_pass() && self.content.is_empty()
    }

    /// One message per violation or finding, structural ones first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.structural
            .iter()
            .map(ToString::to_string)
            .chain(self.content.iter().map(ToString::to_string))
            .collect()
    }
}
