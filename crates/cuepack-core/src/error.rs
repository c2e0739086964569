//! Error types for pack validation and installation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::inspection::ValidationReport;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Represents a specific quota resource that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// Archive contains too many entries.
    EntryCount {
        /// Entries seen so far.
        current: usize,
        /// Maximum allowed entries.
        max: usize,
    },
    /// Declared uncompressed size of all entries is too large.
    TotalSize {
        /// Total size seen so far, in bytes.
        current: u64,
        /// Maximum allowed total size, in bytes.
        max: u64,
    },
    /// Downloaded archive exceeded the configured cap.
    DownloadSize {
        /// Maximum allowed download size, in bytes.
        max: u64,
    },
}

impl fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntryCount { current, max } => {
                write!(f, "quota exceeded: entry count ({current} > {max})")
            }
            Self::TotalSize { current, max } => {
                write!(f, "quota exceeded: total size ({current} > {max})")
            }
            Self::DownloadSize { max } => {
                write!(f, "quota exceeded: download larger than {max} bytes")
            }
        }
    }
}

/// Why a single file was refused by the content admission policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The entry is a symbolic link.
    Symlink,
    /// The entry sits somewhere other than `<event>/<file>` inside the pack.
    UnexpectedLocation,
    /// The entry lives under a directory that is not a known event.
    UnknownEvent,
    /// The file extension is not on the audio allow-list.
    DisallowedExtension,
    /// The file exceeds the size limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
    },
    /// The leading bytes match no known audio signature.
    UnrecognizedSignature,
    /// The entry is not a regular file (FIFO, socket, device).
    NotRegularFile,
    /// The file could not be opened or read.
    Unreadable,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symlink => f.write_str("symbolic link"),
            Self::UnexpectedLocation => f.write_str("unexpected location"),
            Self::UnknownEvent => f.write_str("unknown event directory"),
            Self::DisallowedExtension => f.write_str("disallowed extension"),
            Self::TooLarge { size } => {
                write!(f, "file too large ({size} > {} bytes)", crate::MAX_FILE_SIZE)
            }
            Self::UnrecognizedSignature => f.write_str("content is not a recognized audio format"),
            Self::NotRegularFile => f.write_str("not a regular file"),
            Self::Unreadable => f.write_str("unreadable"),
        }
    }
}

/// Errors that can occur while validating or installing a sound pack.
#[derive(Error, Debug)]
pub enum PackError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive could not be opened or enumerated.
    #[error("archive unreadable: {reason}")]
    ArchiveUnreadable {
        /// What went wrong.
        reason: String,
    },

    /// The archive listing failed the structural audit.
    #[error("archive failed structural audit with {} violation(s)", .report.len())]
    StructuralViolation {
        /// Every violation found.
        report: ValidationReport,
    },

    /// Extraction into the scratch directory failed.
    #[error("extraction failed: {reason}")]
    ExtractionFailed {
        /// What went wrong.
        reason: String,
    },

    /// A file was refused by the content admission policy.
    #[error("rejected {path}: {reason}")]
    ContentRejected {
        /// The refused file.
        path: PathBuf,
        /// Why it was refused.
        reason: RejectReason,
    },

    /// The sanitized pack could not be moved into place.
    #[error("failed to install pack '{pack_id}': {source}")]
    InstallFailed {
        /// The pack being installed.
        pack_id: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The pack id is not `[a-z0-9-]+`.
    #[error("invalid pack id '{id}': expected lowercase letters, digits and '-'")]
    InvalidPackId {
        /// The rejected id.
        id: String,
    },

    /// The name is not a recognized event.
    #[error("unknown event '{name}'")]
    UnknownEvent {
        /// The rejected name.
        name: String,
    },

    /// A resource limit was exceeded.
    #[error("{resource}")]
    QuotaExceeded {
        /// Which limit.
        resource: QuotaResource,
    },

    /// The requested pack is not installed.
    #[error("pack '{pack_id}' is not installed")]
    PackNotFound {
        /// The missing pack.
        pack_id: String,
    },

    /// Fetching a remote archive failed.
    #[error("download failed: {reason}")]
    DownloadFailed {
        /// What went wrong.
        reason: String,
    },

    /// The operation was cancelled before completion.
    #[error("operation cancelled")]
    Cancelled,
}

impl PackError {
    /// Returns `true` if this error means the pack itself is untrusted.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuepack_core::PackError;
    /// use cuepack_core::RejectReason;
    /// use std::path::PathBuf;
    ///
    /// let err = PackError::ContentRejected {
    ///     path: PathBuf::from("stop/evil.wav"),
    ///     reason: RejectReason::UnrecognizedSignature,
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = PackError::Cancelled;
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::StructuralViolation { .. }
                | Self::ContentRejected { .. }
                | Self::InvalidPackId { .. }
                | Self::QuotaExceeded { .. }
        )
    }

    /// Returns `true` if retrying the same operation might succeed.
    ///
    /// Only transient conditions qualify: network failures, cancellation and
    /// filesystem errors. A pack that failed validation will fail again.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::InstallFailed { .. } | Self::DownloadFailed { .. } | Self::Cancelled
        )
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuepack_core::PackError;
    ///
    /// let err = PackError::ArchiveUnreadable { reason: "bad header".into() };
    /// assert_eq!(err.context(), Some("bad header"));
    ///
    /// assert_eq!(PackError::Cancelled.context(), None);
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::ArchiveUnreadable { reason }
            | Self::ExtractionFailed { reason }
            | Self::DownloadFailed { reason } => Some(reason),
            _ => None,
        }
    }

    /// Returns the structural report, if this is a structural violation.
    #[must_use]
    pub const fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            Self::StructuralViolation { report } => Some(report),
            _ => None,
        }
    }

    /// Returns the quota resource that was exceeded, if applicable.
    #[must_use]
    pub const fn quota_resource(&self) -> Option<&QuotaResource> {
        match self {
            Self::QuotaExceeded { resource } => Some(resource),
            _ => None,
        }
    }
}
