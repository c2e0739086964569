//! Archive inspection without extraction.
//!
//! Listing, the structural audit and in-memory verification all read the
//! archive without writing anything to disk.
//!
//! # Examples
//!
//! ```no_run
//! use cuepack_core::PackId;
//! use cuepack_core::inspection::audit_entries;
//! use cuepack_core::list_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let id = PackId::parse("retro-beeps")?;
//! let manifest = list_archive("retro-beeps.tar.gz")?;
//!
//! let report = audit_entries(&manifest.entries, &id);
//! for violation in &report {
//!     println!("{violation}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod list;
pub mod manifest;
pub mod report;
pub mod verify;

pub use audit::audit_entries;
pub use list::list_archive;
pub use list::list_bytes;
pub use manifest::ArchiveEntry;
pub use manifest::ArchiveManifest;
pub use manifest::EntryKind;
pub use report::ContentFinding;
pub use report::ValidationReport;
pub use report::VerificationReport;
pub use report::Violation;
pub use report::ViolationKind;
pub use verify::verify_archive;
pub use verify::verify_bytes;
