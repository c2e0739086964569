//! Gatekeeping pipeline for untrusted sound-pack archives.
//!
//! `cuepack-core` takes a third-party archive and a pack id and guarantees
//! that nothing it installs can escape the packs directory or be anything
//! other than an audio file of a recognized format:
//!
//! 1. the archive is listed without extraction and every entry is checked
//!    against the structural rules (no traversal, no absolute paths, no
//!    links, at most `<pack>/<event>/<file>`, known events, audio
//!    extensions); one violation rejects the whole archive
//! 2. an approved archive is extracted into a private scratch directory
//! 3. the extracted tree is sanitized in place: symlinks, misplaced entries,
//!    oversized files and files whose leading bytes are not audio are removed
//! 4. the sanitized directory is renamed over the live pack directory
//!
//! # Examples
//!
//! ```no_run
//! use cuepack_core::PackId;
//! use cuepack_core::PackStore;
//! use cuepack_core::StoreConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PackStore::open(StoreConfig::new("/home/me/.cuepack/packs"))?;
//! let report = store.install_archive("retro-beeps.zip", &PackId::parse("retro-beeps")?)?;
//! println!("installed {} sounds", report.files_installed);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod inspection;
pub mod policy;
pub mod report;
pub mod security;
pub mod store;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::audit_archive;
pub use api::install_pack;
pub use config::StoreConfig;
pub use download::HttpClient;
#[cfg(feature = "download")]
pub use download::ReqwestClient;
pub use download::download_archive;
pub use error::PackError;
pub use error::QuotaResource;
pub use error::RejectReason;
pub use error::Result;
pub use formats::ArchiveType;
pub use inspection::ArchiveEntry;
pub use inspection::ArchiveManifest;
pub use inspection::EntryKind;
pub use inspection::ValidationReport;
pub use inspection::VerificationReport;
pub use inspection::ViolationKind;
pub use inspection::list_archive;
pub use inspection::verify_archive;
pub use policy::MAX_FILE_SIZE;
pub use policy::MAX_PATH_SEGMENTS;
pub use report::InstallReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use security::sanitize_pack_dir;
pub use store::PackStore;

// Re-export types module for easier access
pub use types::AudioFormat;
pub use types::EventName;
pub use types::PackId;
