//! Compiled-in security limits.
//!
//! These values are part of the pack security contract and are not
//! exposed through [`StoreConfig`](crate::StoreConfig).

/// Maximum size of a single audio file, in bytes (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum number of path segments in an archive entry
/// (`<pack-id>/<event>/<file>`).
pub const MAX_PATH_SEGMENTS: usize = 3;

/// Maximum number of entries a listed archive may contain.
pub const MAX_ARCHIVE_ENTRIES: usize = 10_000;

/// Maximum declared uncompressed size of all archive entries, in bytes.
pub const MAX_ARCHIVE_TOTAL_SIZE: u64 = 512 * 1024 * 1024;

/// Number of leading bytes needed to evaluate every audio signature.
pub const SIGNATURE_PREFIX_LEN: usize = 12;
