//! Archive format detection.

use std::fmt;
use std::path::Path;

use crate::PackError;
use crate::Result;

/// Number of leading bytes inspected to detect the archive type.
///
/// Covers the `ustar` magic at offset 257.
pub const DETECT_PREFIX_LEN: usize = 262;

const ZIP_LOCAL_HEADER: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_ARCHIVE: &[u8] = b"PK\x05\x06";
const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xB5, 0x2F, 0xFD];
const USTAR_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8] = b"ustar";

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
    /// Bzip2-compressed tar archive.
    TarBz2,
    /// XZ-compressed tar archive.
    TarXz,
    /// Zstd-compressed tar archive.
    TarZst,
    /// ZIP archive.
    Zip,
}

impl ArchiveType {
    /// Returns a short display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarXz => "tar.xz",
            Self::TarZst => "tar.zst",
            Self::Zip => "zip",
        }
    }
}

impl fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detects the archive type from its leading bytes.
///
/// Compressed formats and ZIP are identified by magic number. A plain TAR is
/// identified by the `ustar` magic, or failing that by a `.tar` extension on
/// `name_hint` (pre-POSIX archives carry no magic).
///
/// # Errors
///
/// Returns `PackError::ArchiveUnreadable` if no format matches.
///
/// # Examples
///
/// ```
/// use cuepack_core::formats::detect::{ArchiveType, detect_format};
///
/// assert_eq!(detect_format(b"PK\x03\x04rest", None)?, ArchiveType::Zip);
/// assert_eq!(detect_format(&[0x1f, 0x8b, 0x08], None)?, ArchiveType::TarGz);
/// assert!(detect_format(b"hello", None).is_err());
/// # Ok::<(), cuepack_core::PackError>(())
/// ```
pub fn detect_format(prefix: &[u8], name_hint: Option<&Path>) -> Result<ArchiveType> {
    if prefix.starts_with(ZIP_LOCAL_HEADER) || prefix.starts_with(ZIP_EMPTY_ARCHIVE) {
        return Ok(ArchiveType::Zip);
    }
    if prefix.starts_with(GZIP_MAGIC) {
        return Ok(ArchiveType::TarGz);
    }
    if prefix.starts_with(BZIP2_MAGIC) {
        return Ok(ArchiveType::TarBz2);
    }
    if prefix.starts_with(XZ_MAGIC) {
        return Ok(ArchiveType::TarXz);
    }
    if prefix.starts_with(ZSTD_MAGIC) {
        return Ok(ArchiveType::TarZst);
    }
    if prefix
        .get(USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len())
        .is_some_and(|magic| magic == USTAR_MAGIC)
    {
        return Ok(ArchiveType::Tar);
    }
    if name_hint
        .and_then(Path::extension)
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tar"))
    {
        return Ok(ArchiveType::Tar);
    }

    Err(PackError::ArchiveUnreadable {
        reason: "unrecognized archive format".into(),
    })
}
