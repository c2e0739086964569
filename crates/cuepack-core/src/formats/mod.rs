//! Archive readers.
//!
//! Every supported container is read through [`walk_archive`], which detects
//! the format, enforces listing quotas and hands each entry to an
//! [`EntryVisitor`]. Listing, in-memory verification and extraction are all
//! visitors over the same walk.

pub mod detect;
pub(crate) mod tar;
pub mod traits;
pub(crate) mod zip;

use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use xz2::read::XzDecoder;
use zstd::stream::read::Decoder as ZstdDecoder;

use crate::PackError;
use crate::Result;
use crate::error::QuotaResource;
use crate::policy::MAX_ARCHIVE_ENTRIES;
use crate::policy::MAX_ARCHIVE_TOTAL_SIZE;

pub use detect::ArchiveType;
pub use traits::EntryVisitor;

/// Where archive bytes come from.
#[derive(Debug, Clone, Copy)]
pub enum ArchiveInput<'a> {
    /// An archive file on disk.
    Path(&'a Path),
    /// An archive held in memory.
    Bytes(&'a [u8]),
}

impl<'a> From<&'a Path> for ArchiveInput<'a> {
    fn from(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<&'a [u8]> for ArchiveInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Running entry count and declared size, checked against the listing quotas.
#[derive(Debug, Default)]
pub(crate) struct QuotaTracker {
    entries: usize,
    total_size: u64,
}

impl QuotaTracker {
    pub(crate) fn record(&mut self, size: u64) -> Result<()> {
        self.entries += 1;
        if self.entries > MAX_ARCHIVE_ENTRIES {
            return Err(PackError::QuotaExceeded {
                resource: QuotaResource::EntryCount {
                    current: self.entries,
                    max: MAX_ARCHIVE_ENTRIES,
                },
            });
        }

        self.total_size = self.total_size.saturating_add(size);
        if self.total_size > MAX_ARCHIVE_TOTAL_SIZE {
            return Err(PackError::QuotaExceeded {
                resource: QuotaResource::TotalSize {
                    current: self.total_size,
                    max: MAX_ARCHIVE_TOTAL_SIZE,
                },
            });
        }
        Ok(())
    }
}

/// Detects the archive format and visits every entry in archive order.
///
/// Returns the detected format.
///
/// # Errors
///
/// Returns `PackError::ArchiveUnreadable` for unknown, corrupt, encrypted or
/// unsupported archives, `PackError::QuotaExceeded` when the entry count or
/// declared size exceeds the listing quotas, and any error the visitor
/// returns.
pub fn walk_archive(
    input: ArchiveInput<'_>,
    visitor: &mut dyn EntryVisitor,
) -> Result<ArchiveType> {
    let (mut reader, hint): (Box<dyn ReadSeek + '_>, Option<&Path>) = match input {
        ArchiveInput::Path(path) => (Box::new(File::open(path)?), Some(path)),
        ArchiveInput::Bytes(bytes) => (Box::new(Cursor::new(bytes)), None),
    };

    let mut prefix = Vec::with_capacity(detect::DETECT_PREFIX_LEN);
    reader
        .by_ref()
        .take(detect::DETECT_PREFIX_LEN as u64)
        .read_to_end(&mut prefix)?;
    reader.seek(SeekFrom::Start(0))?;

    let format = detect::detect_format(&prefix, hint)?;
    let mut quota = QuotaTracker::default();

    match format {
        ArchiveType::Zip => self::zip::walk_zip(reader, visitor, &mut quota)?,
        ArchiveType::Tar => self::tar::walk_tar(BufReader::new(reader), visitor, &mut quota)?,
        ArchiveType::TarGz => {
            self::tar::walk_tar(GzDecoder::new(BufReader::new(reader)), visitor, &mut quota)?;
        }
        ArchiveType::TarBz2 => {
            self::tar::walk_tar(BzDecoder::new(BufReader::new(reader)), visitor, &mut quota)?;
        }
        ArchiveType::TarXz => {
            self::tar::walk_tar(XzDecoder::new(BufReader::new(reader)), visitor, &mut quota)?;
        }
        ArchiveType::TarZst => {
            let decoder = ZstdDecoder::new(reader).map_err(|e| {
                PackError::ArchiveUnreadable {
                    reason: format!("failed to initialize zstd decoder: {e}"),
                }
            })?;
            self::tar::walk_tar(decoder, visitor, &mut quota)?;
        }
    }

    Ok(format)
}
