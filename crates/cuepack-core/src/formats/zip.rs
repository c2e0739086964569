//! ZIP entry walker.

use std::io::Read;
use std::io::Seek;

use crate::PackError;
use crate::Result;
use crate::inspection::ArchiveEntry;
use crate::inspection::EntryKind;

use super::QuotaTracker;
use super::traits::EntryVisitor;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Walks every entry of a ZIP archive in central-directory order.
///
/// Encrypted entries and unsupported compression methods fail when the entry
/// is opened, which makes the archive unreadable.
pub(crate) fn walk_zip<R: Read + Seek>(
    reader: R,
    visitor: &mut dyn EntryVisitor,
    quota: &mut QuotaTracker,
) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| PackError::ArchiveUnreadable {
        reason: format!("failed to open ZIP archive: {e}"),
    })?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| PackError::ArchiveUnreadable {
                reason: format!("failed to read ZIP entry {i}: {e}"),
            })?;

        let kind = if is_symlink_mode(file.unix_mode()) {
            EntryKind::Symlink
        } else if file.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let size = if kind == EntryKind::File { file.size() } else { 0 };
        let entry = ArchiveEntry::new(file.name(), kind, size);

        quota.record(size)?;
        visitor.visit(&entry, &mut file)?;
    }

    Ok(())
}

fn is_symlink_mode(mode: Option<u32>) -> bool {
    mode.is_some_and(|m| m & S_IFMT == S_IFLNK)
}
