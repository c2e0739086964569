//! TAR entry walker.

use std::io::Read;

use crate::PackError;
use crate::Result;
use crate::inspection::ArchiveEntry;
use crate::inspection::EntryKind;

use super::QuotaTracker;
use super::traits::EntryVisitor;

/// Walks every entry of a (decompressed) TAR stream.
///
/// Metadata records (PAX and GNU long-name headers) are consumed by the `tar`
/// crate or skipped here; they never reach the visitor.
pub(crate) fn walk_tar<R: Read>(
    reader: R,
    visitor: &mut dyn EntryVisitor,
    quota: &mut QuotaTracker,
) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    let entries = archive.entries().map_err(|e| PackError::ArchiveUnreadable {
        reason: format!("failed to read TAR entries: {e}"),
    })?;

    for entry_result in entries {
        let mut entry = entry_result.map_err(|e| PackError::ArchiveUnreadable {
            reason: format!("failed to read TAR entry: {e}"),
        })?;

        let path = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let Some(kind) = classify(entry.header().entry_type(), &path)? else {
            continue;
        };
        let size = if kind == EntryKind::File {
            entry.size()
        } else {
            0
        };

        quota.record(size)?;
        visitor.visit(&ArchiveEntry::new(path, kind, size), &mut entry)?;
    }

    Ok(())
}

/// Maps a TAR header type onto an entry kind.
///
/// Returns `None` for metadata records. Device nodes and FIFOs make the whole
/// archive unreadable.
fn classify(entry_type: tar::EntryType, path: &str) -> Result<Option<EntryKind>> {
    match entry_type {
        tar::EntryType::Regular | tar::EntryType::Continuous | tar::EntryType::GNUSparse => {
            Ok(Some(EntryKind::File))
        }
        tar::EntryType::Directory => Ok(Some(EntryKind::Directory)),
        tar::EntryType::Symlink | tar::EntryType::Link => Ok(Some(EntryKind::Symlink)),
        tar::EntryType::XGlobalHeader
        | tar::EntryType::XHeader
        | tar::EntryType::GNULongName
        | tar::EntryType::GNULongLink => Ok(None),
        tar::EntryType::Char | tar::EntryType::Block | tar::EntryType::Fifo => {
            Err(PackError::ArchiveUnreadable {
                reason: format!("special file (device or FIFO) not supported: {path}"),
            })
        }
        other => Err(PackError::ArchiveUnreadable {
            reason: format!("unsupported TAR entry type {:#x}: {path}", other.as_byte()),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;

    fn collect(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
        let mut entries = Vec::new();
        let mut quota = QuotaTracker::default();
        let mut visitor = |entry: &ArchiveEntry, _: &mut dyn Read| -> Result<()> {
            entries.push(entry.clone());
            Ok(())
        };
        walk_tar(data, &mut visitor, &mut quota)?;
        Ok(entries)
    }

    #[test]
    fn test_kinds() {
        let data = TarTestBuilder::new()
            .add_directory("p/stop/")
            .add_file("p/stop/a.wav", b"RIFF")
            .add_symlink("p/stop/b.wav", "/etc/passwd")
            .add_hardlink("p/stop/c.wav", "p/stop/a.wav")
            .build();

        let entries = collect(&data).unwrap();
        let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntryKind::Directory,
                EntryKind::File,
                EntryKind::Symlink,
                EntryKind::Symlink
            ]
        );
        assert_eq!(entries[1].size, 4);
        assert_eq!(entries[2].size, 0);
    }

    #[test]
    fn test_raw_traversal_path_preserved() {
        let data = TarTestBuilder::new()
            .add_raw_file("mypack/../../etc/passwd", b"root:x:0:0")
            .build();
        let entries = collect(&data).unwrap();
        assert_eq!(entries[0].path, "mypack/../../etc/passwd");
    }

    #[test]
    fn test_fifo_is_unreadable() {
        let data = TarTestBuilder::new().add_fifo("p/stop/pipe").build();
        assert!(matches!(
            collect(&data),
            Err(PackError::ArchiveUnreadable { .. })
        ));
    }

    #[test]
    fn test_long_path_resolved() {
        let long = format!("p/stop/{}.wav", "a".repeat(150));
        let data = TarTestBuilder::new().add_file(&long, b"x").build();
        let entries = collect(&data).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, long);
    }

    #[test]
    fn test_truncated_archive() {
        let data = TarTestBuilder::new()
            .add_file("p/stop/a.wav", &[0u8; 2048])
            .build();
        assert!(collect(&data[..700]).is_err());
    }
}
