//! Archive listing implementation.

use std::io::Read;
use std::path::Path;

use crate::Result;
use crate::formats::ArchiveInput;
use crate::formats::walk_archive;
use crate::inspection::manifest::ArchiveEntry;
use crate::inspection::manifest::ArchiveManifest;

/// Lists archive contents without extracting.
///
/// Entry paths are reported exactly as stored. No files are written to disk.
///
/// # Errors
///
/// Returns error if:
/// - Archive file cannot be opened
/// - Archive format is unrecognized, corrupted or encrypted
/// - Quota limits exceeded (entry count, total size)
///
/// # Examples
///
/// ```no_run
/// use cuepack_core::list_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let manifest = list_archive("pack.zip")?;
///
/// println!("Archive contains {} entries", manifest.total_entries);
/// for entry in manifest.entries {
///     println!("{} ({}): {} bytes", entry.path, entry.kind.as_str(), entry.size);
/// }
/// # Ok(())
/// # }
/// ```
pub fn list_archive<P: AsRef<Path>>(archive_path: P) -> Result<ArchiveManifest> {
    list_input(ArchiveInput::Path(archive_path.as_ref()))
}

/// Lists an in-memory archive.
///
/// # Errors
///
/// Same as [`list_archive`].
pub fn list_bytes(bytes: &[u8]) -> Result<ArchiveManifest> {
    list_input(ArchiveInput::Bytes(bytes))
}

/// Lists an archive from any input.
///
/// # Errors
///
/// Same as [`list_archive`].
pub fn list_input(input: ArchiveInput<'_>) -> Result<ArchiveManifest> {
    let mut entries = Vec::new();
    let mut collect = |entry: &ArchiveEntry, _: &mut dyn Read| -> Result<()> {
        entries.push(entry.clone());
        Ok(())
    };
    let format = walk_archive(input, &mut collect)?;

    let mut manifest = ArchiveManifest::new(format);
    for entry in entries {
        manifest.add_entry(entry);
    }
    Ok(manifest)
}
