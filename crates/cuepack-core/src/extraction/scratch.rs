//! Per-operation scratch directories.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::PackId;
use crate::Result;

/// Exclusively owned, uniquely named directory inside the staging area.
///
/// The archive is extracted to `<scratch>/<pack-id>/`, sanitized there and
/// finally renamed into the live location. Dropping a `ScratchDir` deletes
/// whatever is still inside, so every early return discards the scratch
/// state.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
    pack_root: PathBuf,
}

impl ScratchDir {
    /// Creates a fresh scratch directory under `staging_root`.
    ///
    /// `staging_root` must be on the same filesystem as the live packs
    /// directory for the final publish to be a rename.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create(staging_root: &Path, pack_id: &PackId) -> Result<Self> {
        fs::create_dir_all(staging_root)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{pack_id}-"))
            .tempdir_in(staging_root)?;
        let pack_root = dir.path().join(pack_id.as_str());
        Ok(Self { dir, pack_root })
    }

    /// The scratch directory itself (the extraction base).
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the pack directory ends up after extraction.
    #[must_use]
    pub fn pack_root(&self) -> &Path {
        &self.pack_root
    }

    /// Deletes the scratch directory now, reporting cleanup errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory could not be fully removed.
    pub fn discard(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_and_cleaned_up() {
        let staging = tempfile::TempDir::new().unwrap();
        let id = PackId::parse("chimes").unwrap();

        let a = ScratchDir::create(staging.path(), &id).unwrap();
        let b = ScratchDir::create(staging.path(), &id).unwrap();
        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with(staging.path()));
        assert_eq!(a.pack_root(), a.path().join("chimes"));

        let a_path = a.path().to_path_buf();
        fs::create_dir_all(a.pack_root().join("stop")).unwrap();
        drop(a);
        assert!(!a_path.exists());

        let b_path = b.path().to_path_buf();
        b.discard().unwrap();
        assert!(!b_path.exists());
    }

    #[test]
    fn test_creates_missing_staging_root() {
        let base = tempfile::TempDir::new().unwrap();
        let staging = base.path().join(".staging");
        let id = PackId::parse("chimes").unwrap();
        let scratch = ScratchDir::create(&staging, &id).unwrap();
        assert!(scratch.path().is_dir());
    }
}
