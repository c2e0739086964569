//! Archive manifest types.

use crate::formats::detect::ArchiveType;

/// Kind of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link, or a TAR hard link.
    Symlink,
}

impl EntryKind {
    /// Returns a short lowercase name for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
        }
    }
}

/// Metadata for a single archive entry.
///
/// `path` is reported exactly as stored in the archive. It is not normalized
/// and may contain `..`, a leading `/` or backslashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry path as stored.
    pub path: String,

    /// Entry kind.
    pub kind: EntryKind,

    /// Declared uncompressed size in bytes (zero for non-files).
    pub size: u64,
}

impl ArchiveEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new<S: Into<String>>(path: S, kind: EntryKind, size: u64) -> Self {
        Self {
            path: path.into(),
            kind,
            size,
        }
    }

    /// Shorthand for a file entry.
    #[must_use]
    pub fn file<S: Into<String>>(path: S, size: u64) -> Self {
        Self::new(path, EntryKind::File, size)
    }

    /// Shorthand for a directory entry.
    #[must_use]
    pub fn directory<S: Into<String>>(path: S) -> Self {
        Self::new(path, EntryKind::Directory, 0)
    }

    /// Shorthand for a symlink entry.
    #[must_use]
    pub fn symlink<S: Into<String>>(path: S) -> Self {
        Self::new(path, EntryKind::Symlink, 0)
    }
}

/// Archive manifest with entry metadata.
#[derive(Debug, Clone)]
pub struct ArchiveManifest {
    /// Detected archive format.
    pub format: ArchiveType,

    /// Entries in archive order.
    pub entries: Vec<ArchiveEntry>,

    /// Total number of entries.
    pub total_entries: usize,

    /// Sum of declared file sizes, in bytes.
    pub total_size: u64,
}

impl ArchiveManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub const fn new(format: ArchiveType) -> Self {
        Self {
            format,
            entries: Vec::new(),
            total_entries: 0,
            total_size: 0,
        }
    }

    /// Appends an entry and updates totals.
    pub fn add_entry(&mut self, entry: ArchiveEntry) {
        self.total_entries += 1;
        self.total_size = self.total_size.saturating_add(entry.size);
        self.entries.push(entry);
    }

    /// Number of file entries.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .count()
    }
}
