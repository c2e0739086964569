//! In-place content sanitizer for an extracted pack directory.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use walkdir::DirEntry;
use walkdir::WalkDir;

use crate::EventName;
use crate::PackError;
use crate::Result;
use crate::error::RejectReason;
use crate::security::admission::check_file;

/// An entry removed by the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Path of the removed entry.
    pub path: PathBuf,
    /// Rule that triggered the removal.
    pub reason: RejectReason,
}

/// Outcome of [`sanitize_pack_dir`].
#[derive(Debug, Clone, Default)]
pub struct SanitizeReport {
    /// Entries removed by a content rule, children before parents.
    pub removed: Vec<Removal>,
    /// Directories removed because they ended up empty.
    pub empty_dirs_removed: usize,
    /// Audio files left in place.
    pub files_kept: usize,
}

impl SanitizeReport {
    /// Total number of filesystem entries removed.
    #[must_use]
    pub fn removal_count(&self) -> usize {
        self.removed.len() + self.empty_dirs_removed
    }
}

#[derive(Debug)]
struct Marked {
    path: PathBuf,
    depth: usize,
    is_dir: bool,
    reason: RejectReason,
}

/// Sanitizes a pack directory in place.
///
/// `root` is the pack directory itself (`<pack-id>/`). Afterwards every
/// remaining file sits at `<root>/<event>/<file>`, has an allow-listed
/// extension, is at most 10 MiB and starts with a recognized audio
/// signature. Everything else is deleted, then directories left empty are
/// pruned. Symlinks are removed without being read or followed.
///
/// Running the sanitizer on an already sanitized directory removes nothing.
///
/// # Errors
///
/// Returns an error if `root` is not a real directory, or if the tree cannot
/// be walked or an entry cannot be deleted.
pub fn sanitize_pack_dir(root: &Path) -> Result<SanitizeReport> {
    let root_meta = fs::symlink_metadata(root)?;
    if !root_meta.is_dir() {
        return Err(PackError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("pack root is not a directory: {}", root.display()),
        )));
    }

    let mut report = SanitizeReport::default();
    let mut marked = Vec::new();

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(next) = walker.next() {
        let entry = match next {
            Ok(entry) => entry,
            Err(err) if is_not_found(&err) => continue,
            Err(err) => return Err(walk_error(err)),
        };

        let verdict = classify(&entry);
        if entry.file_type().is_dir() && verdict.is_err() {
            walker.skip_current_dir();
        }
        match verdict {
            Ok(true) => report.files_kept += 1,
            Ok(false) => {}
            Err(reason) => marked.push(Marked {
                path: entry.path().to_path_buf(),
                depth: entry.depth(),
                is_dir: entry.file_type().is_dir(),
                reason,
            }),
        }
    }

    marked.sort_by(|a, b| b.depth.cmp(&a.depth));
    for item in marked {
        tracing::debug!(
            path = %item.path.display(),
            reason = %item.reason,
            "removing pack entry"
        );
        remove_entry(&item.path, item.is_dir)?;
        report.removed.push(Removal {
            path: item.path,
            reason: item.reason,
        });
    }

    report.empty_dirs_removed = prune_empty_dirs(root)?;
    Ok(report)
}

/// Decides the fate of one entry: `Ok(true)` for a kept file, `Ok(false)` for
/// a kept directory, `Err` for removal.
fn classify(entry: &DirEntry) -> std::result::Result<bool, RejectReason> {
    let file_type = entry.file_type();
    let depth = entry.depth();

    if file_type.is_symlink() {
        return Err(RejectReason::Symlink);
    }

    if file_type.is_dir() {
        return match depth {
            1 if is_event_dir(entry.path()) => Ok(false),
            1 => Err(RejectReason::UnknownEvent),
            _ => Err(RejectReason::UnexpectedLocation),
        };
    }

    if !file_type.is_file() {
        return Err(RejectReason::NotRegularFile);
    }
    if depth != 2 {
        return Err(RejectReason::UnexpectedLocation);
    }
    if !entry.path().parent().is_some_and(is_event_dir) {
        return Err(RejectReason::UnknownEvent);
    }

    check_file(entry.path()).map(|_| true)
}

fn is_event_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(EventName::from_name)
        .is_some()
}

fn remove_entry(path: &Path, is_dir: bool) -> Result<()> {
    let result = if is_dir {
        fs::remove_dir_all(path)
    } else {
        // A symlink to a directory needs remove_dir on some platforms.
        fs::remove_file(path).or_else(|err| match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => fs::remove_dir(path),
            _ => Err(err),
        })
    };

    match result {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
        _ => Ok(()),
    }
}

/// Removes directories below `root` that contain nothing, deepest first.
fn prune_empty_dirs(root: &Path) -> Result<usize> {
    let mut removed = 0;
    for next in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
    {
        let entry = match next {
            Ok(entry) => entry,
            Err(err) if is_not_found(&err) => continue,
            Err(err) => return Err(walk_error(err)),
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let is_empty = fs::read_dir(entry.path())?.next().is_none();
        if is_empty {
            tracing::debug!(path = %entry.path().display(), "removing empty directory");
            fs::remove_dir(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

fn walk_error(err: walkdir::Error) -> PackError {
    let message = err.to_string();
    err.into_io_error()
        .map_or_else(|| PackError::Io(io::Error::other(message)), PackError::Io)
}
