//! Rename-based publish and retire of live pack directories.

use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempDir;

/// Moves `staged` into place at `live`, replacing any previous version.
///
/// The previous live directory is first renamed aside into a holder directory
/// inside `staging_root`, then `staged` is renamed to `live`. If the second
/// rename fails, the previous version is renamed back. Both renames stay on
/// one filesystem, so a reader sees either the old tree or the new one, never
/// a mix. Between the two renames `live` is briefly absent.
///
/// Returns `true` if a previous version was replaced.
///
/// # Errors
///
/// Returns the underlying I/O error if either rename fails. In that case the
/// previous live directory (if any) has been restored.
pub fn publish(staged: &Path, live: &Path, staging_root: &Path) -> io::Result<bool> {
    let holder = tempfile::Builder::new()
        .prefix(".replaced-")
        .tempdir_in(staging_root)?;
    let backup = holder.path().join("previous");

    let replaced = match fs::rename(live, &backup) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e),
    };

    if let Err(err) = fs::rename(staged, live) {
        if replaced {
            match fs::rename(&backup, live) {
                Ok(()) => tracing::warn!(
                    live = %live.display(),
                    "publish failed, previous version restored"
                ),
                Err(restore) => tracing::error!(
                    live = %live.display(),
                    backup = %backup.display(),
                    error = %restore,
                    "publish failed and previous version could not be restored"
                ),
            }
        }
        return Err(err);
    }

    discard_holder(holder);
    Ok(replaced)
}

/// Removes the live directory by renaming it aside and deleting it there.
///
/// Readers never observe a partially deleted pack. Returns `false` if there
/// was nothing to remove.
///
/// # Errors
///
/// Returns an error if the rename fails.
pub fn retire(live: &Path, staging_root: &Path) -> io::Result<bool> {
    let holder = tempfile::Builder::new()
        .prefix(".removed-")
        .tempdir_in(staging_root)?;

    match fs::rename(live, holder.path().join("previous")) {
        Ok(()) => {
            discard_holder(holder);
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn discard_holder(holder: TempDir) {
    let path = holder.path().to_path_buf();
    if let Err(err) = holder.close() {
        tracing::warn!(
            path = %path.display(),
            error = %err,
            "failed to delete previous pack version"
        );
    }
}
