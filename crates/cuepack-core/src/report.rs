//! Install reporting and progress callbacks.

use std::time::Duration;

use crate::PackId;

/// Report of a completed pack installation.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// The installed pack.
    pub pack_id: PackId,

    /// Audio files present in the published pack.
    pub files_installed: usize,

    /// Files written by extraction, before sanitization.
    pub files_extracted: usize,

    /// Entries deleted by the sanitizer, empty directories included.
    pub entries_removed: usize,

    /// Whether an existing version of the pack was replaced.
    pub replaced_existing: bool,

    /// Wall-clock duration of the pipeline.
    pub duration: Duration,
}

impl InstallReport {
    /// Returns `true` if the sanitizer dropped anything.
    #[must_use]
    pub const fn had_removals(&self) -> bool {
        self.entries_removed > 0
    }
}

/// Callback trait for download progress.
///
/// The trait requires `Send` so a callback can be moved into async tasks.
///
/// # Examples
///
/// ```
/// use cuepack_core::ProgressCallback;
///
/// struct Percent;
///
/// impl ProgressCallback for Percent {
///     fn on_progress(&mut self, downloaded: u64, total: Option<u64>) {
///         if let Some(total) = total {
///             println!("{}%", downloaded * 100 / total.max(1));
///         }
///     }
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called after each received chunk.
    ///
    /// `total` is the announced length, if the server sent one.
    fn on_progress(&mut self, downloaded: u64, total: Option<u64>);

    /// Called once the transfer finished successfully.
    fn on_complete(&mut self);
}

/// Fraction of a transfer completed, in `[0.0, 1.0]`.
///
/// Returns `None` when the total is unknown.
#[must_use]
pub fn progress_fraction(downloaded: u64, total: Option<u64>) -> Option<f64> {
    match total {
        Some(0) => Some(1.0),
        Some(total) => Some((downloaded as f64 / total as f64).clamp(0.0, 1.0)),
        None => None,
    }
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_progress(&mut self, _downloaded: u64, _total: Option<u64>) {}

    fn on_complete(&mut self) {}
}
