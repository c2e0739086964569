//! Download progress display for CLI installs.

use console::Term;
use cuepack_core::ProgressCallback;
use cuepack_core::report::progress_fraction;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use std::fmt::Write;

/// CLI progress bar wrapper implementing `ProgressCallback`.
///
/// Starts as a spinner and switches to a bar once the server announces a
/// length. Cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    sized: bool,
}

impl CliProgress {
    /// Creates a spinner labelled with `message`.
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_message(message.to_string());
        Self { bar, sized: false }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} {bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .with_key("bytes", |state: &ProgressState, w: &mut dyn Write| {
                write!(w, "{}", humanize_bytes(state.pos())).unwrap_or(());
            })
            .with_key("bytes_per_sec", |state: &ProgressState, w: &mut dyn Write| {
                write!(w, "{}/s", humanize_rate(state.per_sec())).unwrap_or(());
            })
    }

    fn bar_style() -> ProgressStyle {
        // "Downloading [████████░░░░] 42% (1.2 MB, 512.0 KB/s, 3s)"
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {percent} ({bytes}, {bytes_per_sec}, {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
                let fraction = progress_fraction(state.pos(), state.len()).unwrap_or(0.0);
                write!(w, "{:.0}%", fraction * 100.0).unwrap_or(());
            })
            .with_key("bytes", |state: &ProgressState, w: &mut dyn Write| {
                write!(w, "{}", humanize_bytes(state.pos())).unwrap_or(());
            })
            .with_key("bytes_per_sec", |state: &ProgressState, w: &mut dyn Write| {
                write!(w, "{}/s", humanize_rate(state.per_sec())).unwrap_or(());
            })
            .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                write!(w, "{}", humanize_duration(state.eta())).unwrap_or(());
            })
            .progress_chars("█▓░")
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_progress(&mut self, downloaded: u64, total: Option<u64>) {
        if let Some(total) = total
            && !self.sized
        {
            self.bar.set_length(total);
            self.bar.set_style(Self::bar_style());
            self.sized = true;
        }
        self.bar.set_position(downloaded);
        if !self.sized {
            self.bar.tick();
        }
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn humanize_rate(per_sec: f64) -> String {
    humanize_bytes(per_sec as u64)
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
