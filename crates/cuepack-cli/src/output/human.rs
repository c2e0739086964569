//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use cuepack_core::ArchiveManifest;
use cuepack_core::EntryKind;
use cuepack_core::EventName;
use cuepack_core::InstallReport;
use cuepack_core::PackId;
use cuepack_core::VerificationReport;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn success_line(&self, message: &str) {
        if self.use_colors {
            self.line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            self.line(message);
        }
    }

    fn warning_line(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn file_label(path: &Path) -> String {
        path.file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_validation(
        &self,
        archive: &Path,
        pack_id: &PackId,
        report: &VerificationReport,
    ) -> Result<()> {
        if report.passes() {
            if self.verbose {
                self.success_line(&format!(
                    "{}: pack '{pack_id}' passed ({} entries, {})",
                    archive.display(),
                    Self::format_number(report.total_entries),
                    report.format
                ));
            }
            return Ok(());
        }

        // One line per problem, even with --quiet.
        for message in report.messages() {
            self.line(&message);
        }
        Ok(())
    }

    fn format_manifest(
        &self,
        manifest: &ArchiveManifest,
        long: bool,
        human_readable: bool,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if !long {
            for entry in &manifest.entries {
                self.line(&entry.path);
            }
            return Ok(());
        }

        for entry in &manifest.entries {
            let size_str = if human_readable {
                Self::format_size(entry.size)
            } else {
                entry.size.to_string()
            };
            let type_char = match entry.kind {
                EntryKind::File => "-",
                EntryKind::Directory => "d",
                EntryKind::Symlink => "l",
            };
            self.line(&format!("{type_char} {size_str:>10}  {}", entry.path));
        }

        self.line("");
        self.line(&format!(
            "Total: {} entries, {} ({})",
            Self::format_number(manifest.total_entries),
            Self::format_size(manifest.total_size),
            manifest.format
        ));
        Ok(())
    }

    fn format_install_result(&self, report: &InstallReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.success_line(&format!("Installed pack '{}'", report.pack_id));
        self.line(&format!(
            "  Sounds:  {}",
            Self::format_number(report.files_installed)
        ));
        if report.had_removals() {
            self.line(&format!(
                "  Removed: {} (failed content checks)",
                Self::format_number(report.entries_removed)
            ));
        }
        if report.replaced_existing {
            self.line("  Replaced the previously installed version");
        }

        if self.verbose {
            self.line(&format!(
                "  Extracted: {}",
                Self::format_number(report.files_extracted)
            ));
            self.line(&format!("  Duration: {:?}", report.duration));
        }

        if report.files_installed == 0 {
            self.warning_line("the installed pack contains no sounds");
        }
        Ok(())
    }

    fn format_sound_added(&self, pack_id: &PackId, event: EventName, path: &Path) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.success_line(&format!(
            "Added {} to {pack_id}/{event}",
            Self::file_label(path)
        ));
        if self.verbose {
            self.line(&format!("  {}", path.display()));
        }
        Ok(())
    }

    fn format_packs(&self, packs: &[PackId]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        for pack in packs {
            self.line(pack.as_str());
        }
        if packs.is_empty() && self.verbose {
            self.line("No packs installed");
        }
        Ok(())
    }

    fn format_sounds(
        &self,
        pack_id: &PackId,
        sounds: &BTreeMap<EventName, Vec<PathBuf>>,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            self.line(&format!("{}", style(pack_id).bold()));
        } else {
            self.line(pack_id.as_str());
        }
        for (event, files) in sounds {
            self.line(&format!("  {event} ({})", files.len()));
            for file in files {
                if self.verbose {
                    self.line(&format!("    {}", file.display()));
                } else {
                    self.line(&format!("    {}", Self::file_label(file)));
                }
            }
        }
        Ok(())
    }

    fn format_pick(&self, pack_id: &PackId, event: EventName, sound: Option<&Path>) -> Result<()> {
        match sound {
            Some(path) if !self.quiet => self.line(&path.display().to_string()),
            Some(_) => {}
            None => self.warning_line(&format!("pack '{pack_id}' has no sounds for {event}")),
        }
        Ok(())
    }

    fn format_removed(&self, pack_id: &PackId) -> Result<()> {
        if !self.quiet {
            self.success_line(&format!("Removed pack '{pack_id}'"));
        }
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}
