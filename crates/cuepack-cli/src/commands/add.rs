//! Add command implementation.

use crate::cli::AddArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use cuepack_core::PackStore;

pub fn execute(args: &AddArgs, store: &PackStore, formatter: &dyn OutputFormatter) -> Result<()> {
    let subject = args.file.display().to_string();
    let placed = add_archive_context(
        store.add_sound(&args.pack, args.event, &args.file),
        &subject,
    )?;
    formatter.format_sound_added(&args.pack, args.event, &placed)
}
