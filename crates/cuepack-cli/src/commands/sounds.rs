//! Sounds command implementation.

use crate::cli::PackArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use cuepack_core::PackStore;

pub fn execute(args: &PackArgs, store: &PackStore, formatter: &dyn OutputFormatter) -> Result<()> {
    let sounds = add_archive_context(store.pack_sounds(&args.pack), args.pack.as_str())?;
    formatter.format_sounds(&args.pack, &sounds)
}
