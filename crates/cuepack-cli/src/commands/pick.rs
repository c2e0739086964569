//! Pick command implementation.

use crate::cli::PickArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use cuepack_core::PackStore;

pub fn execute(args: &PickArgs, store: &PackStore, formatter: &dyn OutputFormatter) -> Result<()> {
    let sound = add_archive_context(
        store.random_sound(&args.pack, args.event),
        args.pack.as_str(),
    )?;
    formatter.format_pick(&args.pack, args.event, sound.as_deref())
}
