//! Packs command implementation.

use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use cuepack_core::PackStore;

pub fn execute(store: &PackStore, formatter: &dyn OutputFormatter) -> Result<()> {
    let subject = store.config().packs_dir().display().to_string();
    let packs = add_archive_context(store.list_packs(), &subject)?;
    formatter.format_packs(&packs)
}
