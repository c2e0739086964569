//! Subcommand implementations.

pub mod add;
pub mod completion;
pub mod install;
pub mod list;
pub mod packs;
pub mod pick;
pub mod remove;
pub mod sounds;
pub mod validate;

use crate::cli::Cli;
use crate::error::add_archive_context;
use anyhow::Result;
use cuepack_core::PackStore;
use cuepack_core::StoreConfig;

/// Opens the pack store named by `--packs-dir`, creating it if needed.
pub fn open_store(cli: &Cli) -> Result<PackStore> {
    let packs_dir = cli.resolve_packs_dir()?;
    let subject = packs_dir.display().to_string();
    tracing::debug!(packs_dir = %subject, "opening pack store");
    add_archive_context(PackStore::open(StoreConfig::new(packs_dir)), &subject)
}
