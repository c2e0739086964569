//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::cli::pack_id_from_source;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use cuepack_core::verify_archive;

/// Runs both audit phases without writing anything to disk.
///
/// Returns whether the archive passed.
pub fn execute(args: &ValidateArgs, formatter: &dyn OutputFormatter) -> Result<bool> {
    let subject = args.archive.display().to_string();
    let pack_id = match &args.pack {
        Some(id) => id.clone(),
        None => pack_id_from_source(&subject)?,
    };

    let report = add_archive_context(verify_archive(&args.archive, &pack_id), &subject)?;
    formatter.format_validation(&args.archive, &pack_id, &report)?;

    Ok(report.passes())
}
