//! One-shot entry points over the pipeline.

use std::path::Path;

use crate::PackId;
use crate::Result;
use crate::StoreConfig;
use crate::inspection::ValidationReport;
use crate::inspection::audit_entries;
use crate::inspection::list_archive;
use crate::report::InstallReport;
use crate::store::PackStore;

/// Lists an archive and runs the structural audit on its entries.
///
/// Nothing is written to disk. The report holds every violation, in entry
/// order; an empty report means the archive may be extracted.
///
/// # Errors
///
/// Returns an error if the archive cannot be listed.
///
/// # Examples
///
/// ```no_run
/// use cuepack_core::PackId;
/// use cuepack_core::audit_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let id = PackId::parse("retro-beeps")?;
/// let report = audit_archive("retro-beeps.tar.gz", &id)?;
/// assert!(report.is_pass());
/// # Ok(())
/// # }
/// ```
pub fn audit_archive<P: AsRef<Path>>(
    archive_path: P,
    pack_id: &PackId,
) -> Result<ValidationReport> {
    let manifest = list_archive(archive_path)?;
    Ok(audit_entries(&manifest.entries, pack_id))
}

/// Installs an archive into the packs directory named by `config`.
///
/// Convenience wrapper opening a [`PackStore`] for a single install.
///
/// # Errors
///
/// Same as [`PackStore::install_archive`].
///
/// # Examples
///
/// ```no_run
/// use cuepack_core::PackId;
/// use cuepack_core::StoreConfig;
/// use cuepack_core::install_pack;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoreConfig::new("/tmp/packs");
/// let report = install_pack("retro-beeps.zip", &config, &PackId::parse("retro-beeps")?)?;
/// println!("installed {} sounds", report.files_installed);
/// # Ok(())
/// # }
/// ```
pub fn install_pack<P: AsRef<Path>>(
    archive_path: P,
    config: &StoreConfig,
    pack_id: &PackId,
) -> Result<InstallReport> {
    PackStore::open(config.clone())?.install_archive(archive_path, pack_id)
}
