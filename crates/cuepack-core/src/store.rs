//! The pack store: installed packs and the pipeline that publishes them.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use rand::seq::SliceRandom;

use crate::EventName;
use crate::PackError;
use crate::PackId;
use crate::Result;
use crate::StoreConfig;
use crate::download::HttpClient;
use crate::download::download_archive;
use crate::error::RejectReason;
use crate::extraction::ScratchDir;
use crate::extraction::extract_into;
use crate::extraction::publish;
use crate::extraction::retire;
use crate::extraction::stream::CopyBuffer;
use crate::extraction::stream::copy_capped;
use crate::formats::ArchiveInput;
use crate::inspection::audit_entries;
use crate::inspection::list::list_input;
use crate::policy::MAX_FILE_SIZE;
use crate::report::InstallReport;
use crate::report::ProgressCallback;
use crate::security::admission::admit_file;
use crate::security::admission::check_leaf;
use crate::security::admission::read_header;
use crate::security::sanitize_pack_dir;

/// Installed sound packs under one packs directory.
///
/// Each pack lives at `<packs_dir>/<pack-id>/<event>/<file>`. Installs run
/// the full pipeline in a private scratch directory inside the staging area
/// and only touch the live directory in the final rename. Publishes of the
/// same pack id are serialized by an in-process lock; reads take no lock.
///
/// # Examples
///
/// ```no_run
/// use cuepack_core::EventName;
/// use cuepack_core::PackId;
/// use cuepack_core::PackStore;
/// use cuepack_core::StoreConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = PackStore::open(StoreConfig::new("/home/me/.cuepack/packs"))?;
/// let id = PackId::parse("retro-beeps")?;
///
/// let report = store.install_archive("retro-beeps.zip", &id)?;
/// println!("installed {} sounds", report.files_installed);
///
/// if let Some(sound) = store.random_sound(&id, EventName::Stop)? {
///     println!("preview: {}", sound.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PackStore {
    config: StoreConfig,
    publish_locks: Mutex<HashMap<PackId, Arc<Mutex<()>>>>,
}

impl PackStore {
    /// Opens a store, creating the packs and staging directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory cannot be created.
    pub fn open(config: StoreConfig) -> Result<Self> {
        fs::create_dir_all(config.packs_dir())?;
        fs::create_dir_all(config.staging_dir())?;
        Ok(Self {
            config,
            publish_locks: Mutex::new(HashMap::new()),
        })
    }

    /// The store configuration.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Live directory of a pack, whether or not it is installed.
    #[must_use]
    pub fn live_dir(&self, pack_id: &PackId) -> PathBuf {
        self.config.packs_dir().join(pack_id.as_str())
    }

    /// Returns `true` if the pack is installed.
    #[must_use]
    pub fn contains(&self, pack_id: &PackId) -> bool {
        is_real_dir(&self.live_dir(pack_id))
    }

    /// Installs a pack from an archive file.
    ///
    /// The archive is listed and structurally audited, extracted into a
    /// scratch directory, sanitized there, and renamed over the live
    /// directory. A previous version is replaced as a whole.
    ///
    /// # Errors
    ///
    /// - [`PackError::ArchiveUnreadable`] or [`PackError::QuotaExceeded`] if
    ///   the archive cannot be listed
    /// - [`PackError::StructuralViolation`] carrying every violation found
    /// - [`PackError::ExtractionFailed`] if extraction fails
    /// - [`PackError::InstallFailed`] if the publish rename fails
    ///
    /// On every error the live directory is unchanged and the scratch
    /// directory is gone.
    pub fn install_archive<P: AsRef<Path>>(
        &self,
        archive_path: P,
        pack_id: &PackId,
    ) -> Result<InstallReport> {
        self.install_input(ArchiveInput::Path(archive_path.as_ref()), pack_id)
    }

    /// Installs a pack from an in-memory archive.
    ///
    /// # Errors
    ///
    /// Same as [`install_archive`](Self::install_archive).
    pub fn install_bytes(&self, bytes: &[u8], pack_id: &PackId) -> Result<InstallReport> {
        self.install_input(ArchiveInput::Bytes(bytes), pack_id)
    }

    /// Downloads an archive and installs it.
    ///
    /// The download lands in a temporary file inside the staging area that
    /// is deleted once the install finishes, fails or is cancelled. Setting
    /// `cancel` aborts the download; the live directory is never touched
    /// before the download completed.
    ///
    /// # Errors
    ///
    /// Download errors ([`PackError::DownloadFailed`],
    /// [`PackError::QuotaExceeded`], [`PackError::Cancelled`]) plus everything
    /// [`install_archive`](Self::install_archive) returns.
    pub async fn install_from_url<C: HttpClient>(
        &self,
        client: &C,
        url: &str,
        pack_id: &PackId,
        progress: &mut dyn ProgressCallback,
        cancel: &AtomicBool,
    ) -> Result<InstallReport> {
        let staging = self.config.staging_dir();
        fs::create_dir_all(&staging)?;

        let download =
            download_archive(client, url, &self.config, &staging, progress, cancel).await?;
        tracing::debug!(url, pack = %pack_id, "installing downloaded archive");
        self.install_archive(download.path(), pack_id)
    }

    fn install_input(&self, input: ArchiveInput<'_>, pack_id: &PackId) -> Result<InstallReport> {
        let started = Instant::now();

        let manifest = list_input(input)?;
        let violations = audit_entries(&manifest.entries, pack_id);
        if !violations.is_pass() {
            tracing::info!(
                pack = %pack_id,
                violations = violations.len(),
                "archive rejected by structural audit"
            );
            return Err(PackError::StructuralViolation { report: violations });
        }

        let staging = self.config.staging_dir();
        let scratch = ScratchDir::create(&staging, pack_id)?;
        let extracted = extract_into(input, &scratch, pack_id)?;
        let sanitized = sanitize_pack_dir(scratch.pack_root())?;
        if sanitized.files_kept == 0 {
            tracing::warn!(pack = %pack_id, "pack contains no admissible sounds");
        }

        let live = self.live_dir(pack_id);
        let replaced = {
            let lock = self.publish_lock(pack_id);
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            publish(scratch.pack_root(), &live, &staging).map_err(|source| {
                PackError::InstallFailed {
                    pack_id: pack_id.to_string(),
                    source,
                }
            })?
        };

        if let Err(err) = scratch.discard() {
            tracing::warn!(pack = %pack_id, error = %err, "failed to clean up scratch directory");
        }

        let report = InstallReport {
            pack_id: pack_id.clone(),
            files_installed: sanitized.files_kept,
            files_extracted: extracted.files_written,
            entries_removed: sanitized.removal_count(),
            replaced_existing: replaced,
            duration: started.elapsed(),
        };
        tracing::info!(
            pack = %pack_id,
            files = report.files_installed,
            removed = report.entries_removed,
            replaced = report.replaced_existing,
            "pack installed"
        );
        Ok(report)
    }

    /// Adds a single audio file to an installed pack.
    ///
    /// The source must pass the leaf checks (not a symlink, allowed
    /// extension, size limit, recognized signature). It is copied into a
    /// temporary file in the staging area, re-checked, and renamed into
    /// `<pack>/<event>/<file name>`, replacing a file of the same name.
    ///
    /// Returns the installed path.
    ///
    /// # Errors
    ///
    /// - [`PackError::PackNotFound`] if the pack is not installed
    /// - [`PackError::ContentRejected`] if the file fails admission
    /// - [`PackError::Io`] if copying fails
    pub fn add_sound(&self, pack_id: &PackId, event: EventName, source: &Path) -> Result<PathBuf> {
        admit_file(source)?;
        let file_name = source.file_name().ok_or_else(|| PackError::ContentRejected {
            path: source.to_path_buf(),
            reason: RejectReason::Unreadable,
        })?;

        let rejected = |reason| PackError::ContentRejected {
            path: source.to_path_buf(),
            reason,
        };

        // Filled in the staging area; only the final rename touches the live pack.
        let staging = self.config.staging_dir();
        fs::create_dir_all(&staging)?;
        let mut temp = tempfile::Builder::new()
            .prefix(".adding-")
            .tempfile_in(&staging)?;
        let mut input = File::open(source)?;
        let copied = copy_capped(
            &mut input,
            temp.as_file_mut(),
            MAX_FILE_SIZE + 1,
            &mut CopyBuffer::new(),
        )?;

        temp.as_file_mut().seek(SeekFrom::Start(0))?;
        let header = read_header(temp.as_file_mut())?;
        check_leaf(Path::new(file_name), copied, &header).map_err(rejected)?;

        let lock = self.publish_lock(pack_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let live = self.live_dir(pack_id);
        if !is_real_dir(&live) {
            return Err(PackError::PackNotFound {
                pack_id: pack_id.to_string(),
            });
        }
        let event_dir = live.join(event.as_str());
        match fs::symlink_metadata(&event_dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(PackError::Io(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("not a directory: {}", event_dir.display()),
                )));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => fs::create_dir(&event_dir)?,
            Err(e) => return Err(e.into()),
        }

        let dest = event_dir.join(file_name);
        temp.persist(&dest).map_err(|e| PackError::Io(e.error))?;

        tracing::info!(pack = %pack_id, event = %event, path = %dest.display(), "sound added");
        Ok(dest)
    }

    /// Installed pack ids, sorted.
    ///
    /// Hidden entries (the staging area among them), non-directories and
    /// names that are not valid pack ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the packs directory cannot be read.
    pub fn list_packs(&self) -> Result<Vec<PackId>> {
        let mut packs = Vec::new();
        for entry in fs::read_dir(self.config.packs_dir())? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if let Ok(id) = PackId::parse(&name) {
                packs.push(id);
            }
        }
        packs.sort();
        Ok(packs)
    }

    /// Sound files of a pack, grouped by event.
    ///
    /// Events without a directory are omitted. Files are sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::PackNotFound`] if the pack is not installed.
    pub fn pack_sounds(&self, pack_id: &PackId) -> Result<BTreeMap<EventName, Vec<PathBuf>>> {
        let live = self.live_dir(pack_id);
        if !is_real_dir(&live) {
            return Err(PackError::PackNotFound {
                pack_id: pack_id.to_string(),
            });
        }

        let mut sounds = BTreeMap::new();
        for event in EventName::ALL {
            if let Some(files) = event_files(&live.join(event.as_str()))? {
                sounds.insert(event, files);
            }
        }
        Ok(sounds)
    }

    /// Picks a random sound of a pack for an event.
    ///
    /// Returns `None` if the pack or the event has no sounds, including the
    /// short moment a replaced pack is absent during a publish. The chosen
    /// path may disappear if the pack is replaced right after; callers
    /// opening it should treat `NotFound` the same way.
    ///
    /// # Errors
    ///
    /// Returns an error only if the event directory exists but cannot be
    /// read.
    pub fn random_sound(&self, pack_id: &PackId, event: EventName) -> Result<Option<PathBuf>> {
        let dir = self.live_dir(pack_id).join(event.as_str());
        let files = event_files(&dir)?.unwrap_or_default();
        Ok(files.choose(&mut rand::thread_rng()).cloned())
    }

    /// Removes an installed pack.
    ///
    /// The live directory is renamed aside first, so readers see either the
    /// whole pack or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::PackNotFound`] if the pack is not installed.
    pub fn remove_pack(&self, pack_id: &PackId) -> Result<()> {
        let staging = self.config.staging_dir();
        fs::create_dir_all(&staging)?;

        let lock = self.publish_lock(pack_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let live = self.live_dir(pack_id);
        if !is_real_dir(&live) {
            return Err(PackError::PackNotFound {
                pack_id: pack_id.to_string(),
            });
        }
        if !retire(&live, &staging)? {
            return Err(PackError::PackNotFound {
                pack_id: pack_id.to_string(),
            });
        }

        tracing::info!(pack = %pack_id, "pack removed");
        Ok(())
    }

    /// The publish lock of `pack_id`.
    ///
    /// Entries only the map still references are held by nobody and are
    /// dropped, so the map stays bounded by the locks in use.
    fn publish_lock(&self, pack_id: &PackId) -> Arc<Mutex<()>> {
        let mut locks = self.publish_locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(pack_id.clone()).or_default())
    }
}

fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.is_dir())
}

/// Regular files directly inside `dir`, sorted, or `None` if `dir` is absent.
fn event_files(dir: &Path) -> Result<Option<Vec<PathBuf>>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        let is_file = entry.file_type().is_ok_and(|t| t.is_file());
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if is_file && !hidden {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(Some(files))
}
