//! Store configuration.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Default name of the staging directory inside the packs directory.
pub const DEFAULT_STAGING_DIR_NAME: &str = ".staging";

/// Default cap on a downloaded archive (256 MiB).
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// Default overall timeout for a download.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for a [`PackStore`](crate::PackStore).
///
/// Only operational settings live here. The security limits (segment depth,
/// file size, allowed events, extensions and signatures) are compiled in, see
/// [`policy`](crate::policy).
///
/// # Examples
///
/// ```
/// use cuepack_core::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::new("/tmp/packs")
///     .with_max_download_bytes(64 * 1024 * 1024)
///     .with_download_timeout(Duration::from_secs(30));
///
/// assert_eq!(config.staging_dir(), std::path::Path::new("/tmp/packs/.staging"));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding installed packs, one subdirectory per pack id.
    pub packs_dir: PathBuf,

    /// Name of the scratch area inside `packs_dir`. Must start with `.` so it
    /// can never collide with a pack id.
    pub staging_dir_name: String,

    /// Maximum number of bytes accepted from a download.
    pub max_download_bytes: u64,

    /// Overall timeout for a download, connection included.
    pub download_timeout: Duration,

    /// `User-Agent` header sent with downloads.
    pub user_agent: String,
}

impl StoreConfig {
    /// Creates a configuration rooted at `packs_dir` with default settings.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(packs_dir: P) -> Self {
        Self {
            packs_dir: packs_dir.into(),
            staging_dir_name: DEFAULT_STAGING_DIR_NAME.to_owned(),
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            user_agent: concat!("cuepack/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }

    /// Sets the staging directory name.
    ///
    /// A name that does not start with `.` is prefixed with one.
    #[must_use]
    pub fn with_staging_dir_name<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();
        self.staging_dir_name = if name.starts_with('.') {
            name
        } else {
            format!(".{name}")
        };
        self
    }

    /// Sets the download size cap.
    #[must_use]
    pub const fn with_max_download_bytes(mut self, max: u64) -> Self {
        self.max_download_bytes = max;
        self
    }

    /// Sets the download timeout.
    #[must_use]
    pub const fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the staging directory path.
    #[must_use]
    pub fn staging_dir(&self) -> PathBuf {
        self.packs_dir.join(&self.staging_dir_name)
    }

    /// Returns the packs directory.
    #[must_use]
    pub fn packs_dir(&self) -> &Path {
        &self.packs_dir
    }
}
