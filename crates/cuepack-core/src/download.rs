//! Streaming download of pack archives.
//!
//! The transport sits behind [`HttpClient`] so the download loop can be
//! driven by an in-memory client in tests. [`ReqwestClient`] is the
//! production implementation, available with the `download` feature.

use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use bytes::Bytes;
use futures_util::Stream;
use futures_util::StreamExt;
use tempfile::NamedTempFile;

use crate::PackError;
use crate::Result;
use crate::StoreConfig;
use crate::error::QuotaResource;
use crate::report::ProgressCallback;

/// A boxed stream of response body chunks.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Response head plus streaming body.
pub struct HttpResponse<E> {
    /// HTTP status code.
    pub status: u16,

    /// Announced body length, if any.
    pub content_length: Option<u64>,

    /// Body chunks.
    pub body: BoxStream<'static, std::result::Result<Bytes, E>>,
}

impl<E> std::fmt::Debug for HttpResponse<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Minimal asynchronous HTTP client used by [`download_archive`].
///
/// Implementations follow redirects on their own. Transport errors are
/// reported through `Self::Error` and surface as
/// [`PackError::DownloadFailed`].
pub trait HttpClient: Send + Sync {
    /// Transport error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issues a `GET` request and returns the response with a streaming body.
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "download")]
mod reqwest_impl {
    use super::HttpClient;
    use super::HttpResponse;
    use crate::PackError;
    use crate::Result;
    use crate::StoreConfig;

    /// [`HttpClient`] backed by `reqwest` with rustls.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Builds a client sending the configured user agent.
        ///
        /// # Errors
        ///
        /// Returns [`PackError::DownloadFailed`] if the TLS backend cannot be
        /// initialized.
        pub fn new(config: &StoreConfig) -> Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.download_timeout)
                .build()
                .map_err(|e| PackError::DownloadFailed {
                    reason: e.to_string(),
                })?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(
            &self,
            url: &str,
        ) -> std::result::Result<HttpResponse<Self::Error>, Self::Error> {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let content_length = response.content_length();
            let body = Box::pin(response.bytes_stream());

            Ok(HttpResponse {
                status,
                content_length,
                body,
            })
        }
    }
}

#[cfg(feature = "download")]
pub use reqwest_impl::ReqwestClient;

/// Downloads `url` into a temporary file inside `dest_dir`.
///
/// The whole transfer, connection included, is bounded by
/// `config.download_timeout`, and the body may not exceed
/// `config.max_download_bytes`. `cancel` is checked before the request and
/// between chunks. The temporary file is deleted on every error path.
///
/// # Errors
///
/// - [`PackError::DownloadFailed`] for a non-HTTP URL, a transport error, a
///   non-success status, a timeout, or a body shorter than announced
/// - [`PackError::QuotaExceeded`] if the body is larger than the cap
/// - [`PackError::Cancelled`] if `cancel` was set
/// - [`PackError::Io`] if the temporary file cannot be written
pub async fn download_archive<C: HttpClient>(
    client: &C,
    url: &str,
    config: &StoreConfig,
    dest_dir: &Path,
    progress: &mut dyn ProgressCallback,
    cancel: &AtomicBool,
) -> Result<NamedTempFile> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(PackError::DownloadFailed {
            reason: format!("unsupported URL: {url}"),
        });
    }

    let transfer = transfer(client, url, config, dest_dir, progress, cancel);
    match tokio::time::timeout(config.download_timeout, transfer).await {
        Ok(result) => result,
        Err(_) => Err(PackError::DownloadFailed {
            reason: format!(
                "timed out after {}s",
                config.download_timeout.as_secs_f64()
            ),
        }),
    }
}

async fn transfer<C: HttpClient>(
    client: &C,
    url: &str,
    config: &StoreConfig,
    dest_dir: &Path,
    progress: &mut dyn ProgressCallback,
    cancel: &AtomicBool,
) -> Result<NamedTempFile> {
    check_cancelled(cancel)?;

    let response = client.get(url).await.map_err(transport_error)?;
    if !(200..300).contains(&response.status) {
        return Err(PackError::DownloadFailed {
            reason: format!("server returned HTTP {}", response.status),
        });
    }

    let cap = config.max_download_bytes;
    let total = response.content_length;
    if total.is_some_and(|total| total > cap) {
        return Err(PackError::QuotaExceeded {
            resource: QuotaResource::DownloadSize { max: cap },
        });
    }

    let mut file = tempfile::Builder::new()
        .prefix(".download-")
        .tempfile_in(dest_dir)?;
    let mut downloaded: u64 = 0;
    let mut body = response.body;

    while let Some(chunk) = body.next().await {
        check_cancelled(cancel)?;
        let chunk = chunk.map_err(transport_error)?;

        downloaded = downloaded.saturating_add(chunk.len() as u64);
        if downloaded > cap {
            return Err(PackError::QuotaExceeded {
                resource: QuotaResource::DownloadSize { max: cap },
            });
        }

        file.write_all(&chunk)?;
        progress.on_progress(downloaded, total);
    }

    if let Some(total) = total
        && downloaded != total
    {
        return Err(PackError::DownloadFailed {
            reason: format!("partial transfer: received {downloaded} of {total} bytes"),
        });
    }

    file.flush()?;
    progress.on_complete();
    tracing::debug!(url, bytes = downloaded, "download complete");
    Ok(file)
}

fn check_cancelled(cancel: &AtomicBool) -> Result<()> {
    if cancel.load(Ordering::Relaxed) {
        Err(PackError::Cancelled)
    } else {
        Ok(())
    }
}

fn transport_error<E: std::error::Error>(err: E) -> PackError {
    PackError::DownloadFailed {
        reason: err.to_string(),
    }
}
