//! Install command implementation.

use crate::cli::InstallArgs;
use crate::cli::pack_id_from_source;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use cuepack_core::InstallReport;
use cuepack_core::NoopProgress;
use cuepack_core::PackError;
use cuepack_core::PackId;
use cuepack_core::PackStore;
use cuepack_core::ProgressCallback;
use cuepack_core::ReqwestClient;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Installs from a local archive or an http(s) URL.
///
/// `show_progress` enables the download bar; it is still suppressed when
/// stdout is not a terminal.
pub fn execute(
    args: &InstallArgs,
    store: &PackStore,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let pack_id = match &args.pack {
        Some(id) => id.clone(),
        None => pack_id_from_source(&args.source)?,
    };

    let report = if is_url(&args.source) {
        install_url(&args.source, &pack_id, store, show_progress && CliProgress::should_show())?
    } else {
        add_archive_context(
            store.install_archive(Path::new(&args.source), &pack_id),
            &args.source,
        )?
    };

    formatter.format_install_result(&report)
}

fn is_url(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn install_url(
    url: &str,
    pack_id: &PackId,
    store: &PackStore,
    show_progress: bool,
) -> Result<InstallReport> {
    let client = add_archive_context(ReqwestClient::new(store.config()), url)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let mut progress: Box<dyn ProgressCallback> = if show_progress {
        Box::new(CliProgress::new("Downloading"))
    } else {
        Box::new(NoopProgress)
    };
    let cancel = AtomicBool::new(false);

    let result = runtime.block_on(async {
        let interrupted = async {
            // Without a signal handler, never resolve.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = store.install_from_url(
                &client,
                url,
                pack_id,
                progress.as_mut(),
                &cancel,
            ) => result,
            () = interrupted => {
                cancel.store(true, Ordering::SeqCst);
                tracing::info!(url, "download interrupted");
                Err(PackError::Cancelled)
            }
        }
    });

    add_archive_context(result, url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/beeps.zip"));
        assert!(is_url("HTTP://example.com/beeps.zip"));
        assert!(!is_url("beeps.zip"));
        assert!(!is_url("ftp://example.com/beeps.zip"));
        assert!(!is_url("/tmp/https/beeps.zip"));
    }
}
