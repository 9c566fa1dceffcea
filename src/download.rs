//! Raw distribution download
//!
//! Fetches an archive over HTTP straight to disk. There is no retry at
//! this layer; any failure is returned to the caller.

use crate::error::{ProvisionError, ProvisionResult};
use crate::ui::{DownloadProgress, UiContext};
use async_trait::async_trait;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Format bytes as human-readable size (e.g., "1.5 MB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Moves bytes from a URL to a local file
#[async_trait]
pub trait Transport: Send + Sync {
    /// Download `url` to `dest`, replacing anything already there
    async fn download(&self, url: &str, dest: &Path) -> ProvisionResult<()>;
}

/// HTTP transport backed by ureq
pub struct HttpTransport {
    ui: UiContext,
}

impl HttpTransport {
    pub fn new(ui: UiContext) -> Self {
        Self { ui }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn download(&self, url: &str, dest: &Path) -> ProvisionResult<()> {
        let ui = self.ui;
        let url_owned = url.to_string();
        let dest_owned = dest.to_path_buf();

        let size = tokio::task::spawn_blocking(move || download_blocking(&ui, &url_owned, &dest_owned))
            .await
            .map_err(|e| ProvisionError::Internal(format!("download task failed: {}", e)))??;

        info!(
            "Downloaded {} to {} (size {})",
            url,
            dest.display(),
            format_bytes(size)
        );
        Ok(())
    }
}

fn download_blocking(ui: &UiContext, url: &str, dest: &Path) -> ProvisionResult<u64> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ProvisionError::io(format!("creating {}", parent.display()), e))?;
    }

    debug!("Requesting {}", url);
    let response = ureq::get(url)
        .header("User-Agent", concat!("gradle-provision/", env!("CARGO_PKG_VERSION")))
        .call()
        .map_err(|e| ProvisionError::download(url, e))?;

    let total = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let label = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "distribution".to_string());
    let progress = DownloadProgress::new(ui, &label, total);

    let result = store_body(&progress, response.into_body().into_reader(), dest)
        .map_err(|e| ProvisionError::download(url, e));
    progress.finish();
    result
}

/// Per-process sibling of `dest` the body is streamed into
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.part", std::process::id()));
    dest.with_file_name(name)
}

/// Stream `reader` to a partial file and rename it over `dest`
///
/// `dest` is either untouched or fully replaced.
fn store_body(progress: &DownloadProgress, reader: impl io::Read, dest: &Path) -> io::Result<u64> {
    let partial = partial_path(dest);
    let result = write_body(progress, reader, &partial)
        .and_then(|written| std::fs::rename(&partial, dest).map(|()| written));
    if result.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    result
}

fn write_body(progress: &DownloadProgress, reader: impl io::Read, dest: &Path) -> io::Result<u64> {
    let file = File::create(dest)?;
    let mut writer = BufWriter::new(file);
    let written = io::copy(&mut progress.wrap(reader), &mut writer)?;
    writer.flush()?;
    Ok(written)
}
