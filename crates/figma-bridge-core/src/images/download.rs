//! Download orchestrator: fetch image URLs to local files, each independently.
//!
//! A failed download only degrades its own slot; siblings keep running and
//! are reported. Outcomes stay positionally tied to their requests no matter
//! which transfer finishes first.

use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{AssetOutcome, ResolvedAsset};
use crate::sanitize::sanitize_file_name;
use crate::storage::{self, StorageWriter};

/// Fetches one URL into a temp file. Blocking; called from `spawn_blocking`.
pub trait AssetFetcher: Send + Sync {
    /// Returns the number of bytes written.
    fn fetch_into(&self, url: &str, storage: &StorageWriter) -> Result<u64>;
}

/// Plain libcurl GET. Image URLs are pre-signed, so no credential is sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlFetcher;

impl AssetFetcher for CurlFetcher {
    fn fetch_into(&self, url: &str, storage: &StorageWriter) -> Result<u64> {
        let offset = Arc::new(AtomicU64::new(0));
        let offset_cb = Arc::clone(&offset);
        let storage = storage.clone();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(move |data| {
                let off = offset_cb.fetch_add(data.len() as u64, Ordering::Relaxed);
                match storage.write_at(off, data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        tracing::warn!("asset write failed: {}", e);
                        Ok(0) // abort transfer
                    }
                }
            })?;
            transfer.perform().context("GET request failed")?;
        }

        let code = easy.response_code().context("no response code")?;
        if !(200..300).contains(&code) {
            anyhow::bail!("GET {} returned HTTP {}", url, code);
        }

        Ok(offset.load(Ordering::Relaxed))
    }
}

/// Blocking body of a download: temp file, fetch, sync, rename.
/// Every failure removes the temp file before returning.
fn fetch_to_path(fetcher: &dyn AssetFetcher, url: &str, final_path: &Path) -> Result<u64> {
    let writer = StorageWriter::create(&storage::temp_path_for(final_path))?;
    let written = fetcher.fetch_into(url, &writer).and_then(|n| {
        writer.sync()?;
        Ok(n)
    });
    match written {
        Ok(n) => {
            writer.finalize(final_path)?;
            Ok(n)
        }
        Err(e) => {
            writer.discard();
            Err(e)
        }
    }
}

/// Persists remote images under a target directory.
#[derive(Clone)]
pub struct Downloader {
    fetcher: Arc<dyn AssetFetcher>,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new(Arc::new(CurlFetcher))
    }
}

impl Downloader {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch `url` into `target_dir/file_name` (name sanitized) and return the path.
    ///
    /// Bytes go to `<name>.part` first and are renamed into place on success.
    pub async fn download(&self, file_name: &str, target_dir: &Path, url: &str) -> Result<PathBuf> {
        let safe_name = sanitize_file_name(file_name);
        if safe_name.is_empty() {
            anyhow::bail!("file name {:?} has no usable characters", file_name);
        }

        tokio::fs::create_dir_all(target_dir)
            .await
            .with_context(|| format!("create target dir: {}", target_dir.display()))?;

        let final_path = target_dir.join(&safe_name);

        let bytes = tokio::task::spawn_blocking({
            let fetcher = Arc::clone(&self.fetcher);
            let url = url.to_string();
            let final_path = final_path.clone();
            move || fetch_to_path(fetcher.as_ref(), &url, &final_path)
        })
        .await
        .map_err(|e| {
            // The task died mid-transfer; its temp file may still be on disk.
            storage::remove_temp(&storage::temp_path_for(&final_path));
            anyhow::anyhow!("download task join: {}", e)
        })??;

        tracing::debug!(bytes, "saved {}", final_path.display());
        Ok(final_path)
    }

    /// Download every resolved asset concurrently. Output position `i` belongs to input `i`.
    ///
    /// `None` URLs yield `Unresolved` without a fetch; fetch or write errors yield `Failed`.
    pub async fn download_all(&self, target_dir: &Path, assets: Vec<ResolvedAsset>) -> Vec<AssetOutcome> {
        let jobs = assets.into_iter().map(|asset| async move {
            let Some(url) = asset.remote_url else {
                return AssetOutcome::Unresolved;
            };
            let file_name = asset.request.file_name();
            match self.download(file_name, target_dir, &url).await {
                Ok(path) => AssetOutcome::Saved(path),
                Err(e) => {
                    tracing::warn!(
                        node_id = asset.request.node_id(),
                        "failed to download {} from {}: {:#}",
                        file_name,
                        url,
                        e
                    );
                    AssetOutcome::Failed(format!("{:#}", e))
                }
            }
        });
        join_all(jobs).await
    }
}
