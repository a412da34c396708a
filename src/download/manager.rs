// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Download manager for catalog files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;

use super::types::{DownloadSummary, EntryOutcome, EntryStatus};
use crate::catalog::{Archives, CatalogEntry};
use crate::error::CatalogError;
use crate::progress::ProgressChannel;

/// Sequential downloader for selected catalog entries.
///
/// Downloads within a run never overlap, so the progress text always names
/// the file currently in flight and only one file in the destination is
/// being written at a time.
#[derive(Debug, Clone)]
pub struct DownloadManager {
    client: reqwest::Client,
    archives: Archives,
    progress: ProgressChannel,
}

impl DownloadManager {
    /// Create a manager that reports on `progress`.
    pub fn new(client: reqwest::Client, archives: Archives, progress: ProgressChannel) -> Self {
        Self {
            client,
            archives,
            progress,
        }
    }

    /// Entries of `view` selected right now, in view order.
    pub fn selected_batch(view: &[Arc<CatalogEntry>]) -> Vec<Arc<CatalogEntry>> {
        view.iter().filter(|e| e.is_selected()).cloned().collect()
    }

    /// Start a run in the background.
    ///
    /// Selection flags are read before this returns; changing them afterwards
    /// does not affect the run.
    pub fn spawn(
        &self,
        view: &[Arc<CatalogEntry>],
        destination: impl Into<PathBuf>,
    ) -> JoinHandle<DownloadSummary> {
        let batch = Self::selected_batch(view);
        let destination = destination.into();
        let manager = self.clone();
        tokio::spawn(async move { manager.download_batch(&batch, &destination).await })
    }

    /// Download every selected entry of `view` into `destination`.
    pub async fn download_selected(
        &self,
        view: &[Arc<CatalogEntry>],
        destination: &Path,
    ) -> DownloadSummary {
        let batch = Self::selected_batch(view);
        self.download_batch(&batch, destination).await
    }

    /// Download `batch` in order, regardless of selection flags.
    pub async fn download_batch(
        &self,
        batch: &[Arc<CatalogEntry>],
        destination: &Path,
    ) -> DownloadSummary {
        let mut summary = DownloadSummary::start();

        if let Err(e) = tokio::fs::create_dir_all(destination).await {
            tracing::warn!(
                "Could not create download directory {}: {}",
                destination.display(),
                e
            );
        }

        for entry in batch {
            let outcome = self.download_entry(entry, destination).await;
            summary.outcomes.push(outcome);
        }

        summary.finished_at = Utc::now();
        tracing::info!(
            attempted = summary.attempted(),
            failed = summary.failure_count(),
            "Download run finished"
        );
        summary
    }

    async fn download_entry(&self, entry: &CatalogEntry, destination: &Path) -> EntryOutcome {
        let url = self.archives.download_url(entry);
        let path = destination.join(entry.filename());

        self.progress.set(format!("Downloading {} ...", url));

        let status = match self.fetch_to_file(&url, &path).await {
            Ok(bytes) => {
                tracing::debug!(tag = entry.tag(), bytes, "Saved {}", path.display());
                EntryStatus::Succeeded { bytes }
            }
            Err(e) => {
                tracing::warn!(tag = entry.tag(), url = %url, "Download failed: {:#}", e);
                EntryStatus::Failed {
                    error: format!("{:#}", e),
                }
            }
        };

        self.progress.clear();

        EntryOutcome {
            tag: entry.tag(),
            name: entry.name().to_string(),
            url,
            path,
            status,
        }
    }

    /// Stream `url` into `path`, replacing any existing file.
    ///
    /// A partially written file is removed on failure.
    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::fetch(url, format!("HTTP {}", status)).into());
        }

        let mut file = File::create(path)
            .await
            .map_err(|e| CatalogError::write(path, e))?;

        match stream_body(response, &mut file, url, path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                drop(file);
                if let Err(rm) = tokio::fs::remove_file(path).await {
                    tracing::debug!("Could not remove partial file {}: {}", path.display(), rm);
                }
                Err(e)
            }
        }
    }
}

async fn stream_body(
    response: reqwest::Response,
    file: &mut File,
    url: &str,
    path: &Path,
) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| CatalogError::fetch(url, e))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| CatalogError::write(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| CatalogError::write(path, e))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> Vec<Arc<CatalogEntry>> {
        vec![
            Arc::new(CatalogEntry::new(28503, "CO")),
            Arc::new(CatalogEntry::new(18003, "H2O")),
            Arc::new(CatalogEntry::new(17002, "NH3")),
        ]
    }

    #[test]
    fn test_selected_batch_keeps_view_order() {
        let view = view();
        view[2].set_selected(true);
        view[0].set_selected(true);

        let batch = DownloadManager::selected_batch(&view);
        let tags: Vec<u32> = batch.iter().map(|e| e.tag()).collect();
        assert_eq!(tags, vec![28503, 17002]);
    }

    #[test]
    fn test_selected_batch_is_a_snapshot() {
        let view = view();
        view[1].set_selected(true);
        let batch = DownloadManager::selected_batch(&view);

        view[1].set_selected(false);
        view[2].set_selected(true);

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].tag(), 18003);
    }

    #[tokio::test]
    async fn test_empty_selection_attempts_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        let progress = ProgressChannel::new();
        let manager = DownloadManager::new(reqwest::Client::new(), Archives::default(), progress.clone());

        let summary = manager.download_selected(&view(), temp.path()).await;

        assert_eq!(summary.attempted(), 0);
        assert!(summary.all_succeeded());
        assert!(progress.is_idle());
    }
}
