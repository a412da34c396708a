// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Catalog ingestion from the CDMS and JPL listing pages.
//!
//! Ingestion runs two phases in order, CDMS then JPL, and appends each
//! phase's entries to the shared [`EntryStore`] once the page parsed
//! cleanly. The first failing phase stops the run: later phases are not
//! attempted, entries from completed phases stay in the store, and the
//! failure is reported on the progress channel and in the returned
//! [`IngestReport`].
//!
//! ```text
//! CatalogIngestor::spawn ──▶ tokio task
//!        │                      │  "Reading CDMS data..."   GET cdms/
//!        │                      │  "Reading JPL data..."    GET jpl/catdir.html
//!        │                      │  "Done. Total entries : N"
//!        ▼                      ▼
//!   JoinHandle<IngestReport>   EntryStore (append-only)
//! ```

pub mod parse;

use anyhow::Result;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::catalog::{Archives, CatalogEntry, EntryStore};
use crate::error::CatalogError;
use crate::progress::ProgressChannel;
use parse::{parse_cdms_listing, parse_jpl_listing, ListingRow};

pub use parse::{parse_cdms_row, parse_jpl_line, parse_tag, CDMS_SOURCE, JPL_SOURCE};

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    /// Entries appended from the CDMS listing.
    pub cdms_entries: usize,
    /// Entries appended from the JPL listing.
    pub jpl_entries: usize,
    /// Reason the run stopped early, if it did.
    pub error: Option<String>,
}

impl IngestReport {
    /// Entries appended across both phases.
    pub fn total(&self) -> usize {
        self.cdms_entries + self.jpl_entries
    }

    /// Whether both phases finished.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetches both archive listings into an entry store.
#[derive(Debug, Clone)]
pub struct CatalogIngestor {
    client: reqwest::Client,
    archives: Archives,
    store: EntryStore,
    progress: ProgressChannel,
}

impl CatalogIngestor {
    /// Create an ingestor that appends to `store`.
    pub fn new(
        client: reqwest::Client,
        archives: Archives,
        store: EntryStore,
        progress: ProgressChannel,
    ) -> Self {
        Self {
            client,
            archives,
            store,
            progress,
        }
    }

    /// Store the entries are appended to.
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Run ingestion as a background task.
    pub fn spawn(self) -> JoinHandle<IngestReport> {
        tokio::spawn(async move { self.ingest().await })
    }

    /// Run both phases. Never fails; see [`IngestReport::error`].
    pub async fn ingest(&self) -> IngestReport {
        let mut report = IngestReport::default();

        if let Err(e) = self.run_phases(&mut report).await {
            tracing::error!(
                cdms = report.cdms_entries,
                jpl = report.jpl_entries,
                "Catalog ingestion aborted: {:#}",
                e
            );
            self.progress.set(format!("Error: {}", e));
            report.error = Some(format!("{:#}", e));
        }

        report
    }

    async fn run_phases(&self, report: &mut IngestReport) -> Result<()> {
        self.progress.set("Reading CDMS data...");
        let page = self.fetch_text(self.archives.cdms_listing_url()).await?;
        report.cdms_entries = self.append(parse_cdms_listing(&page)?);
        tracing::info!("Read {} CDMS entries", report.cdms_entries);

        self.progress.set("Reading JPL data...");
        let page = self.fetch_text(&self.archives.jpl_listing_url()).await?;
        report.jpl_entries = self.append(parse_jpl_listing(&page)?);
        tracing::info!("Read {} JPL entries", report.jpl_entries);

        self.progress.set(format!("Done. Total entries : {}", self.store.len()));
        Ok(())
    }

    fn append(&self, rows: Vec<ListingRow>) -> usize {
        self.store
            .extend(rows.into_iter().map(|(tag, name)| CatalogEntry::new(tag, name)))
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
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

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::fetch(url, e))?;
        Ok(body)
    }
}
