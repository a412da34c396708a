// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! linecat - molecular spectroscopy line catalogs from CDMS and JPL.
//!
//! Builds one local index from the two archives' listing pages, filters it
//! by name and mass number, and downloads the selected `cNNNNNN.cat` files.
//!
//! # Core Modules
//!
//! - [`catalog`] - Entry model, shared entry store, archive URLs
//! - [`ingest`] - Fetching and parsing both listing pages
//! - [`filter`] - Name/mass filtering and view ordering
//! - [`download`] - Sequential catalog downloads with per-entry outcomes
//! - [`progress`] - Shared status text for the background units
//! - [`config`] - Persistent settings
//! - [`error`] - Error kinds and user-facing error formatting
//!
//! # Example
//!
//! ```no_run
//! use linecat::{CatalogIngestor, DownloadManager, EntryStore, FilterEngine, ProgressChannel};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = linecat::load_config()?;
//! let client = config.http_client()?;
//! let store = EntryStore::new();
//! let progress = ProgressChannel::new();
//!
//! let report = CatalogIngestor::new(client.clone(), config.archives(), store.clone(), progress.clone())
//!     .spawn()
//!     .await?;
//! println!("{} entries", report.total());
//!
//! let view = FilterEngine::with_inputs("H2O", "18").visible(&store.snapshot());
//! view.iter().for_each(|e| e.set_selected(true));
//!
//! let summary = DownloadManager::new(client, config.archives(), progress)
//!     .spawn(&view, config.destination_dir())
//!     .await?;
//! println!("{}", summary.completion_message());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod download;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod locks;
pub mod progress;

pub use catalog::{catalog_filename, Archives, CatalogEntry, EntryStore, Origin};
pub use config::{load_config, save_config, Config};
pub use download::{DownloadManager, DownloadSummary, EntryOutcome, EntryStatus};
pub use error::{CatalogError, ErrorBuilder};
pub use filter::{apply_filters, sort_entries, sort_entries_by, FilterEngine, SortKey, SortOrder};
pub use ingest::{CatalogIngestor, IngestReport};
pub use progress::ProgressChannel;
