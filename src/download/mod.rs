// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Catalog file downloads.
//!
//! A run walks the entries flagged `selected` in view order and fetches
//! each catalog file into the destination directory, one at a time:
//!
//! ```text
//! DownloadManager::spawn(view, dest)
//!     │  selection read once, here
//!     ▼
//! tokio task ── for each selected entry ──▶ "Downloading <url> ..."
//!     │                                     GET <archive>/cNNNNNN.cat
//!     │                                     stream to dest/cNNNNNN.cat
//!     │                                     "" (step finished)
//!     ▼
//! JoinHandle<DownloadSummary>
//! ```
//!
//! A failed entry is logged and recorded in the summary; the run moves on.

pub mod manager;
pub mod types;

pub use manager::DownloadManager;
pub use types::{DownloadSummary, EntryOutcome, EntryStatus};
