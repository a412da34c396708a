// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shared, append-only entry store.
//!
//! Ingestion pushes entries while the shell reads snapshots and flips
//! selection flags. Entries are handed out as `Arc`s so a snapshot stays
//! valid while the store keeps growing, and selection changes made through
//! any handle are visible everywhere.

use std::sync::{Arc, RwLock};

use super::entry::CatalogEntry;
use crate::locks::{resilient_read, resilient_write};

/// Append-only collection of ingested entries. Cloning shares the store.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Arc<RwLock<Vec<Arc<CatalogEntry>>>>,
}

impl EntryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry and return the shared handle to it.
    pub fn push(&self, entry: CatalogEntry) -> Arc<CatalogEntry> {
        let entry = Arc::new(entry);
        resilient_write(&self.entries).push(Arc::clone(&entry));
        entry
    }

    /// Append a batch of entries under a single lock.
    pub fn extend(&self, entries: impl IntoIterator<Item = CatalogEntry>) -> usize {
        let mut guard = resilient_write(&self.entries);
        let before = guard.len();
        guard.extend(entries.into_iter().map(Arc::new));
        guard.len() - before
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        resilient_read(&self.entries).len()
    }

    /// Whether nothing has been ingested yet.
    pub fn is_empty(&self) -> bool {
        resilient_read(&self.entries).is_empty()
    }

    /// Current entries in insertion order.
    pub fn snapshot(&self) -> Vec<Arc<CatalogEntry>> {
        resilient_read(&self.entries).clone()
    }

    /// First entry carrying `tag`.
    pub fn find(&self, tag: u32) -> Option<Arc<CatalogEntry>> {
        resilient_read(&self.entries)
            .iter()
            .find(|e| e.tag() == tag)
            .cloned()
    }

    /// Set the selection flag of every entry carrying `tag`.
    ///
    /// Returns how many entries matched.
    pub fn set_selected(&self, tag: u32, selected: bool) -> usize {
        self.select_where(|e| e.tag() == tag, selected)
    }

    /// Set the selection flag of every entry matching `pred`.
    ///
    /// `pred` runs against a snapshot, without the store lock held, so it may
    /// read or append to the store. Entries appended meanwhile are not visited.
    pub fn select_where<F>(&self, mut pred: F, selected: bool) -> usize
    where
        F: FnMut(&CatalogEntry) -> bool,
    {
        let mut matched = 0;
        for entry in self.snapshot() {
            if pred(&entry) {
                entry.set_selected(selected);
                matched += 1;
            }
        }
        matched
    }

    /// Unselect every entry.
    pub fn clear_selection(&self) {
        for entry in resilient_read(&self.entries).iter() {
            entry.set_selected(false);
        }
    }

    /// Number of entries currently selected.
    pub fn selected_count(&self) -> usize {
        resilient_read(&self.entries)
            .iter()
            .filter(|e| e.is_selected())
            .count()
    }
}
