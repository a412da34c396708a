// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Name and mass filtering of catalog entries, plus view ordering.
//!
//! Filtering is a pure function of both inputs: every recomputation applies
//! the current name text AND the current mass text. Sorting is a separate
//! step applied to the filtered view.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::catalog::CatalogEntry;

/// True if `name_text` is empty or a case-sensitive substring of the name.
pub fn matches_name(entry: &CatalogEntry, name_text: &str) -> bool {
    name_text.is_empty() || entry.name().contains(name_text)
}

/// Mass constraint of a filter text. `None` means no constraint, which is
/// also what text that is not an integer resolves to.
pub fn parse_mass(mass_text: &str) -> Option<i64> {
    let trimmed = mass_text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<i64>() {
        Ok(mass) => Some(mass),
        Err(_) => {
            tracing::debug!("Ignoring non-numeric mass filter {:?}", mass_text);
            None
        }
    }
}

/// Mass filter predicate. Unparseable text matches everything.
pub fn matches_mass(entry: &CatalogEntry, mass_text: &str) -> bool {
    match parse_mass(mass_text) {
        Some(mass) => i64::from(entry.mass()) == mass,
        None => true,
    }
}

/// Entries passing both criteria, in their original order.
pub fn apply_filters(
    name_text: &str,
    mass_text: &str,
    entries: &[Arc<CatalogEntry>],
) -> Vec<Arc<CatalogEntry>> {
    entries
        .iter()
        .filter(|e| matches_name(e, name_text) && matches_mass(e, mass_text))
        .cloned()
        .collect()
}

/// Current filter inputs, each editable on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterEngine {
    name_text: String,
    mass_text: String,
}

impl FilterEngine {
    /// Engine with both inputs empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with both inputs preset.
    pub fn with_inputs(name_text: impl Into<String>, mass_text: impl Into<String>) -> Self {
        Self {
            name_text: name_text.into(),
            mass_text: mass_text.into(),
        }
    }

    /// Replace the name input.
    pub fn set_name_text(&mut self, text: impl Into<String>) {
        self.name_text = text.into();
    }

    /// Replace the mass input.
    pub fn set_mass_text(&mut self, text: impl Into<String>) {
        self.mass_text = text.into();
    }

    /// Current name input.
    pub fn name_text(&self) -> &str {
        &self.name_text
    }

    /// Current mass input.
    pub fn mass_text(&self) -> &str {
        &self.mass_text
    }

    /// Whether either input narrows the view.
    pub fn is_active(&self) -> bool {
        !self.name_text.is_empty() || parse_mass(&self.mass_text).is_some()
    }

    /// Visible subset under both current inputs.
    pub fn visible(&self, entries: &[Arc<CatalogEntry>]) -> Vec<Arc<CatalogEntry>> {
        apply_filters(&self.name_text, &self.mass_text, entries)
    }
}

/// Column a view is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Tag,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortKey {
    /// Ascending comparison on this column.
    pub fn compare(&self, a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
        match self {
            SortKey::Tag => a.tag().cmp(&b.tag()),
            SortKey::Name => a.name().cmp(b.name()).then_with(|| a.tag().cmp(&b.tag())),
        }
    }
}

/// Stable sort of a view with a caller-supplied comparator.
pub fn sort_entries_by<F>(entries: &mut [Arc<CatalogEntry>], mut compare: F)
where
    F: FnMut(&CatalogEntry, &CatalogEntry) -> Ordering,
{
    entries.sort_by(|a, b| compare(a, b));
}

/// Sort a view by one column.
pub fn sort_entries(entries: &mut [Arc<CatalogEntry>], key: SortKey, order: SortOrder) {
    sort_entries_by(entries, |a, b| {
        let ord = key.compare(a, b);
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
}
