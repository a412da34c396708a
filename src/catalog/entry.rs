// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Catalog entry model.
//!
//! A tag packs two things into one 6-digit number: the molecular mass in the
//! leading digits and an origin code in the hundreds digit. CDMS entries carry
//! a non-zero origin code, JPL entries carry zero.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

/// Largest tag that still fits the 6-digit catalog filename.
pub const MAX_TAG: u32 = 999_999;

/// Remote archive that hosts an entry's catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Origin {
    /// Cologne Database for Molecular Spectroscopy (origin code 1-9)
    Cdms,
    /// JPL Molecular Spectroscopy catalog (origin code 0)
    Jpl,
}

impl Origin {
    /// Map an origin code to its archive.
    pub fn from_code(code: u32) -> Self {
        if code > 0 {
            Origin::Cdms
        } else {
            Origin::Jpl
        }
    }

    /// Short label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            Origin::Cdms => "CDMS",
            Origin::Jpl => "JPL",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Origin code of a tag: its hundreds digit.
pub fn origin_code(tag: u32) -> u32 {
    (tag / 100) % 10
}

/// Mass number of a tag: everything above the last three digits.
pub fn mass_of(tag: u32) -> u32 {
    tag / 1000
}

/// Local and remote filename of a catalog, e.g. `c000012.cat`.
pub fn catalog_filename(tag: u32) -> String {
    format!("c{:06}.cat", tag)
}

/// A single line-catalog entry.
///
/// `tag` and `name` never change after creation. `selected` is flipped by
/// whoever drives the selection and read by the download manager when a run
/// is triggered.
#[derive(Debug)]
pub struct CatalogEntry {
    tag: u32,
    name: String,
    selected: AtomicBool,
}

impl CatalogEntry {
    /// Create an unselected entry.
    pub fn new(tag: u32, name: impl Into<String>) -> Self {
        Self {
            tag,
            name: name.into(),
            selected: AtomicBool::new(false),
        }
    }

    /// Six-digit catalog tag.
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Molecule name as listed by the archive.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hundreds digit of the tag.
    pub fn origin_code(&self) -> u32 {
        origin_code(self.tag)
    }

    /// Archive the catalog file lives in.
    pub fn origin(&self) -> Origin {
        Origin::from_code(self.origin_code())
    }

    /// Mass number encoded in the tag.
    pub fn mass(&self) -> u32 {
        mass_of(self.tag)
    }

    /// Catalog filename for this entry.
    pub fn filename(&self) -> String {
        catalog_filename(self.tag)
    }

    /// Whether the entry is marked for download.
    pub fn is_selected(&self) -> bool {
        self.selected.load(Ordering::Acquire)
    }

    /// Mark or unmark the entry for download.
    pub fn set_selected(&self, selected: bool) {
        self.selected.store(selected, Ordering::Release);
    }

    /// Flip the selection flag, returning the new value.
    pub fn toggle_selected(&self) -> bool {
        !self.selected.fetch_xor(true, Ordering::AcqRel)
    }
}

impl Clone for CatalogEntry {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            name: self.name.clone(),
            selected: AtomicBool::new(self.is_selected()),
        }
    }
}

impl PartialEq for CatalogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.name == other.name
    }
}

impl Eq for CatalogEntry {}
