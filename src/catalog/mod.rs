// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Catalog entry model, shared entry store and archive URLs.

pub mod archives;
pub mod entry;
pub mod store;

pub use archives::{Archives, DEFAULT_CDMS_URL, DEFAULT_JPL_URL, JPL_LISTING_PAGE};
pub use entry::{catalog_filename, mass_of, origin_code, CatalogEntry, Origin, MAX_TAG};
pub use store::EntryStore;
