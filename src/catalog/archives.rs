// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Base URLs of the two remote archives and URL resolution.

use super::entry::{CatalogEntry, Origin};

/// Default CDMS entries directory (listing page and catalog files).
pub const DEFAULT_CDMS_URL: &str = "https://cdms.astro.uni-koeln.de/classic/entries/";

/// Default JPL catalog directory (listing page and catalog files).
pub const DEFAULT_JPL_URL: &str = "https://spec.jpl.nasa.gov/ftp/pub/catalog/";

/// Name of the JPL directory listing page below its base URL.
pub const JPL_LISTING_PAGE: &str = "catdir.html";

/// Base URLs of both archives, each ending in exactly one `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archives {
    cdms_base: String,
    jpl_base: String,
}

impl Default for Archives {
    fn default() -> Self {
        Self::new(DEFAULT_CDMS_URL, DEFAULT_JPL_URL)
    }
}

impl Archives {
    /// Archives rooted at the given base URLs.
    pub fn new(cdms_base: impl AsRef<str>, jpl_base: impl AsRef<str>) -> Self {
        Self {
            cdms_base: normalize_base(cdms_base.as_ref()),
            jpl_base: normalize_base(jpl_base.as_ref()),
        }
    }

    /// CDMS listing page. The entries directory itself serves the table.
    pub fn cdms_listing_url(&self) -> &str {
        &self.cdms_base
    }

    /// JPL listing page.
    pub fn jpl_listing_url(&self) -> String {
        format!("{}{}", self.jpl_base, JPL_LISTING_PAGE)
    }

    /// Base URL of the archive an origin refers to.
    pub fn base_for(&self, origin: Origin) -> &str {
        match origin {
            Origin::Cdms => &self.cdms_base,
            Origin::Jpl => &self.jpl_base,
        }
    }

    /// Source URL of an entry's catalog file.
    pub fn download_url(&self, entry: &CatalogEntry) -> String {
        format!("{}{}", self.base_for(entry.origin()), entry.filename())
    }
}

fn normalize_base(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_follows_origin() {
        let archives = Archives::default();
        let jpl = CatalogEntry::new(45030, "H2CS");
        let cdms = CatalogEntry::new(45130, "HCS+");
        assert_eq!(
            archives.download_url(&jpl),
            "https://spec.jpl.nasa.gov/ftp/pub/catalog/c045030.cat"
        );
        assert_eq!(
            archives.download_url(&cdms),
            "https://cdms.astro.uni-koeln.de/classic/entries/c045130.cat"
        );
    }

    #[test]
    fn test_base_urls_are_normalized() {
        let archives = Archives::new("http://a.test/cdms", "http://b.test/jpl///");
        assert_eq!(archives.cdms_listing_url(), "http://a.test/cdms/");
        assert_eq!(archives.jpl_listing_url(), "http://b.test/jpl/catdir.html");
    }
}
