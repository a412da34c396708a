// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Pure parsers for the two archive listing pages.
//!
//! CDMS publishes an HTML table: every `<tr>` holding `<td>` cells is one
//! entry, tag in the first cell and name in the second. JPL publishes a
//! directory page with a column-aligned `<pre>` block whose first line is a
//! header.

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

use crate::catalog::MAX_TAG;
use crate::error::CatalogError;

pub const CDMS_SOURCE: &str = "CDMS";
pub const JPL_SOURCE: &str = "JPL";

/// One `(tag, name)` pair read from a listing.
pub type ListingRow = (u32, String);

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {:?}: {:?}", css, e))
}

/// Element text with runs of whitespace collapsed and the ends trimmed.
fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a catalog tag, rejecting anything that does not fit six digits.
pub fn parse_tag(text: &str, source_name: &str) -> Result<u32> {
    let tag: u32 = text.trim().parse().map_err(|_| {
        CatalogError::parse(source_name, format!("invalid tag {:?}", text))
    })?;
    if tag > MAX_TAG {
        return Err(CatalogError::parse(source_name, format!("tag {} exceeds six digits", tag)).into());
    }
    Ok(tag)
}

/// Parse one CDMS table row given its cell texts.
///
/// Returns `Ok(None)` for rows without data cells (header rows).
pub fn parse_cdms_row(cells: &[String]) -> Result<Option<ListingRow>> {
    let Some(tag_text) = cells.first() else {
        return Ok(None);
    };
    let tag = parse_tag(tag_text, CDMS_SOURCE)?;
    let name = cells.get(1).ok_or_else(|| {
        CatalogError::parse(CDMS_SOURCE, format!("row for tag {} has no name cell", tag))
    })?;
    Ok(Some((tag, name.clone())))
}

/// Parse the CDMS entries page.
pub fn parse_cdms_listing(html: &str) -> Result<Vec<ListingRow>> {
    let document = Html::parse_document(html);
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let mut rows = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<String> = row.select(&cell_selector).map(|c| cell_text(&c)).collect();
        if let Some(parsed) = parse_cdms_row(&cells)? {
            rows.push(parsed);
        }
    }
    Ok(rows)
}

/// Parse one line of the JPL `<pre>` block.
///
/// Column alignment pads short tags with leading blanks, so a line may open
/// with whitespace. Either way the tag is the first word and the name the
/// second.
pub fn parse_jpl_line(line: &str) -> Result<ListingRow> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(tag), Some(name)) => Ok((parse_tag(tag, JPL_SOURCE)?, name.to_string())),
        _ => Err(CatalogError::parse(JPL_SOURCE, format!("cannot split line {:?}", line)).into()),
    }
}

/// Parse the JPL `catdir.html` page.
///
/// The listing is the first `<pre>` inside a table row. Preformatted text
/// elsewhere on the page is ignored.
pub fn parse_jpl_listing(html: &str) -> Result<Vec<ListingRow>> {
    let document = Html::parse_document(html);
    let pre_selector = selector("tr pre")?;

    let block = document
        .select(&pre_selector)
        .next()
        .ok_or_else(|| CatalogError::parse(JPL_SOURCE, "no <pre> block in listing table"))?;
    let text: String = block.text().collect();

    // Header first; blank lines around the block are not entries.
    text.trim_start_matches(&['\r', '\n'][..])
        .trim_end()
        .lines()
        .skip(1)
        .map(parse_jpl_line)
        .collect()
}
