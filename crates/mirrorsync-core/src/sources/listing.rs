//! Archive listing page (tracker-style table, newest first).

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::ListingParser;
use crate::url_model::{filename_from_url_path, sanitize_filename};

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub timestamp: NaiveDateTime,
    pub url: Url,
    /// Decoded last path segment of `url`; the dedup key within a timestamp.
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingParseError {
    #[error("listing table not found")]
    MissingTable,
    #[error("row {row} has no timestamp cell")]
    MissingTimestamp { row: usize },
    #[error("row {row} has unparseable timestamp: {text}")]
    InvalidTimestamp { row: usize, text: String },
    #[error("row {row} has no link")]
    MissingLink { row: usize },
    #[error("row {row} has unusable link: {href}")]
    InvalidLink { row: usize, href: String },
}

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parses `2020-01-01`, `2020-01-01 12:30`, `2020-01-01 12:30:45` or
/// `2020-01-01T12:30:45`. A bare date means midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parses `<table class="trkInner">` pages: one `<tr>` per bundle with a
/// `td.colAdded` timestamp and a `td.colName` link. The table's last row is a
/// summary line and is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlListingParser;

struct Selectors {
    table: Selector,
    row: Selector,
    cell: Selector,
    added: Selector,
    link: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| Selectors {
        table: Selector::parse("table.trkInner").expect("static selector"),
        row: Selector::parse("tr").expect("static selector"),
        cell: Selector::parse("td").expect("static selector"),
        added: Selector::parse("td.colAdded").expect("static selector"),
        link: Selector::parse("td.colName a").expect("static selector"),
    })
}

impl ListingParser for HtmlListingParser {
    fn parse(&self, html: &str, base: &Url) -> Result<Vec<ListingEntry>, ListingParseError> {
        let sel = selectors();
        let document = Html::parse_document(html);
        let table = document
            .select(&sel.table)
            .next()
            .ok_or(ListingParseError::MissingTable)?;

        let mut rows: Vec<ElementRef<'_>> = table
            .select(&sel.row)
            .filter(|tr| tr.select(&sel.cell).next().is_some())
            .collect();
        rows.pop();

        rows.into_iter()
            .enumerate()
            .map(|(i, row)| parse_row(sel, i + 1, row, base))
            .collect()
    }
}

fn parse_row(
    sel: &Selectors,
    row_no: usize,
    row: ElementRef<'_>,
    base: &Url,
) -> Result<ListingEntry, ListingParseError> {
    let added = row
        .select(&sel.added)
        .next()
        .ok_or(ListingParseError::MissingTimestamp { row: row_no })?;
    let text: String = added.text().collect();
    let timestamp = parse_timestamp(&text).ok_or_else(|| ListingParseError::InvalidTimestamp {
        row: row_no,
        text: text.trim().to_string(),
    })?;

    let href = row
        .select(&sel.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or(ListingParseError::MissingLink { row: row_no })?;
    let invalid = || ListingParseError::InvalidLink {
        row: row_no,
        href: href.to_string(),
    };
    let url = base.join(href.trim()).map_err(|_| invalid())?;
    let filename = filename_from_url_path(&url)
        .map(|raw| sanitize_filename(&raw))
        .filter(|name| !name.is_empty())
        .ok_or_else(invalid)?;

    Ok(ListingEntry {
        timestamp,
        url,
        filename,
    })
}
