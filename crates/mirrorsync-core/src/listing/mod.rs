//! Listing sync engine.
//!
//! One pass: fetch the listing page, compute the frontier against the stored
//! cursor, download the frontier oldest-first with a bounded pool, and derive
//! the next cursor from what succeeded. A listing that cannot be fetched or
//! parsed ends the pass with the cursor untouched.

mod frontier;
mod stack;

pub use frontier::{advance_cursor, compute_frontier};
pub use stack::ListingStack;

use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::executor::write_content;
use crate::fetch::{get_text, FetchError, HttpFetcher};
use crate::progress::Reporter;
use crate::scheduler::run_pool;
use crate::sources::{ListingEntry, ListingParseError, ListingParser};
use crate::state::SyncCursor;

#[derive(Debug, thiserror::Error)]
pub enum ListingSyncError {
    #[error("listing page unavailable: {0}")]
    Unavailable(#[from] FetchError),
    #[error("listing page has unexpected structure: {0}")]
    Structure(#[from] ListingParseError),
    #[error("invalid listing base URL {url}: {source}")]
    InvalidBase {
        url: String,
        source: url::ParseError,
    },
    #[error("listing workers failed: {0:#}")]
    Workers(anyhow::Error),
}

/// What one pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSyncReport {
    /// Entries considered new, newest first.
    pub frontier: Vec<ListingEntry>,
    pub downloaded: Vec<ListingEntry>,
    pub failed: Vec<ListingEntry>,
    /// Cursor to persist.
    pub cursor: Option<SyncCursor>,
}

pub struct ListingSync {
    fetcher: Arc<dyn HttpFetcher>,
    parser: Arc<dyn ListingParser>,
    listing_url: String,
    base_url: String,
    output_dir: PathBuf,
    threads: usize,
    reporter: Reporter,
}

impl ListingSync {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        parser: Arc<dyn ListingParser>,
        listing_url: impl Into<String>,
        base_url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        threads: usize,
    ) -> Self {
        Self {
            fetcher,
            parser,
            listing_url: listing_url.into(),
            base_url: base_url.into(),
            output_dir: output_dir.into(),
            threads,
            reporter: Reporter::silent(),
        }
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run one pass from `cursor` (blocking).
    pub fn sync(&self, cursor: Option<&SyncCursor>) -> Result<ListingSyncReport, ListingSyncError> {
        let base = Url::parse(&self.base_url).map_err(|source| ListingSyncError::InvalidBase {
            url: self.base_url.clone(),
            source,
        })?;
        let html = get_text(self.fetcher.as_ref(), &self.listing_url)?;
        let entries = self.parser.parse(&html, &base)?;
        let frontier = compute_frontier(&entries, cursor);
        tracing::debug!(
            listed = entries.len(),
            new = frontier.len(),
            "listing frontier computed"
        );
        if frontier.is_empty() {
            self.reporter.note("listing: nothing new");
            return Ok(ListingSyncReport {
                frontier,
                downloaded: Vec::new(),
                failed: Vec::new(),
                cursor: cursor.cloned(),
            });
        }

        let stack = Arc::new(ListingStack::new(frontier.iter().cloned()));
        let fetcher = Arc::clone(&self.fetcher);
        let output_dir = self.output_dir.clone();
        let reporter = self.reporter.clone();
        let results = run_pool(stack, self.threads, move |entry: &ListingEntry| {
            Ok(fetch_entry(fetcher.as_ref(), &output_dir, &reporter, entry))
        })
        .map_err(ListingSyncError::Workers)?;

        let (ok, failed): (Vec<_>, Vec<_>) = results.into_iter().partition(|(_, saved)| *saved);
        let downloaded: Vec<ListingEntry> = ok.into_iter().map(|(e, _)| e).collect();
        let failed: Vec<ListingEntry> = failed.into_iter().map(|(e, _)| e).collect();
        let next = advance_cursor(cursor, &downloaded);
        Ok(ListingSyncReport {
            frontier,
            downloaded,
            failed,
            cursor: next,
        })
    }
}

/// Single-URL get-and-save. Returns whether the entry is now on disk.
fn fetch_entry(
    fetcher: &dyn HttpFetcher,
    output_dir: &std::path::Path,
    reporter: &Reporter,
    entry: &ListingEntry,
) -> bool {
    let body = match fetcher.get(entry.url.as_str()) {
        Ok(b) => b,
        Err(e) => {
            reporter.listing(entry.timestamp, format!("Skipping {}: {e}", entry.url));
            return false;
        }
    };
    match write_content(output_dir, &entry.filename, &body) {
        Ok(_) => {
            reporter.listing(entry.timestamp, format!("OK: {}", entry.filename));
            true
        }
        Err(e) => {
            tracing::warn!(file = %entry.filename, "could not save listing entry: {e:#}");
            reporter.listing(entry.timestamp, format!("Skipping {}: {e:#}", entry.filename));
            false
        }
    }
}
