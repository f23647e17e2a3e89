//! One invocation end to end: item range, item pool, then listing sync.
//!
//! The coordinator owns no I/O of its own. It asks the latest-item source for
//! the upper bound, runs the item pool and then the listing engine on the
//! blocking thread pool, and returns the state to persist. Items and listing
//! are independent: a failure in one step is reported and the other still
//! runs, except for errors the item pool treats as fatal.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::item::ItemId;
use crate::listing::{advance_cursor, ListingSync, ListingSyncReport};
use crate::progress::Reporter;
use crate::scheduler::{plan_item_range, run_items, ItemRunSummary, ProcessItem};
use crate::sources::LatestItemSource;
use crate::state::{RunState, SyncCursor};

/// User choices for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunPlan {
    /// Starting id; overrides the stored item cursor.
    pub from: Option<ItemId>,
    /// Upper bound, applied only when below the latest id.
    pub to: Option<ItemId>,
    pub include_listing: bool,
    /// Lower bound for the listing; overrides the stored listing cursor.
    pub listing_since: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// `None` when the item step was skipped.
    pub items: Option<ItemRunSummary>,
    /// `None` when the listing step was skipped or failed.
    pub listing: Option<ListingSyncReport>,
    /// State to persist.
    pub state: RunState,
}

pub struct RunCoordinator {
    latest: Arc<dyn LatestItemSource>,
    items: Arc<dyn ProcessItem>,
    listing: Arc<ListingSync>,
    threads: usize,
    reporter: Reporter,
}

impl RunCoordinator {
    pub fn new(
        latest: Arc<dyn LatestItemSource>,
        items: Arc<dyn ProcessItem>,
        listing: Arc<ListingSync>,
        threads: usize,
    ) -> Self {
        Self {
            latest,
            items,
            listing,
            threads: threads.max(1),
            reporter: Reporter::silent(),
        }
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub async fn run(&self, prev: &RunState, plan: &RunPlan) -> Result<RunReport> {
        let items = self.run_item_step(prev, plan).await?;
        // A chosen start id is kept even when nothing could be processed, so
        // the next run does not ask again.
        let next_item_id = items
            .as_ref()
            .and_then(|s| s.next_cursor)
            .or(plan.from)
            .or(prev.next_item_id);

        let (listing, sync_cursor) = if plan.include_listing {
            self.run_listing_step(prev, plan).await?
        } else {
            (None, prev.sync_cursor.clone())
        };

        Ok(RunReport {
            items,
            listing,
            state: RunState {
                next_item_id,
                sync_cursor,
            },
        })
    }

    async fn run_item_step(&self, prev: &RunState, plan: &RunPlan) -> Result<Option<ItemRunSummary>> {
        let Some(from) = plan.from.or(prev.next_item_id) else {
            self.reporter.note("no starting item; skipping items");
            return Ok(None);
        };

        let latest = Arc::clone(&self.latest);
        let latest = tokio::task::spawn_blocking(move || latest.latest_item_id())
            .await
            .context("latest item lookup panicked")?;
        let latest = match latest {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("could not determine latest item: {e}");
                self.reporter
                    .note(format!("could not determine latest item ({e}); skipping items"));
                return Ok(None);
            }
        };

        let Some(range) = plan_item_range(from, latest, plan.to) else {
            self.reporter
                .note(format!("items up to date (next {from}, latest {latest})"));
            return Ok(Some(ItemRunSummary::default()));
        };
        self.reporter.note(format!(
            "items {}..={} ({} to check)",
            range.from,
            range.to,
            range.count()
        ));

        let items = Arc::clone(&self.items);
        let threads = self.threads;
        let summary = tokio::task::spawn_blocking(move || run_items(range.ids(), threads, items))
            .await
            .context("item workers panicked")??;
        self.reporter.note(format!(
            "items: {} ok, {} failed",
            summary.succeeded, summary.failed
        ));
        Ok(Some(summary))
    }

    async fn run_listing_step(
        &self,
        prev: &RunState,
        plan: &RunPlan,
    ) -> Result<(Option<ListingSyncReport>, Option<SyncCursor>)> {
        let start = match plan.listing_since {
            Some(since) => Some(SyncCursor::new(since)),
            None => prev.sync_cursor.clone(),
        };

        let listing = Arc::clone(&self.listing);
        let res = tokio::task::spawn_blocking(move || listing.sync(start.as_ref()))
            .await
            .context("listing workers panicked")?;

        match res {
            Ok(report) => {
                self.reporter.note(format!(
                    "listing: {} new, {} ok, {} failed",
                    report.frontier.len(),
                    report.downloaded.len(),
                    report.failed.len()
                ));
                // Measured against the stored cursor so a `listing_since`
                // older than it cannot move the cursor backwards.
                let cursor = advance_cursor(prev.sync_cursor.as_ref(), &report.downloaded);
                Ok((Some(report), cursor))
            }
            Err(e) => {
                tracing::warn!("listing sync skipped: {e}");
                self.reporter.note(format!("listing sync skipped: {e}"));
                Ok((None, prev.sync_cursor.clone()))
            }
        }
    }
}
