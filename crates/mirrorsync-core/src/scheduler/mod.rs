//! Item work scheduler.
//!
//! Builds a FIFO of ids for the run's range and drains it with a bounded pool
//! of worker threads, each calling a [`ProcessItem`] per id. Every id is
//! processed exactly once; the next item cursor is one past the largest id
//! that was processed.

mod pool;
mod queue;
mod range;

pub use pool::WorkSource;
pub(crate) use pool::run_pool;
pub use queue::ItemQueue;
pub use range::{plan_item_range, ItemRange};

use std::sync::Arc;

use anyhow::Result;

use crate::item::{DownloadOutcome, ItemId};

/// Per-item work. Expected per-item failures are outcomes; `Err` is reserved
/// for conditions that should stop the run (e.g. the output disk is gone).
pub trait ProcessItem: Send + Sync {
    fn process(&self, id: ItemId) -> Result<DownloadOutcome>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// `max(processed id) + 1`, or `None` if nothing was processed.
    pub next_cursor: Option<ItemId>,
}

/// Process every id in `ids` with up to `threads` workers.
pub fn run_items(
    ids: impl IntoIterator<Item = ItemId>,
    threads: usize,
    processor: Arc<dyn ProcessItem>,
) -> Result<ItemRunSummary> {
    let queue = Arc::new(ItemQueue::new(ids));
    if queue.is_empty() {
        return Ok(ItemRunSummary::default());
    }
    let results = run_pool(queue, threads, move |id: &ItemId| processor.process(*id))?;

    let mut summary = ItemRunSummary::default();
    for (id, outcome) in &results {
        summary.processed += 1;
        if outcome.is_success() {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
        summary.next_cursor = summary.next_cursor.max(Some(id.next()));
    }
    tracing::debug!(
        processed = summary.processed,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "item pool finished"
    );
    Ok(summary)
}
