//! Incremental boundary of the listing: which entries are new, and how the
//! cursor moves after a sync.

use crate::sources::ListingEntry;
use crate::state::SyncCursor;

/// Entries newer than `cursor`, newest first.
///
/// Walks the newest-first listing and stops at the first entry older than
/// the cursor timestamp. Entries at exactly the cursor timestamp are new
/// unless their filename is already in the cursor's set. Without a cursor
/// the whole listing is new.
pub fn compute_frontier(entries: &[ListingEntry], cursor: Option<&SyncCursor>) -> Vec<ListingEntry> {
    let Some(cursor) = cursor else {
        return entries.to_vec();
    };
    entries
        .iter()
        .take_while(|e| e.timestamp >= cursor.last_timestamp)
        .filter(|e| !(e.timestamp == cursor.last_timestamp && cursor.contains(&e.filename)))
        .cloned()
        .collect()
}

/// Cursor after `successes` were downloaded.
///
/// With `M` the newest successful timestamp: no previous cursor or `M` newer
/// than it starts a fresh set at `M`; `M` equal to it adds to the existing
/// set; anything else (including no successes) keeps the previous cursor.
pub fn advance_cursor(prev: Option<&SyncCursor>, successes: &[ListingEntry]) -> Option<SyncCursor> {
    let Some(newest) = successes.iter().map(|e| e.timestamp).max() else {
        return prev.cloned();
    };
    let at_newest = successes
        .iter()
        .filter(|e| e.timestamp == newest)
        .map(|e| e.filename.clone());

    match prev {
        Some(p) if newest < p.last_timestamp => Some(p.clone()),
        Some(p) if newest == p.last_timestamp => {
            let mut merged = p.clone();
            merged.filenames.extend(at_newest);
            Some(merged)
        }
        _ => {
            let mut fresh = SyncCursor::new(newest);
            fresh.filenames.extend(at_newest);
            Some(fresh)
        }
    }
}
