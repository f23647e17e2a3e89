//! Resume cursors persisted between runs.
//!
//! The on-disk record is flat JSON:
//! `{"next_item_id": 4822, "last_listing_timestamp": "...", "last_listing_filenames": [...]}`
//! with absent cursors omitted. It is read once at start and replaced
//! wholesale at the end of a run.

mod persist;

pub use persist::{default_state_path, load_or_default, StateError, StateStore};

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::item::ItemId;

/// Listing resume boundary: the newest timestamp seen plus every filename
/// already fetched at exactly that timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCursor {
    pub last_timestamp: NaiveDateTime,
    pub filenames: BTreeSet<String>,
}

impl SyncCursor {
    pub fn new(last_timestamp: NaiveDateTime) -> Self {
        Self {
            last_timestamp,
            filenames: BTreeSet::new(),
        }
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }
}

/// Everything a run resumes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RunStateRecord", into = "RunStateRecord")]
pub struct RunState {
    pub next_item_id: Option<ItemId>,
    pub sync_cursor: Option<SyncCursor>,
}

/// Serialized shape of [`RunState`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RunStateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_item_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_listing_timestamp: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_listing_filenames: Option<Vec<String>>,
}

impl From<RunStateRecord> for RunState {
    fn from(r: RunStateRecord) -> Self {
        let sync_cursor = r.last_listing_timestamp.map(|ts| SyncCursor {
            last_timestamp: ts,
            filenames: r.last_listing_filenames.unwrap_or_default().into_iter().collect(),
        });
        Self {
            next_item_id: r.next_item_id,
            sync_cursor,
        }
    }
}

impl From<RunState> for RunStateRecord {
    fn from(s: RunState) -> Self {
        let (last_listing_timestamp, last_listing_filenames) = match s.sync_cursor {
            Some(c) => (Some(c.last_timestamp), Some(c.filenames.into_iter().collect())),
            None => (None, None),
        };
        Self {
            next_item_id: s.next_item_id,
            last_listing_timestamp,
            last_listing_filenames,
        }
    }
}
