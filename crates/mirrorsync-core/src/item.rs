//! Item identifiers and per-item download outcomes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of one item in the numbered series. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ItemId(u32);

impl ItemId {
    /// Returns `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The id after this one, saturating at `u32::MAX`.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for ItemId {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        ItemId::new(value).ok_or_else(|| "item number must be at least 1".to_string())
    }
}

impl From<ItemId> for u32 {
    fn from(id: ItemId) -> u32 {
        id.0
    }
}

impl FromStr for ItemId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("not a valid item number: {s}"))?;
        ItemId::new(n).ok_or_else(|| format!("item number must be at least 1: {s}"))
    }
}

/// Final result of processing one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Content saved under the given filename in the output directory.
    Success { filename: String },
    /// Every mirror failed (or the page listed none).
    AllMirrorsFailed,
    /// The detail page could not be fetched.
    PageUnavailable,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success { .. })
    }
}
