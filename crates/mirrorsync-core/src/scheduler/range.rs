//! Which ids a run covers.

use crate::item::ItemId;

/// Inclusive range of ids to process this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRange {
    pub from: ItemId,
    pub to: ItemId,
}

impl ItemRange {
    pub fn ids(self) -> impl Iterator<Item = ItemId> {
        (self.from.get()..=self.to.get()).filter_map(ItemId::new)
    }

    /// Number of ids in the range (never zero).
    pub fn count(self) -> usize {
        (self.to.get() - self.from.get()) as usize + 1
    }
}

/// `[from, min(latest, upper)]`, or `None` when that is empty (already caught up).
pub fn plan_item_range(from: ItemId, latest: ItemId, upper: Option<ItemId>) -> Option<ItemRange> {
    let to = match upper {
        Some(u) if u < latest => u,
        _ => latest,
    };
    (from <= to).then_some(ItemRange { from, to })
}
