//! FIFO of item ids shared by the item workers.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use super::pool::WorkSource;
use crate::item::ItemId;

/// Ids are handed out in ascending order, one per `pop`.
#[derive(Debug, Default)]
pub struct ItemQueue {
    ids: Mutex<VecDeque<ItemId>>,
}

impl ItemQueue {
    pub fn new(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            ids: Mutex::new(ids.into_iter().collect()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ItemId>> {
        self.ids.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl WorkSource<ItemId> for ItemQueue {
    fn pop(&self) -> Option<ItemId> {
        self.lock().pop_front()
    }

    fn drain(&self) -> usize {
        let mut q = self.lock();
        let n = q.len();
        q.clear();
        n
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
