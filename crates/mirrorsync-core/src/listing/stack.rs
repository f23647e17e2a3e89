//! LIFO of listing entries shared by the listing workers.

use std::sync::{Mutex, MutexGuard};

use crate::scheduler::WorkSource;
use crate::sources::ListingEntry;

/// Built from a newest-first frontier; pops the oldest entry first.
#[derive(Debug, Default)]
pub struct ListingStack {
    entries: Mutex<Vec<ListingEntry>>,
}

impl ListingStack {
    pub fn new(newest_first: impl IntoIterator<Item = ListingEntry>) -> Self {
        Self {
            entries: Mutex::new(newest_first.into_iter().collect()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ListingEntry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl WorkSource<ListingEntry> for ListingStack {
    fn pop(&self) -> Option<ListingEntry> {
        self.lock().pop()
    }

    fn drain(&self) -> usize {
        let mut s = self.lock();
        let n = s.len();
        s.clear();
        n
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
