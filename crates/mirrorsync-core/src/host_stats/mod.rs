//! Per-host load statistics shared by all item workers.
//!
//! Each mirror host gets a small record of in-flight and completed requests
//! plus the time the last request started. Mirror ranking reads a snapshot of
//! this table to steer new requests toward idle, rarely used hosts.
//!
//! Entries are created on first contact and live for the process; the number
//! of hosts is bounded by the number of mirrors so nothing is evicted.

mod guard;

pub use guard::HostRequestGuard;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

/// Counters for one host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStatistic {
    /// Requests currently in flight against the host.
    pub active: usize,
    /// Requests that have finished (any outcome).
    pub completed: u64,
    /// When the most recent request started; `None` if never contacted.
    pub last_start: Option<Instant>,
}

/// Point-in-time copy of the table, used for ranking.
pub type HostSnapshot = HashMap<String, HostStatistic>;

/// Process-wide host table. Every operation is a single critical section, so
/// a snapshot never observes a request that has been decremented but not yet
/// counted as completed.
#[derive(Debug, Default)]
pub struct HostLoadTracker {
    hosts: Mutex<HashMap<String, HostStatistic>>,
}

impl HostLoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a request to `host` as started. The returned guard marks it as
    /// finished when dropped, whatever path the caller takes.
    pub fn begin(&self, host: &str) -> HostRequestGuard<'_> {
        self.on_request_start(host);
        HostRequestGuard::new(self, host)
    }

    pub(crate) fn on_request_start(&self, host: &str) {
        let mut hosts = self.lock();
        let entry = hosts.entry(host.to_string()).or_default();
        entry.active += 1;
        entry.last_start = Some(Instant::now());
    }

    pub(crate) fn on_request_end(&self, host: &str) {
        let mut hosts = self.lock();
        let entry = hosts.entry(host.to_string()).or_default();
        debug_assert!(entry.active > 0, "request end without start for {host}");
        entry.active = entry.active.saturating_sub(1);
        entry.completed += 1;
    }

    /// Statistics for one host, if it has been contacted.
    pub fn get(&self, host: &str) -> Option<HostStatistic> {
        self.lock().get(host).copied()
    }

    /// Copy of the whole table.
    pub fn snapshot(&self) -> HostSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, HostStatistic>> {
        // A panic while holding the lock cannot leave a half-applied update:
        // each critical section is a couple of field writes.
        self.hosts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
