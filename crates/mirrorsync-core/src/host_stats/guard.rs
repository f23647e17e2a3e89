//! RAII guard that ends a host request when dropped.

use super::HostLoadTracker;

/// Ends the request (decrement active, increment completed) on drop.
pub struct HostRequestGuard<'a> {
    tracker: &'a HostLoadTracker,
    host: String,
}

impl<'a> HostRequestGuard<'a> {
    pub(super) fn new(tracker: &'a HostLoadTracker, host: &str) -> Self {
        Self {
            tracker,
            host: host.to_string(),
        }
    }
}

impl Drop for HostRequestGuard<'_> {
    fn drop(&mut self) {
        self.tracker.on_request_end(&self.host);
    }
}
