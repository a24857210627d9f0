//! Latest-call-wins guard for overlapping async actions
//!
//! Each action kind owns a [`RequestTracker`]. An action takes a
//! [`RequestTicket`] before issuing its request and commits its outcome only
//! if that ticket is still current when the request settles.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation marker handed to one invocation of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Monotonic generation counter for one action kind
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    /// Create a tracker with no calls issued
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new call, superseding every earlier ticket
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` belongs to the most recently issued call
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Supersede every outstanding ticket without starting a call
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_is_current() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        assert!(tracker.is_current(first));

        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn test_invalidate_supersedes_outstanding_ticket() {
        let tracker = RequestTracker::new();
        let ticket = tracker.begin();
        tracker.invalidate();
        assert!(!tracker.is_current(ticket));
    }
}
