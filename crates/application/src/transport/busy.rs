//! Global in-flight request counter.
//!
//! Drives the application-wide busy indicator: the counter is raised when
//! a request starts and lowered when it settles, whatever the outcome.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

/// Counts requests currently in flight.
///
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct BusyTracker {
    pending: Arc<watch::Sender<usize>>,
}

impl BusyTracker {
    /// Creates an idle tracker.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            pending: Arc::new(sender),
        }
    }

    /// Marks the start of a request. The counter goes back down when the
    /// returned guard is dropped, so early returns and cancelled futures
    /// cannot leave it raised.
    pub fn begin(&self) -> InFlight {
        self.pending.send_modify(|count| *count += 1);
        trace!(pending = self.pending(), "request started");
        InFlight {
            tracker: self.clone(),
        }
    }

    /// Number of requests in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Returns true while at least one request is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending() > 0
    }

    /// Watches the counter; the receiver sees every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.pending.subscribe()
    }

    fn finish(&self) {
        self.pending
            .send_modify(|count| *count = count.saturating_sub(1));
        trace!(pending = self.pending(), "request settled");
    }
}

impl Default for BusyTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for one in-flight request.
#[derive(Debug)]
#[must_use = "the request counts as settled once the guard is dropped"]
pub struct InFlight {
    tracker: BusyTracker,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}
