//! Latest-wins fetch tasks
//!
//! Every parameter change spawns a fetch task tagged with a fresh sequence
//! number. When a task finishes it commits through a
//! [`SequencedSlot`], so a slow, superseded response can never overwrite
//! the result of a newer request.

use std::future::Future;
use std::sync::Arc;

use castboard_common::sequence::SequencedSlot;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

/// Committed value with the sequence number that produced it
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<T> {
    pub seq: u64,
    pub value: T,
}

#[derive(Debug)]
pub struct LatestFetch<T> {
    slot: Arc<SequencedSlot<T>>,
}

impl<T> Clone for LatestFetch<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Clone + Send + 'static> Default for LatestFetch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> LatestFetch<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(SequencedSlot::new()),
        }
    }

    /// Issue a new request and run `fetch` in the background.
    ///
    /// Returns the request's sequence number and the task handle; the task
    /// resolves to whether its response became visible.
    pub fn request<F>(&self, fetch: F) -> (u64, JoinHandle<bool>)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let seq = self.slot.issue();
        let slot = Arc::clone(&self.slot);
        let handle = tokio::spawn(async move {
            let value = fetch.await;
            let applied = slot.commit(seq, value);
            debug!(seq, applied, "Fetch finished");
            applied
        });
        (seq, handle)
    }

    /// Latest issued sequence number
    pub fn latest_seq(&self) -> u64 {
        self.slot.latest()
    }

    /// True while the latest request has not committed yet
    pub fn is_pending(&self) -> bool {
        let latest = self.slot.latest();
        latest != 0 && self.slot.committed_seq() != Some(latest)
    }

    pub fn current(&self) -> Option<Snapshot<T>> {
        self.slot
            .snapshot()
            .map(|(seq, value)| Snapshot { seq, value })
    }
}
