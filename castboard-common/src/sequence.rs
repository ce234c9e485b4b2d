//! Latest-wins commit slot
//!
//! Each parameter change issues a new sequence number. A response may only
//! be committed if it carries the latest issued number; anything older is
//! stale and is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

#[derive(Debug)]
pub struct SequencedSlot<T> {
    latest: AtomicU64,
    committed: Mutex<Option<(u64, T)>>,
}

impl<T: Clone> Default for SequencedSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> SequencedSlot<T> {
    pub fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
            committed: Mutex::new(None),
        }
    }

    /// Issue the next sequence number. The first call returns 1.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Latest issued sequence number (0 before the first issue)
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Commit `value` if `seq` is still the latest issued number.
    ///
    /// Returns whether the value became visible.
    pub fn commit(&self, seq: u64, value: T) -> bool {
        let mut committed = self.committed.lock().unwrap_or_else(PoisonError::into_inner);
        let latest = self.latest();
        if seq != latest {
            debug!(seq, latest, "Dropping stale response");
            return false;
        }
        *committed = Some((seq, value));
        true
    }

    /// Currently visible value
    pub fn current(&self) -> Option<T> {
        self.committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, v)| v.clone())
    }

    /// Visible value together with the sequence number that produced it
    pub fn snapshot(&self) -> Option<(u64, T)> {
        self.committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sequence number of the currently visible value
    pub fn committed_seq(&self) -> Option<u64> {
        self.committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(seq, _)| *seq)
    }
}
