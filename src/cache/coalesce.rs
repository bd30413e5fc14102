//! Load coalescing: at most one pipeline execution per key.
//!
//! When several consumers miss on the same `(path, dimensions)` at once -
//! a gallery tile and a preview pane racing for the same file - only one
//! decode runs. The first miss becomes the leader and spawns the load; all
//! later misses subscribe to the same broadcast channel and observe the
//! one result, delivered once.
//!
//! Entries leave the in-flight map either through `complete` (result
//! broadcast to every waiter) or `abort` (channel dropped without a send,
//! used on shutdown so that waiters resolve to absent without any
//! completion callback firing).

use crate::cache::entry::CacheEntry;
use crate::cache::types::CacheKey;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

/// The result a load broadcasts: an entry, or absent on missing/corrupt
/// files.
pub(crate) type LoadOutcome = Option<CacheEntry>;

/// Outcome of registering a miss with the coalescer.
pub(crate) enum Registration {
    /// First miss for this key: the caller must spawn the load and later
    /// call `complete` (or `abort`).
    Leader(broadcast::Receiver<LoadOutcome>),
    /// A load for this key is already in flight; wait on the receiver.
    Follower(broadcast::Receiver<LoadOutcome>),
}

impl Registration {
    /// Receiver for the eventual result, leader or follower.
    pub(crate) fn into_receiver(self) -> broadcast::Receiver<LoadOutcome> {
        match self {
            Self::Leader(rx) | Self::Follower(rx) => rx,
        }
    }

    pub(crate) fn is_leader(&self) -> bool {
        matches!(self, Self::Leader(_))
    }
}

/// Tracks in-flight loads so duplicate misses share one execution.
#[derive(Debug, Default)]
pub(crate) struct LoadCoalescer {
    in_flight: Mutex<HashMap<CacheKey, broadcast::Sender<LoadOutcome>>>,
}

impl LoadCoalescer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a miss for `key`.
    pub(crate) fn register(&self, key: &CacheKey) -> Registration {
        let mut in_flight = self.in_flight.lock().unwrap();
        if let Some(tx) = in_flight.get(key) {
            debug!(
                path = %key.path.display(),
                dimensions = %key.dimensions,
                "coalescing onto in-flight load"
            );
            Registration::Follower(tx.subscribe())
        } else {
            // A single result is ever sent per channel.
            let (tx, rx) = broadcast::channel(1);
            in_flight.insert(key.clone(), tx);
            Registration::Leader(rx)
        }
    }

    /// Complete a load, broadcasting the outcome to every waiter.
    pub(crate) fn complete(&self, key: &CacheKey, outcome: LoadOutcome) {
        let tx = self.in_flight.lock().unwrap().remove(key);
        if let Some(tx) = tx {
            // Waiters may have been dropped already; nothing to do then.
            let _ = tx.send(outcome);
        }
    }

    /// Drop an in-flight load without sending a result.
    ///
    /// Waiters see a closed channel and resolve to absent; no completion
    /// fires. Used for tasks cancelled before their decode started.
    pub(crate) fn abort(&self, key: &CacheKey) {
        self.in_flight.lock().unwrap().remove(key);
    }

    /// Number of loads currently in flight.
    pub(crate) fn in_flight_count(&self) -> usize {
        self.in_flight.lock().unwrap().len()
    }
}
