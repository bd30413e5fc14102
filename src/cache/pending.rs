//! Pending-load handles: the bridge between worker completions and the
//! single-threaded consumer.
//!
//! A worker thread finishing a decode only ever *sends* on a channel; the
//! consumer observes the completion by awaiting or polling its receiver on
//! its own executor. Consumer code therefore never runs on a worker
//! thread, which is what keeps a single-threaded presentation layer safe
//! without locks around UI state.

use crate::cache::coalesce::LoadOutcome;
use crate::cache::entry::CacheEntry;
use crate::cache::types::CacheKey;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

/// Result of [`PixmapCache::get_or_load`]: the entry if resident, or a
/// pending handle for an in-flight decode.
///
/// The two cases are an explicit sum type resolved once at the boundary;
/// callers match instead of inspecting some "entry or future" value.
///
/// [`PixmapCache::get_or_load`]: crate::cache::PixmapCache::get_or_load
#[derive(Debug)]
pub enum ImageLoad {
    /// The entry was resident; nothing was scheduled.
    Ready(CacheEntry),
    /// A load is in flight; resolve through the handle.
    Pending(PendingLoad),
}

impl ImageLoad {
    /// Whether the entry was already resident.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The resident entry, if any, discarding a pending handle.
    pub fn ready(self) -> Option<CacheEntry> {
        match self {
            Self::Ready(entry) => Some(entry),
            Self::Pending(_) => None,
        }
    }

    /// Resolve either way: immediately for `Ready`, by waiting for
    /// `Pending`.
    pub async fn resolve(self) -> Option<CacheEntry> {
        match self {
            Self::Ready(entry) => Some(entry),
            Self::Pending(pending) => pending.wait().await,
        }
    }
}

/// Handle to a load in flight.
///
/// Resolves to `Some(entry)` once the decode completes, or `None` when
/// the file was missing, failed to decode, or the cache shut down before
/// the decode started.
#[derive(Debug)]
pub struct PendingLoad {
    key: CacheKey,
    receiver: broadcast::Receiver<LoadOutcome>,
}

impl PendingLoad {
    pub(crate) fn new(key: CacheKey, receiver: broadcast::Receiver<LoadOutcome>) -> Self {
        Self { key, receiver }
    }

    /// A handle that resolves immediately to absent.
    ///
    /// Returned for misses after shutdown, when no new work is accepted.
    pub(crate) fn closed(key: CacheKey) -> Self {
        let (tx, receiver) = broadcast::channel(1);
        drop(tx);
        Self { key, receiver }
    }

    /// The key this load was requested for.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Wait for the load to finish.
    ///
    /// Suspends the calling task; the decode itself runs on the worker
    /// pool. A closed channel (aborted load) resolves to `None`.
    pub async fn wait(mut self) -> Option<CacheEntry> {
        match self.receiver.recv().await {
            Ok(outcome) => outcome,
            Err(_) => None,
        }
    }

    /// Non-blocking poll for immediate-mode consumers.
    ///
    /// Returns `None` while the load is still in flight, and
    /// `Some(outcome)` once it resolved. After resolution the outcome
    /// keeps being returned on subsequent polls.
    pub fn try_resolve(&mut self) -> Option<Option<CacheEntry>> {
        loop {
            match self.receiver.try_recv() {
                Ok(outcome) => return Some(outcome),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Closed) => return Some(None),
                // Single-message channel; lag is not reachable, but the
                // variant must be handled.
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
    }
}
