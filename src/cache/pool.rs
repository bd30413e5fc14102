//! Bounded worker pool for blocking decode work.
//!
//! The pool is a capacity limiter plus a shutdown gate; it does not know
//! what a cache or a pixmap is. Decodes run under `spawn_blocking` after
//! acquiring a semaphore permit, so at most `capacity` decodes execute at
//! once regardless of how many loads are queued. No start-order guarantee
//! exists between tasks: decode order is not semantically meaningful.
//!
//! Shutdown semantics:
//! - no new tasks are accepted;
//! - tasks still waiting on a permit abort before their decode starts;
//! - already-running decodes finish rather than being interrupted mid-I/O;
//! - `shutdown()` waits for the full drain.

use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

/// Bounded pool of decode workers.
pub struct LoadPool {
    semaphore: Arc<Semaphore>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
    runtime: Handle,
    capacity: usize,
}

impl LoadPool {
    /// Create a pool bounded to `capacity` concurrent decodes.
    ///
    /// Captures the current Tokio runtime handle, so the pool must be
    /// created from within a runtime.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or no runtime is running.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "pool capacity must be > 0");
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
            runtime: Handle::current(),
            capacity,
        }
    }

    /// Maximum number of concurrent decodes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently free.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Whether shutdown has begun. No new work is accepted afterwards.
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Token observed by queued tasks to abort before starting.
    pub(crate) fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Shared semaphore for permit acquisition inside spawned tasks.
    pub(crate) fn semaphore(&self) -> Arc<Semaphore> {
        Arc::clone(&self.semaphore)
    }

    /// Spawn a tracked task on the pool's runtime.
    pub(crate) fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn_on(future, &self.runtime);
    }

    /// Begin shutdown and wait until every in-flight task has drained.
    ///
    /// Idempotent: later calls return once the drain is complete.
    pub async fn shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            info!(capacity = self.capacity, "shutting down load pool");
        }
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        debug!("load pool drained");
    }
}

impl std::fmt::Debug for LoadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadPool")
            .field("capacity", &self.capacity)
            .field("available_permits", &self.available_permits())
            .field("is_shut_down", &self.is_shut_down())
            .finish()
    }
}
