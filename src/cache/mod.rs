//! Keyed pixmap cache with asynchronous loading.
//!
//! The cache maps `(absolute path, dimensions)` to resident decoded
//! pixmaps, accounts their aggregate byte size, and orchestrates misses:
//! the decode runs on a bounded worker pool while the caller holds a
//! pending handle that resolves on the caller's own executor.
//!
//! # Architecture
//!
//! ```text
//! UI thread ──get_or_load──► PixmapCache ──hit──► CacheEntry
//!                                │
//!                               miss
//!                                ▼
//!                          LoadCoalescer ──already in flight──► PendingLoad
//!                                │
//!                            new load
//!                                ▼
//!                            LoadPool ───► spawn_blocking(load_and_resize)
//!                                │
//!                            completion: insert entry, broadcast to waiters
//! ```

mod coalesce;
mod config;
mod entry;
mod pending;
mod pool;
mod service;
mod stats;
mod store;
mod types;

pub use config::{CacheConfig, DEFAULT_CACHE_LIMIT_BYTES, DEFAULT_MAX_LOAD_WORKERS};
pub use entry::CacheEntry;
pub use pending::{ImageLoad, PendingLoad};
pub use pool::LoadPool;
pub use service::PixmapCache;
pub use stats::{CacheStatistics, CacheStats};
pub use types::CacheKey;
