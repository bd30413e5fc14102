//! The pixmap cache facade.
//!
//! `PixmapCache` owns the resident store, the size accounting, the load
//! coalescer and the worker pool, and exposes the data-level contract the
//! presentation layer consumes: request an image at `(path, dimensions)`
//! and either receive it immediately or get a pending handle.
//!
//! Locking discipline: the store and the statistics each sit behind their
//! own mutex, taken briefly and never across an await point or each
//! other. Worker completions and consumer lookups therefore serialize on
//! map and counter mutations without ever blocking the consumer on decode
//! work.

use crate::cache::coalesce::LoadCoalescer;
use crate::cache::config::CacheConfig;
use crate::cache::entry::CacheEntry;
use crate::cache::pending::{ImageLoad, PendingLoad};
use crate::cache::pool::LoadPool;
use crate::cache::stats::{CacheStatistics, CacheStats};
use crate::cache::store::PixmapStore;
use crate::cache::types::{normalize_path, CacheKey};
use crate::dimensions::Dimensions;
use crate::pipeline::{FileLoader, LoadError, Loader};
use crate::pixmap::Pixmap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Keyed cache of decoded-and-resized images with asynchronous loading.
///
/// Lookups are synchronous and non-blocking. Misses are decoded on a
/// bounded worker pool; concurrent misses for the same key share a single
/// decode. The configured cache limit is advisory: crossing it logs a
/// warning, but entries only leave through explicit deletes (issued by
/// callers after file moves) or [`clear`](Self::clear).
///
/// Create the cache from within a Tokio runtime; the worker pool captures
/// the runtime handle at construction.
pub struct PixmapCache {
    store: Mutex<PixmapStore>,
    stats: Mutex<CacheStats>,
    coalescer: LoadCoalescer,
    pool: LoadPool,
    loader: Arc<dyn Loader>,
    config: CacheConfig,
}

impl PixmapCache {
    /// Create a cache that decodes files with the production pipeline.
    pub fn new(config: CacheConfig) -> Arc<Self> {
        Self::with_loader(config, Arc::new(FileLoader))
    }

    /// Create a cache with a custom loader.
    ///
    /// The seam exists for tests (instrumented or failing loaders) and
    /// mirrors the production constructor otherwise.
    pub fn with_loader(config: CacheConfig, loader: Arc<dyn Loader>) -> Arc<Self> {
        info!(
            cache_limit_bytes = config.cache_limit_bytes,
            max_load_workers = config.max_load_workers,
            "creating pixmap cache"
        );
        Arc::new(Self {
            store: Mutex::new(PixmapStore::new()),
            stats: Mutex::new(CacheStats::new()),
            coalescer: LoadCoalescer::new(),
            pool: LoadPool::new(config.max_load_workers),
            loader,
            config,
        })
    }

    /// Synchronous, pure lookup. Never triggers loading.
    pub fn get(&self, path: &Path, dimensions: Dimensions) -> Option<CacheEntry> {
        let path = normalize_path(path);
        let found = self.store.lock().unwrap().get(&path, dimensions);
        let mut stats = self.stats.lock().unwrap();
        if found.is_some() {
            stats.record_hit();
        } else {
            stats.record_miss();
        }
        found
    }

    /// All resident entries for a path, one per cached dimensions.
    ///
    /// Pure bulk lookup; does not count toward hit/miss statistics.
    pub fn entries_for(&self, path: &Path) -> Vec<CacheEntry> {
        let path = normalize_path(path);
        self.store.lock().unwrap().entries_for(&path)
    }

    /// Store an entry, replacing any prior entry for the same key.
    pub fn insert(&self, path: &Path, entry: CacheEntry) {
        let path = normalize_path(path);
        self.insert_normalized(&path, entry);
    }

    /// Return the resident entry, or schedule a load and hand back a
    /// pending handle.
    ///
    /// The handle resolves on the caller's own executor; worker threads
    /// only publish results, they never run consumer code. Concurrent
    /// misses for the same key attach to one in-flight decode. After
    /// shutdown, misses resolve immediately to absent.
    pub fn get_or_load(self: &Arc<Self>, path: &Path, dimensions: Dimensions) -> ImageLoad {
        let key = CacheKey::new(path, dimensions);

        let resident = self.store.lock().unwrap().get(&key.path, dimensions);
        if let Some(entry) = resident {
            self.stats.lock().unwrap().record_hit();
            return ImageLoad::Ready(entry);
        }
        self.stats.lock().unwrap().record_miss();

        if self.pool.is_shut_down() {
            debug!(path = %key.path.display(), "miss after shutdown, resolving absent");
            return ImageLoad::Pending(PendingLoad::closed(key));
        }

        let registration = self.coalescer.register(&key);
        if registration.is_leader() {
            self.stats.lock().unwrap().record_load_started();
            self.spawn_load(key.clone());
        } else {
            self.stats.lock().unwrap().record_coalesced_wait();
        }
        ImageLoad::Pending(PendingLoad::new(key, registration.into_receiver()))
    }

    /// Remove all entries for a path. Returns whether anything was removed.
    pub fn delete(&self, path: &Path) -> bool {
        let path = normalize_path(path);
        let (removed, size, count) = {
            let mut store = self.store.lock().unwrap();
            let removed = store.delete(&path);
            (removed, store.size_bytes(), store.entry_count())
        };
        self.stats.lock().unwrap().update_size(size, count);
        if removed {
            debug!(path = %path.display(), "deleted cached entries");
        }
        removed
    }

    /// Remove the single entry for `(path, dimensions)`.
    pub fn delete_at(&self, path: &Path, dimensions: Dimensions) -> bool {
        let path = normalize_path(path);
        let (removed, size, count) = {
            let mut store = self.store.lock().unwrap();
            let removed = store.delete_at(&path, dimensions);
            (removed, store.size_bytes(), store.entry_count())
        };
        self.stats.lock().unwrap().update_size(size, count);
        if removed {
            debug!(path = %path.display(), %dimensions, "deleted cached entry");
        }
        removed
    }

    /// Re-key all entries for `old` to `new` after a file move.
    ///
    /// Pixel data and size accounting are untouched; a cache built before
    /// the move stays valid after it.
    pub fn rename(&self, old: &Path, new: &Path) -> bool {
        let old = normalize_path(old);
        let new = normalize_path(new);
        let (renamed, size, count) = {
            let mut store = self.store.lock().unwrap();
            let renamed = store.rename(&old, &new);
            (renamed, store.size_bytes(), store.entry_count())
        };
        self.stats.lock().unwrap().update_size(size, count);
        if renamed {
            debug!(
                old = %old.display(),
                new = %new.display(),
                "re-keyed cached entries"
            );
        }
        renamed
    }

    /// Drop every resident entry.
    pub fn clear(&self) {
        let mut store = self.store.lock().unwrap();
        store.clear();
        let (size, count) = (store.size_bytes(), store.entry_count());
        drop(store);
        self.stats.lock().unwrap().update_size(size, count);
        info!("cleared pixmap cache");
    }

    /// Current aggregate resident size in bytes.
    ///
    /// Diagnostic value; nothing evicts based on it.
    pub fn size_bytes(&self) -> usize {
        self.store.lock().unwrap().size_bytes()
    }

    /// Number of resident entries.
    pub fn entry_count(&self) -> usize {
        self.store.lock().unwrap().entry_count()
    }

    /// Number of loads currently in flight.
    pub fn pending_loads(&self) -> usize {
        self.coalescer.in_flight_count()
    }

    /// Snapshot of the raw counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().unwrap().clone()
    }

    /// Derived statistics for display.
    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics::from_stats(&self.stats.lock().unwrap())
    }

    /// Drain in-flight decodes and stop accepting new loads.
    ///
    /// Running decodes finish and publish normally; queued loads abort
    /// and their waiters resolve to absent.
    pub async fn shutdown(&self) {
        self.pool.shutdown().await;
    }

    /// Spawn the decode for `key` on the worker pool.
    ///
    /// The caller must already hold the coalescer leadership for `key`;
    /// exactly one of `complete` or `abort` runs for it.
    fn spawn_load(self: &Arc<Self>, key: CacheKey) {
        let cache = Arc::clone(self);
        let semaphore = self.pool.semaphore();
        let shutdown = self.pool.shutdown_token();
        self.pool.spawn(async move {
            let permit = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    // Cancelled before the decode started: no completion
                    // fires, waiters resolve to absent.
                    cache.coalescer.abort(&key);
                    return;
                }
                permit = semaphore.acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => {
                        cache.coalescer.abort(&key);
                        return;
                    }
                },
            };

            let loader = Arc::clone(&cache.loader);
            let load_key = key.clone();
            let result = tokio::task::spawn_blocking(move || {
                loader.load(&load_key.path, load_key.dimensions)
            })
            .await;
            drop(permit);

            let flattened = match result {
                Ok(load_result) => load_result,
                Err(join_err) => {
                    // A panicking decode is a decode failure, not ours.
                    warn!(
                        path = %key.path.display(),
                        error = %join_err,
                        "decode task panicked"
                    );
                    cache.stats.lock().unwrap().record_load_failure();
                    cache.coalescer.complete(&key, None);
                    return;
                }
            };
            cache.finish_load(&key, flattened);
        });
    }

    /// Publish a finished load: store the entry, update accounting, and
    /// broadcast to every waiter.
    fn finish_load(&self, key: &CacheKey, result: Result<Option<Pixmap>, LoadError>) {
        let outcome = match result {
            Ok(Some(pixmap)) => {
                let entry = CacheEntry::new(pixmap, key.dimensions);
                self.insert_normalized(&key.path, entry.clone());
                self.stats.lock().unwrap().record_load_completed();
                debug!(
                    path = %key.path.display(),
                    dimensions = %key.dimensions,
                    size_bytes = entry.size_bytes(),
                    "image loaded into cache"
                );
                Some(entry)
            }
            Ok(None) => {
                // Routine: the file moved or vanished between discovery
                // and display.
                debug!(path = %key.path.display(), "image file missing, nothing to cache");
                self.stats.lock().unwrap().record_missing_file();
                None
            }
            Err(err) => {
                warn!(path = %key.path.display(), error = %err, "image decode failed");
                self.stats.lock().unwrap().record_load_failure();
                None
            }
        };
        self.coalescer.complete(key, outcome);
    }

    /// Insert with an already-normalized path.
    fn insert_normalized(&self, path: &Path, entry: CacheEntry) {
        let (size_before, size_after, count) = {
            let mut store = self.store.lock().unwrap();
            let before = store.size_bytes();
            store.insert(path, entry);
            (before, store.size_bytes(), store.entry_count())
        };
        self.stats.lock().unwrap().update_size(size_after, count);

        let limit = self.config.cache_limit_bytes;
        if size_before <= limit && size_after > limit {
            // Advisory only: nothing is evicted.
            warn!(
                size_bytes = size_after,
                cache_limit_bytes = limit,
                "pixmap cache exceeded its advisory limit"
            );
        }
    }
}

impl std::fmt::Debug for PixmapCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapCache")
            .field("size_bytes", &self.size_bytes())
            .field("entry_count", &self.entry_count())
            .field("pending_loads", &self.pending_loads())
            .field("pool", &self.pool)
            .finish()
    }
}
