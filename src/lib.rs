//! PixCache - asynchronous pixmap cache for image browsers.
//!
//! This library provides the caching core of an image organizer: a keyed
//! store of decoded-and-resized images, a blocking decode/resize pipeline
//! that runs on a bounded worker pool, and a pending-load handle that lets
//! a single-threaded presentation layer request images without ever
//! blocking on I/O or decode work.
//!
//! # High-Level API
//!
//! ```ignore
//! use pixcache::{CacheConfig, Dimensions, ImageLoad, PixmapCache};
//!
//! // Must be created within a Tokio runtime.
//! let cache = PixmapCache::new(CacheConfig::default());
//!
//! match cache.get_or_load(path, Dimensions::new(800, 600)) {
//!     ImageLoad::Ready(entry) => render(entry.pixmap()),
//!     ImageLoad::Pending(pending) => {
//!         // Await on the UI's own executor; the decode runs elsewhere.
//!         if let Some(entry) = pending.wait().await {
//!             render(entry.pixmap());
//!         }
//!     }
//! }
//!
//! // Keep the cache consistent after file moves.
//! cache.rename(&old_path, &new_path);
//!
//! // Drain in-flight decodes before process exit.
//! cache.shutdown().await;
//! ```

pub mod cache;
pub mod dimensions;
pub mod logging;
pub mod pipeline;
pub mod pixmap;

pub use cache::{
    CacheConfig, CacheEntry, CacheKey, CacheStats, CacheStatistics, ImageLoad, LoadPool,
    PendingLoad, PixmapCache,
};
pub use dimensions::Dimensions;
pub use pipeline::{load_and_resize, FileLoader, LoadError, Loader};
pub use pixmap::{Pixmap, BYTES_PER_PIXEL};

/// Version of the PixCache library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
