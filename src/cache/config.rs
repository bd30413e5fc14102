//! Configuration for the pixmap cache.

/// Default advisory cache limit: 1 GiB of decoded pixels.
pub const DEFAULT_CACHE_LIMIT_BYTES: usize = 1024 * 1024 * 1024;

/// Default bound on concurrent decode workers.
///
/// Caps file-descriptor and memory pressure from simultaneous decodes
/// without starving a fast gallery scroll.
pub const DEFAULT_MAX_LOAD_WORKERS: usize = 128;

/// Pixmap cache configuration.
///
/// The cache limit is advisory: the cache tracks its aggregate size and
/// warns when the limit is crossed, but never evicts. Entries leave only
/// through explicit deletes issued after file moves.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Advisory resident-size limit in bytes.
    pub cache_limit_bytes: usize,
    /// Maximum number of decodes running at once.
    pub max_load_workers: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_limit_bytes: DEFAULT_CACHE_LIMIT_BYTES,
            max_load_workers: DEFAULT_MAX_LOAD_WORKERS,
        }
    }
}

impl CacheConfig {
    /// Set the advisory cache limit.
    pub fn with_cache_limit_bytes(mut self, bytes: usize) -> Self {
        self.cache_limit_bytes = bytes;
        self
    }

    /// Set the worker bound.
    pub fn with_max_load_workers(mut self, workers: usize) -> Self {
        self.max_load_workers = workers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.cache_limit_bytes, 1024 * 1024 * 1024);
        assert_eq!(config.max_load_workers, 128);
    }

    #[test]
    fn test_builders() {
        let config = CacheConfig::default()
            .with_cache_limit_bytes(64 * 1024 * 1024)
            .with_max_load_workers(4);
        assert_eq!(config.cache_limit_bytes, 64 * 1024 * 1024);
        assert_eq!(config.max_load_workers, 4);
    }
}
