//! Cache statistics tracking and reporting.

use std::time::Instant;

/// Counters for monitoring and debugging the pixmap cache.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Lookups answered from residency.
    pub hits: u64,
    /// Lookups that found nothing resident.
    pub misses: u64,
    /// Misses that attached to an already in-flight load.
    pub coalesced_waits: u64,
    /// Pipeline executions started.
    pub loads_started: u64,
    /// Pipeline executions that produced a resident entry.
    pub loads_completed: u64,
    /// Pipeline executions that failed to decode.
    pub load_failures: u64,
    /// Loads that found the file gone (routine, not a failure).
    pub missing_files: u64,
    /// Current aggregate resident size in bytes.
    pub size_bytes: usize,
    /// Current resident entry count.
    pub entry_count: usize,
    /// When this tracker was created.
    pub created_at: Instant,
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStats {
    /// Create a new statistics tracker.
    pub fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            coalesced_waits: 0,
            loads_started: 0,
            loads_completed: 0,
            load_failures: 0,
            missing_files: 0,
            size_bytes: 0,
            entry_count: 0,
            created_at: Instant::now(),
        }
    }

    /// Lookup hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Uptime since statistics started.
    pub fn uptime(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_coalesced_wait(&mut self) {
        self.coalesced_waits += 1;
    }

    pub fn record_load_started(&mut self) {
        self.loads_started += 1;
    }

    pub fn record_load_completed(&mut self) {
        self.loads_completed += 1;
    }

    pub fn record_load_failure(&mut self) {
        self.load_failures += 1;
    }

    pub fn record_missing_file(&mut self) {
        self.missing_files += 1;
    }

    /// Update resident size metrics after a store mutation.
    pub fn update_size(&mut self, size_bytes: usize, entry_count: usize) {
        self.size_bytes = size_bytes;
        self.entry_count = entry_count;
    }
}

/// Snapshot of cache statistics for reporting.
#[derive(Debug, Clone)]
pub struct CacheStatistics {
    pub stats: CacheStats,
    pub hit_rate_percent: f64,
    pub uptime_secs: u64,
}

impl CacheStatistics {
    /// Create a snapshot from current stats.
    pub fn from_stats(stats: &CacheStats) -> Self {
        Self {
            stats: stats.clone(),
            hit_rate_percent: stats.hit_rate() * 100.0,
            uptime_secs: stats.uptime().as_secs(),
        }
    }

    /// Format statistics as a human-readable string.
    pub fn format(&self) -> String {
        let stats = &self.stats;
        format!(
            r#"Pixmap Cache Statistics

RESIDENT
  Entries:     {}
  Size:        {:.2} MB

LOOKUPS
  Hits:        {}
  Misses:      {}
  Hit Rate:    {:.1}%
  Coalesced:   {}

LOADS
  Started:     {}
  Completed:   {}
  Failures:    {}
  Missing:     {}

Uptime:        {}s
"#,
            stats.entry_count,
            stats.size_bytes as f64 / (1024.0 * 1024.0),
            stats.hits,
            stats.misses,
            self.hit_rate_percent,
            stats.coalesced_waits,
            stats.loads_started,
            stats.loads_completed,
            stats.load_failures,
            stats.missing_files,
            self.uptime_secs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zeroed() {
        let stats = CacheStats::default();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.loads_started, 0);
        assert_eq!(stats.size_bytes, 0);
    }

    #[test]
    fn test_hit_rate_no_lookups() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.hits = 75;
        stats.misses = 25;
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_counters() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_coalesced_wait();
        stats.record_load_started();
        stats.record_load_completed();
        stats.record_load_failure();
        stats.record_missing_file();

        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.coalesced_waits, 1);
        assert_eq!(stats.loads_started, 1);
        assert_eq!(stats.loads_completed, 1);
        assert_eq!(stats.load_failures, 1);
        assert_eq!(stats.missing_files, 1);
    }

    #[test]
    fn test_update_size() {
        let mut stats = CacheStats::new();
        stats.update_size(500_000, 12);
        assert_eq!(stats.size_bytes, 500_000);
        assert_eq!(stats.entry_count, 12);
    }

    #[test]
    fn test_snapshot_and_format() {
        let mut stats = CacheStats::new();
        stats.hits = 90;
        stats.misses = 10;
        stats.entry_count = 7;
        stats.size_bytes = 2 * 1024 * 1024;

        let snapshot = CacheStatistics::from_stats(&stats);
        assert_eq!(snapshot.hit_rate_percent, 90.0);

        let formatted = snapshot.format();
        assert!(formatted.contains("Entries:     7"));
        assert!(formatted.contains("Hit Rate:    90.0%"));
        assert!(formatted.contains("Size:        2.00 MB"));
    }
}
