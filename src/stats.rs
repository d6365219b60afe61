//! Operation counters for cache observability.
//!
//! Each cache core records its operations into a [`StatsCollector`], a set of
//! shared atomic counters that can be read without taking the cache lock.
//! [`CacheStats`] is the point-in-time value snapshot handed to callers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    updates: AtomicU64,
    evictions: AtomicU64,
    swept: AtomicU64,
}

/// Shared atomic counters recorded by a cache core.
///
/// Cloning shares the underlying counters.
#[derive(Debug, Clone, Default)]
pub(crate) struct StatsCollector {
    counters: Arc<Counters>,
}

impl StatsCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_insert(&self) {
        self.counters.inserts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_update(&self) {
        self.counters.updates.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_eviction(&self) {
        self.counters.evictions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_swept(&self, count: usize) {
        self.counters
            .swept
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, len: usize, capacity: usize) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            inserts: self.counters.inserts.load(Ordering::Relaxed),
            updates: self.counters.updates.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            swept: self.counters.swept.load(Ordering::Relaxed),
            len,
            capacity,
        }
    }
}

/// Point-in-time cache statistics.
///
/// # Example
///
/// ```
/// use tiercache::policy::hybrid::HybridCache;
///
/// let cache: HybridCache<u64, &str> = HybridCache::new(10);
/// cache.insert(1, "one");
/// cache.get(&1);
/// cache.get(&2);
///
/// let stats = cache.stats();
/// assert_eq!(stats.hits, 1);
/// assert_eq!(stats.misses, 1);
/// assert_eq!(stats.inserts, 1);
/// assert_eq!(stats.hit_rate(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found the key.
    pub hits: u64,
    /// Lookups that missed.
    pub misses: u64,
    /// Fresh inserts of previously absent keys.
    pub inserts: u64,
    /// In-place updates of existing keys.
    pub updates: u64,
    /// Entries displaced by capacity pressure.
    pub evictions: u64,
    /// Entries removed by predicate or staleness sweeps.
    pub swept: u64,
    /// Entry count at snapshot time.
    pub len: usize,
    /// Configured capacity at snapshot time.
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups that hit, or `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let collector = StatsCollector::new();
        collector.record_hit();
        collector.record_hit();
        collector.record_miss();
        collector.record_insert();
        collector.record_update();
        collector.record_eviction();
        collector.record_swept(3);

        let stats = collector.snapshot(5, 10);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.swept, 3);
        assert_eq!(stats.len, 5);
        assert_eq!(stats.capacity, 10);
    }

    #[test]
    fn clones_share_counters() {
        let collector = StatsCollector::new();
        let other = collector.clone();

        collector.record_hit();
        other.record_hit();

        assert_eq!(collector.snapshot(0, 0).hits, 2);
    }

    #[test]
    fn hit_rate_of_empty_stats_is_zero() {
        let stats = StatsCollector::new().snapshot(0, 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_is_hits_over_lookups() {
        let collector = StatsCollector::new();
        collector.record_hit();
        collector.record_hit();
        collector.record_hit();
        collector.record_miss();

        assert_eq!(collector.snapshot(0, 0).hit_rate(), 0.75);
    }
}
