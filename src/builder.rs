//! Unified cache builder over the eviction variants.
//!
//! Provides a single cache type and a small builder for call sites that pick
//! the variant at runtime.
//!
//! ## Example
//!
//! ```rust
//! use tiercache::builder::{CacheBuilder, CachePolicy};
//!
//! let cache = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Hybrid);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(*cache.get(&1).unwrap(), "hello");
//! ```

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::entry::Entry;
use crate::error::ConfigError;
use crate::policy::hybrid::HybridCache;
use crate::policy::parted::PartedCache;
use crate::traits::{ConcurrentCache, CoreCache, MutableCache, SweepCache};

/// Available cache variants.
#[derive(Debug, Clone)]
pub enum CachePolicy {
    /// Single bounded map with hybrid LRU/LFU eviction.
    Hybrid,
    /// Two-segment active/lazy partition with the given active rate.
    Parted {
        /// Fraction of the capacity assigned to the active segment.
        active_rate: f64,
    },
}

/// Unified cache wrapper that provides a consistent API regardless of
/// variant.
pub struct Cache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    inner: CacheInner<K, V, C>,
}

enum CacheInner<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    Hybrid(HybridCache<K, V, C>),
    Parted(PartedCache<K, V, C>),
}

impl<K, V, C> Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// Inserts a key-value pair. Returns the previous value if the key
    /// existed.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.insert(key, value),
            CacheInner::Parted(cache) => cache.insert(key, value),
        }
    }

    /// Looks up a key, touching the entry on a hit.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.get(key),
            CacheInner::Parted(cache) => cache.get(key),
        }
    }

    /// Checks for a key without touching it.
    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.contains(key),
            CacheInner::Parted(cache) => cache.contains(key),
        }
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.len(),
            CacheInner::Parted(cache) => cache.len(),
        }
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the cache is at capacity.
    pub fn is_full(&self) -> bool {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.is_full(),
            CacheInner::Parted(cache) => cache.is_full(),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.capacity(),
            CacheInner::Parted(cache) => cache.capacity(),
        }
    }

    /// Removes a key, returning its value if present.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.remove(key),
            CacheInner::Parted(cache) => cache.remove(key),
        }
    }

    /// Removes several keys, returning the removed values in input order.
    pub fn remove_batch(&self, keys: &[K]) -> Vec<Option<Arc<V>>> {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.remove_batch(keys),
            CacheInner::Parted(cache) => cache.remove_batch(keys),
        }
    }

    /// Removes every entry matching `pred`, returning the number removed.
    pub fn remove_where<F>(&self, pred: F) -> usize
    where
        F: FnMut(&K, &Entry<V>) -> bool,
    {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.remove_where(pred),
            CacheInner::Parted(cache) => cache.remove_where(pred),
        }
    }

    /// Removes every entry whose last use is older than `max_age`.
    pub fn remove_stale(&self, max_age: Duration) -> usize {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.remove_stale(max_age),
            CacheInner::Parted(cache) => cache.remove_stale(max_age),
        }
    }

    /// Drops all entries, keeping the capacity.
    pub fn clear(&self) {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.clear(),
            CacheInner::Parted(cache) => cache.clear(),
        }
    }

    /// Clones of all keys, in unspecified order.
    pub fn keys(&self) -> Vec<K> {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.keys(),
            CacheInner::Parted(cache) => cache.keys(),
        }
    }

    /// Shared handles to all values, in unspecified order.
    pub fn values(&self) -> Vec<Arc<V>> {
        match &self.inner {
            CacheInner::Hybrid(cache) => cache.values(),
            CacheInner::Parted(cache) => cache.values(),
        }
    }
}

impl<K, V, C> From<HybridCache<K, V, C>> for Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn from(cache: HybridCache<K, V, C>) -> Self {
        Self {
            inner: CacheInner::Hybrid(cache),
        }
    }
}

impl<K, V, C> From<PartedCache<K, V, C>> for Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn from(cache: PartedCache<K, V, C>) -> Self {
        Self {
            inner: CacheInner::Parted(cache),
        }
    }
}

impl<K, V, C> CoreCache<K, V> for Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        Cache::insert(self, key, value)
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        Cache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        Cache::contains(self, key)
    }

    fn len(&self) -> usize {
        Cache::len(self)
    }

    fn is_full(&self) -> bool {
        Cache::is_full(self)
    }

    fn capacity(&self) -> usize {
        Cache::capacity(self)
    }

    fn clear(&self) {
        Cache::clear(self)
    }
}

impl<K, V, C> MutableCache<K, V> for Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn remove(&self, key: &K) -> Option<Arc<V>> {
        Cache::remove(self, key)
    }

    fn remove_batch(&self, keys: &[K]) -> Vec<Option<Arc<V>>> {
        Cache::remove_batch(self, keys)
    }
}

impl<K, V, C> SweepCache<K, V> for Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn remove_where<F>(&self, pred: F) -> usize
    where
        F: FnMut(&K, &Entry<V>) -> bool,
    {
        Cache::remove_where(self, pred)
    }

    fn remove_stale(&self, max_age: Duration) -> usize {
        Cache::remove_stale(self, max_age)
    }
}

impl<K, V, C> ConcurrentCache for Cache<K, V, C>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
    C: Clock,
{
}

/// Builder for creating cache instances.
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Creates a new cache builder with the specified total capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a cache with the specified variant.
    ///
    /// # Panics
    ///
    /// Panics on an invalid configuration; use [`try_build`](Self::try_build)
    /// for the fallible form.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tiercache::builder::{CacheBuilder, CachePolicy};
    ///
    /// // Plain hybrid-eviction cache
    /// let cache = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Hybrid);
    ///
    /// // Partitioned, 80% active
    /// let cache = CacheBuilder::new(100)
    ///     .build::<u64, String>(CachePolicy::Parted { active_rate: 0.8 });
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        self.try_build(policy).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Fallible form of [`build`](Self::build).
    pub fn try_build<K, V>(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        let inner = match policy {
            CachePolicy::Hybrid => CacheInner::Hybrid(HybridCache::try_new(self.capacity)?),
            CachePolicy::Parted { active_rate } => {
                CacheInner::Parted(PartedCache::try_new(self.capacity, active_rate)?)
            }
        };
        Ok(Cache { inner })
    }
}
