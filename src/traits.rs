//! # Cache Trait Hierarchy
//!
//! A unified interface over the cache variants in this crate, so wrappers
//! like [`TimedCache`](crate::policy::timed::TimedCache) and the
//! [`Cache`](crate::builder::Cache) facade can work with any of them.
//!
//! ```text
//!            ┌──────────────────────────────────────────┐
//!            │             CoreCache<K, V>              │
//!            │                                          │
//!            │  insert(&self, K, V) → Option<Arc<V>>    │
//!            │  get(&self, &K) → Option<Arc<V>>         │
//!            │  contains / len / is_empty / is_full     │
//!            │  capacity / clear                        │
//!            └────────────────────┬─────────────────────┘
//!                                 │
//!                                 ▼
//!            ┌──────────────────────────────────────────┐
//!            │           MutableCache<K, V>             │
//!            │                                          │
//!            │  remove(&self, &K) → Option<Arc<V>>      │
//!            │  remove_batch(&self, &[K])               │
//!            └────────────────────┬─────────────────────┘
//!                                 │
//!                                 ▼
//!            ┌──────────────────────────────────────────┐
//!            │            SweepCache<K, V>              │
//!            │                                          │
//!            │  remove_where(&self, pred) → usize       │
//!            │  remove_stale(&self, max_age) → usize    │
//!            └──────────────────────────────────────────┘
//! ```
//!
//! All receivers are `&self`: every cache in this crate carries its own lock,
//! so shared references are enough for mutation and the types can be handed
//! across threads behind a plain `Arc`. The [`ConcurrentCache`] marker makes
//! that requirement explicit in bounds.

use std::sync::Arc;
use std::time::Duration;

use crate::entry::Entry;

/// Core operations every cache variant supports.
///
/// # Example
///
/// ```
/// use tiercache::policy::hybrid::HybridCache;
/// use tiercache::traits::CoreCache;
///
/// fn warm<C: CoreCache<u64, String>>(cache: &C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let cache = HybridCache::new(100);
/// warm(&cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts or updates a key, returning the previous value if the key
    /// existed.
    ///
    /// Updating an existing key never evicts. Inserting a new key into a
    /// full cache evicts exactly one victim first.
    fn insert(&self, key: K, value: V) -> Option<Arc<V>>;

    /// Looks up a key, counting a hit as a use (recency and frequency are
    /// refreshed).
    fn get(&self, key: &K) -> Option<Arc<V>>;

    /// Checks for a key without touching it.
    fn contains(&self, key: &K) -> bool;

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the cache is at capacity.
    fn is_full(&self) -> bool;

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Drops all entries, keeping the capacity.
    fn clear(&self);
}

/// Caches that support key-addressed removal.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a key, returning its value if present.
    fn remove(&self, key: &K) -> Option<Arc<V>>;

    /// Removes several keys, returning the removed values in input order.
    ///
    /// The default implementation loops over [`remove`](Self::remove);
    /// implementations override it to take their lock once for the whole
    /// batch.
    fn remove_batch(&self, keys: &[K]) -> Vec<Option<Arc<V>>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Caches that support predicate-driven bulk removal.
///
/// These are the operations the reaper in
/// [`TimedCache`](crate::policy::timed::TimedCache) runs on a schedule.
pub trait SweepCache<K, V>: MutableCache<K, V> {
    /// Removes every entry for which `pred` returns `true`, returning the
    /// number removed.
    ///
    /// The predicate runs under the cache's exclusive lock and must not call
    /// back into the cache; doing so deadlocks.
    fn remove_where<F>(&self, pred: F) -> usize
    where
        F: FnMut(&K, &Entry<V>) -> bool;

    /// Removes every entry whose last use is older than `max_age`, returning
    /// the number removed.
    fn remove_stale(&self, max_age: Duration) -> usize;
}

/// Marker for caches that are safe to share across threads.
///
/// Implementors guarantee `Send + Sync`; use it as a bound when a cache will
/// be touched from several threads:
///
/// ```
/// use tiercache::traits::{ConcurrentCache, CoreCache};
///
/// fn shared_worker<K, V, C>(cache: &C)
/// where
///     C: CoreCache<K, V> + ConcurrentCache,
/// {
///     // safe to use from any thread
/// }
/// ```
pub trait ConcurrentCache: Send + Sync {}
