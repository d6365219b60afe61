//! Hybrid LRU/LFU bounded cache.
//!
//! The building block for every variant in this crate: a bounded map whose
//! eviction victim is chosen by a compound recency *and* frequency predicate,
//! so a very old but heavily used entry outlives a recent one-shot entry.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        HybridCache<K, V, C>                         │
//! │                                                                     │
//! │                  Arc<parking_lot::RwLock<HybridCore>>               │
//! │                              │                                      │
//! │   ┌──────────────────────────▼──────────────────────────────────┐   │
//! │   │                   HybridCore<K, V, C>                       │   │
//! │   │                                                             │   │
//! │   │   map: FxHashMap<K, Entry<V>>      ticks: TickSource<C>     │   │
//! │   │                                                             │   │
//! │   │   ┌─────────┬──────────────────────────────┐                │   │
//! │   │   │   Key   │  Entry                       │                │   │
//! │   │   ├─────────┼──────────────────────────────┤                │   │
//! │   │   │ "page1" │ Arc<V>, last_tick, uses      │ ◄── touch on   │   │
//! │   │   │ "page2" │ Arc<V>, last_tick, uses      │     get/update │   │
//! │   │   └─────────┴──────────────────────────────┘                │   │
//! │   └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//!
//! Insert Flow (new key, cache full)
//! ─────────────────────────────────
//!
//!   insert(k, v):                       single exclusive critical section
//!     1. take write lock
//!     2. scan for the coldest entry (older AND not more used)
//!     3. remove it
//!     4. insert Entry { v, now(), uses: 1 }
//!     5. release lock
//! ```
//!
//! ## Eviction policy
//!
//! The victim scan initializes with an arbitrary entry and replaces the
//! candidate whenever another entry is *strictly older* and *used no more
//! often*. The compound predicate is conservative: recency alone never
//! condemns a frequently used entry, which layers LFU protection over LRU
//! recency. Because the candidate starts as a real entry, the scan always
//! yields a victim even when no entry dominates all others.
//!
//! The scan is O(N) per eviction. That is deliberate: capacities here are
//! expected to be small (tens to low thousands), and the scan avoids the
//! bookkeeping structures an O(1) policy needs on every access.
//!
//! ## Operations
//!
//! | Operation       | Lock  | Notes                                   |
//! |-----------------|-------|-----------------------------------------|
//! | `insert`        | write | update never evicts; insert may         |
//! | `get`           | write | lookup + touch, so exclusive            |
//! | `peek`          | read  | no touch                                |
//! | `coldest`       | read  | eviction victim preview                 |
//! | `hottest`       | read  | promotion candidate preview             |
//! | `resize`        | write | shrink returns displaced entries        |
//! | `bulk_insert`   | write | entries keep their tracking metadata    |
//! | `remove_where`  | write | predicate must not re-enter the cache   |
//! | `snapshot`      | read  | point-in-time copy                      |
//!
//! ## Thread Safety
//!
//! - [`HybridCore`]: not thread-safe, single-threaded use only
//! - [`HybridCache`]: thread-safe via `parking_lot::RwLock`; clones share
//!   the same cache
//!
//! ## Example Usage
//!
//! ```
//! use tiercache::policy::hybrid::HybridCache;
//!
//! let cache: HybridCache<&str, i32> = HybridCache::new(2);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//!
//! // Touch "a" so "b" becomes the eviction victim.
//! cache.get(&"a");
//! cache.insert("c", 3);
//!
//! assert!(cache.contains(&"a"));
//! assert!(!cache.contains(&"b"));
//! assert!(cache.contains(&"c"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;

use crate::clock::{Clock, SystemClock, Tick, TickSource};
use crate::entry::Entry;
use crate::error::ConfigError;
use crate::stats::{CacheStats, StatsCollector};
use crate::traits::{ConcurrentCache, CoreCache, MutableCache, SweepCache};

/// Single-threaded hybrid-eviction cache core.
///
/// Owns the map, the capacity bound and the tick source. All tracking
/// mutations (touch on get, tick stamping on insert) happen here, so the
/// concurrent wrapper only needs to pick the right lock mode per call.
///
/// # Type Parameters
///
/// - `K`: key type, `Eq + Hash + Clone` (keys are cloned into scan results)
/// - `V`: value type, stored as `Arc<V>`
/// - `C`: time source, defaults to [`SystemClock`]
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tiercache::policy::hybrid::HybridCore;
///
/// let mut core: HybridCore<&str, i32> = HybridCore::new(10);
/// core.insert("key", Arc::new(42));
/// assert_eq!(core.get(&"key").as_deref(), Some(&42));
/// ```
pub struct HybridCore<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    map: FxHashMap<K, Entry<V>>,
    capacity: usize,
    ticks: TickSource<C>,
    stats: StatsCollector,
}

impl<K, V> HybridCore<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    /// Creates a core with the given capacity, reading the system clock.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, SystemClock)
    }

    /// Fallible form of [`new`](Self::new).
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_clock(capacity, SystemClock)
    }
}

impl<K, V, C> HybridCore<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// Creates a core with a custom clock.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_clock(capacity: usize, clock: C) -> Self {
        Self::try_with_clock(capacity, clock).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Fallible form of [`with_clock`](Self::with_clock).
    pub fn try_with_clock(capacity: usize, clock: C) -> Result<Self, ConfigError> {
        Self::try_with_ticks(capacity, TickSource::new(clock))
    }

    pub(crate) fn try_with_ticks(
        capacity: usize,
        ticks: TickSource<C>,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        Ok(Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
            ticks,
            stats: StatsCollector::new(),
        })
    }

    /// Inserts or updates a key, returning the previous value if present.
    ///
    /// Updating an existing key touches it and never evicts. Inserting a new
    /// key into a full cache first evicts the [`coldest`](Self::coldest)
    /// entry; selection and insertion happen inside the caller's single
    /// borrow, so no other entry can slip in between.
    pub fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        if let Some(entry) = self.map.get_mut(&key) {
            let tick = self.ticks.now();
            let old = entry.replace(value, tick);
            self.stats.record_update();
            return Some(old);
        }

        while self.map.len() >= self.capacity {
            if self.evict_coldest().is_none() {
                break;
            }
            self.stats.record_eviction();
        }

        let tick = self.ticks.now();
        self.map.insert(key, Entry::new(value, tick));
        self.stats.record_insert();
        None
    }

    /// Looks up a key, touching the entry on a hit.
    pub fn get(&mut self, key: &K) -> Option<Arc<V>> {
        match self.map.get_mut(key) {
            Some(entry) => {
                let tick = self.ticks.now();
                entry.touch(tick);
                self.stats.record_hit();
                Some(entry.shared_value())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Looks up a key without touching it.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.map.get(key).map(Entry::shared_value)
    }

    /// Returns `true` if the key is present. Does not touch.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Current number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if the cache is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.map.len() >= self.capacity
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes a key, returning its value if present.
    pub fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        self.map.remove(key).map(Entry::into_value)
    }

    /// Removes several keys in one pass, returning values in input order.
    pub fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<Arc<V>>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }

    /// Removes every entry matching `pred`, returning the number removed.
    pub fn remove_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&K, &Entry<V>) -> bool,
    {
        let before = self.map.len();
        self.map.retain(|k, e| !pred(k, e));
        let removed = before - self.map.len();
        self.stats.record_swept(removed);
        removed
    }

    /// Removes every entry whose last use is older than `max_age`.
    pub fn remove_stale(&mut self, max_age: Duration) -> usize {
        let now = self.ticks.now();
        let cutoff = max_age.as_micros() as u64;
        self.remove_where(|_, entry| {
            now.micros().saturating_sub(entry.last_tick().micros()) > cutoff
        })
    }

    /// Drops all entries, keeping the capacity.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Clones of all keys, in unspecified order.
    pub fn keys(&self) -> Vec<K> {
        self.map.keys().cloned().collect()
    }

    /// Shared handles to all values, in unspecified order.
    pub fn values(&self) -> Vec<Arc<V>> {
        self.map.values().map(Entry::shared_value).collect()
    }

    /// Point-in-time copy of the entries, tracking metadata included.
    pub fn snapshot(&self) -> HashMap<K, Entry<V>> {
        self.map
            .iter()
            .map(|(k, e)| (k.clone(), e.clone()))
            .collect()
    }

    /// Point-in-time key → value map, without tracking metadata.
    pub fn to_map(&self) -> HashMap<K, Arc<V>> {
        self.map
            .iter()
            .map(|(k, e)| (k.clone(), e.shared_value()))
            .collect()
    }

    /// The least recently *and* least frequently used entry: the eviction
    /// victim.
    ///
    /// The scan starts from an arbitrary entry and replaces the candidate
    /// whenever another entry is strictly older and used no more often (the
    /// first such match wins; iteration order is unspecified). Returns
    /// `None` only on an empty cache.
    pub fn coldest(&self) -> Option<(K, Tick, u64)> {
        let mut iter = self.map.iter();
        let (first_key, first) = iter.next()?;
        let mut key = first_key;
        let mut tick = first.last_tick();
        let mut uses = first.uses();
        for (k, e) in iter {
            if e.last_tick() < tick && e.uses() <= uses {
                key = k;
                tick = e.last_tick();
                uses = e.uses();
            }
        }
        Some((key.clone(), tick, uses))
    }

    /// The most recently *and* most frequently used entry: the promotion
    /// candidate. Symmetric dual of [`coldest`](Self::coldest): replaces on
    /// strictly newer and used no less often.
    pub fn hottest(&self) -> Option<(K, Tick, u64)> {
        let mut iter = self.map.iter();
        let (first_key, first) = iter.next()?;
        let mut key = first_key;
        let mut tick = first.last_tick();
        let mut uses = first.uses();
        for (k, e) in iter {
            if e.last_tick() > tick && e.uses() >= uses {
                key = k;
                tick = e.last_tick();
                uses = e.uses();
            }
        }
        Some((key.clone(), tick, uses))
    }

    /// Changes the capacity. Shrinking below the current length removes
    /// coldest entries until the new bound fits and returns them, metadata
    /// intact, for the caller to move into a sibling cache.
    ///
    /// # Panics
    ///
    /// Panics if `new_capacity` is zero.
    pub fn resize(&mut self, new_capacity: usize) -> Vec<(K, Entry<V>)> {
        assert!(new_capacity > 0, "capacity must be greater than zero");
        let mut overflow = Vec::new();
        while self.map.len() > new_capacity {
            match self.evict_coldest() {
                Some(displaced) => overflow.push(displaced),
                None => break,
            }
        }
        self.capacity = new_capacity;
        overflow
    }

    /// Inserts entries verbatim, preserving their `last_tick` and `uses`.
    /// Evicts coldest entries afterwards if the capacity is exceeded.
    pub fn bulk_insert<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, Entry<V>)>,
    {
        for (key, entry) in entries {
            self.map.insert(key, entry);
        }
        while self.map.len() > self.capacity {
            if self.evict_coldest().is_none() {
                break;
            }
            self.stats.record_eviction();
        }
    }

    /// Snapshot of the operation counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.map.len(), self.capacity)
    }

    fn evict_coldest(&mut self) -> Option<(K, Entry<V>)> {
        let key = self.coldest().map(|(k, _, _)| k)?;
        let entry = self.map.remove(&key)?;
        Some((key, entry))
    }

    /// Removes an entry as a capacity decision, counting it as an eviction.
    pub(crate) fn evict_key(&mut self, key: &K) -> Option<Entry<V>> {
        let entry = self.map.remove(key);
        if entry.is_some() {
            self.stats.record_eviction();
        }
        entry
    }

    /// Removes and returns the entry verbatim, for a cross-segment move.
    pub(crate) fn take_entry(&mut self, key: &K) -> Option<Entry<V>> {
        self.map.remove(key)
    }

    /// Re-inserts an entry verbatim. The caller guarantees room.
    pub(crate) fn put_entry(&mut self, key: K, entry: Entry<V>) {
        self.map.insert(key, entry);
    }
}

impl<K, V, C> fmt::Debug for HybridCore<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridCore")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Thread-safe hybrid-eviction cache.
///
/// Wraps a [`HybridCore`] in `Arc<parking_lot::RwLock<_>>`. Read-only
/// operations (`peek`, `len`, `keys`, `coldest`, `snapshot`, ...) take the
/// shared lock; anything that touches tracking metadata (including `get`)
/// takes the exclusive lock, so the lookup and the touch are one atomic
/// step.
///
/// Clones share the same cache:
///
/// ```
/// use std::thread;
/// use tiercache::policy::hybrid::HybridCache;
///
/// let cache: HybridCache<u32, String> = HybridCache::new(100);
/// let worker = cache.clone();
///
/// thread::spawn(move || {
///     worker.insert(1, "from another thread".to_string());
/// })
/// .join()
/// .unwrap();
///
/// assert!(cache.contains(&1));
/// ```
pub struct HybridCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    inner: Arc<RwLock<HybridCore<K, V, C>>>,
}

impl<K, V, C> Clone for HybridCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> HybridCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with the given capacity, reading the system clock.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use tiercache::policy::hybrid::HybridCache;
    ///
    /// let cache: HybridCache<u32, String> = HybridCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, SystemClock)
    }

    /// Fallible form of [`new`](Self::new).
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_clock(capacity, SystemClock)
    }
}

impl<K, V, C> HybridCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// Creates a cache with a custom clock (useful for testing).
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_clock(capacity: usize, clock: C) -> Self {
        Self::try_with_clock(capacity, clock).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Fallible form of [`with_clock`](Self::with_clock).
    pub fn try_with_clock(capacity: usize, clock: C) -> Result<Self, ConfigError> {
        Self::try_with_ticks(capacity, TickSource::new(clock))
    }

    pub(crate) fn try_with_ticks(
        capacity: usize,
        ticks: TickSource<C>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Arc::new(RwLock::new(HybridCore::try_with_ticks(capacity, ticks)?)),
        })
    }

    /// Inserts a value, wrapping it in `Arc<V>` internally.
    ///
    /// Returns the previous value if the key existed; an update never
    /// evicts. Inserting a new key into a full cache evicts exactly one
    /// victim inside the same exclusive critical section.
    ///
    /// # Example
    ///
    /// ```
    /// use tiercache::policy::hybrid::HybridCache;
    ///
    /// let cache: HybridCache<u32, String> = HybridCache::new(100);
    ///
    /// assert!(cache.insert(1, "first".to_string()).is_none());
    /// let old = cache.insert(1, "updated".to_string());
    /// assert_eq!(*old.unwrap(), "first");
    /// ```
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        self.insert_arc(key, Arc::new(value))
    }

    /// Inserts an `Arc<V>` directly (zero-copy if already shared).
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use tiercache::policy::hybrid::HybridCache;
    ///
    /// let cache: HybridCache<u32, String> = HybridCache::new(100);
    /// let shared = Arc::new("shared".to_string());
    /// cache.insert_arc(1, Arc::clone(&shared));
    ///
    /// assert!(Arc::ptr_eq(&shared, &cache.get(&1).unwrap()));
    /// ```
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.write().insert(key, value)
    }

    /// Looks up a key. A hit counts as a use: the entry's recency and
    /// frequency are refreshed, which is why this takes the write lock.
    ///
    /// # Example
    ///
    /// ```
    /// use tiercache::policy::hybrid::HybridCache;
    ///
    /// let cache: HybridCache<u32, String> = HybridCache::new(100);
    /// cache.insert(1, "value".to_string());
    ///
    /// assert_eq!(*cache.get(&1).unwrap(), "value");
    /// assert!(cache.get(&999).is_none());
    /// ```
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.write().get(key)
    }

    /// Looks up a key without touching it. Takes only the read lock, so
    /// concurrent peeks proceed in parallel.
    ///
    /// # Example
    ///
    /// ```
    /// use tiercache::policy::hybrid::HybridCache;
    ///
    /// let cache: HybridCache<u32, i32> = HybridCache::new(2);
    /// cache.insert(1, 10);
    /// cache.insert(2, 20);
    ///
    /// // Peeking does not protect key 1 from eviction.
    /// assert_eq!(*cache.peek(&1).unwrap(), 10);
    /// cache.insert(3, 30);
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.read().peek(key)
    }

    /// Returns `true` if the key is present. Does not touch.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns `true` if the cache is at capacity.
    pub fn is_full(&self) -> bool {
        self.inner.read().is_full()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Removes a key, returning its value if present. A no-op on absent
    /// keys.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.write().remove(key)
    }

    /// Removes several keys under one lock acquisition, so external
    /// observers see the batch as a single step.
    pub fn remove_batch(&self, keys: &[K]) -> Vec<Option<Arc<V>>> {
        self.inner.write().remove_batch(keys)
    }

    /// Removes every entry matching `pred`, returning the number removed.
    ///
    /// The predicate runs under the exclusive lock and must not call back
    /// into this cache; doing so deadlocks.
    ///
    /// # Example
    ///
    /// ```
    /// use tiercache::policy::hybrid::HybridCache;
    ///
    /// let cache: HybridCache<u32, i32> = HybridCache::new(10);
    /// for i in 0..6 {
    ///     cache.insert(i, i as i32);
    /// }
    ///
    /// let removed = cache.remove_where(|_, entry| entry.value() % 2 == 0);
    /// assert_eq!(removed, 3);
    /// assert_eq!(cache.len(), 3);
    /// ```
    pub fn remove_where<F>(&self, pred: F) -> usize
    where
        F: FnMut(&K, &Entry<V>) -> bool,
    {
        self.inner.write().remove_where(pred)
    }

    /// Removes every entry whose last use is older than `max_age`,
    /// returning the number removed.
    pub fn remove_stale(&self, max_age: Duration) -> usize {
        self.inner.write().remove_stale(max_age)
    }

    /// Drops all entries, keeping the capacity.
    pub fn clear(&self) {
        self.inner.write().clear()
    }

    /// Clones of all keys, in unspecified order.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().keys()
    }

    /// Shared handles to all values, in unspecified order.
    pub fn values(&self) -> Vec<Arc<V>> {
        self.inner.read().values()
    }

    /// Point-in-time consistent copy of the entries, tracking metadata
    /// included. Feeding it back through [`bulk_insert`](Self::bulk_insert)
    /// restores the contents.
    pub fn snapshot(&self) -> HashMap<K, Entry<V>> {
        self.inner.read().snapshot()
    }

    /// Point-in-time key → value map, without tracking metadata.
    pub fn to_map(&self) -> HashMap<K, Arc<V>> {
        self.inner.read().to_map()
    }

    /// The eviction victim: least recently and least frequently used.
    /// `None` only on an empty cache.
    ///
    /// # Example
    ///
    /// ```
    /// use tiercache::policy::hybrid::HybridCache;
    ///
    /// let cache: HybridCache<&str, i32> = HybridCache::new(10);
    /// cache.insert("old", 1);
    /// cache.insert("new", 2);
    /// cache.get(&"new");
    ///
    /// let (key, _, uses) = cache.coldest().unwrap();
    /// assert_eq!(key, "old");
    /// assert_eq!(uses, 1);
    /// ```
    pub fn coldest(&self) -> Option<(K, Tick, u64)> {
        self.inner.read().coldest()
    }

    /// The promotion candidate: most recently and most frequently used.
    /// `None` only on an empty cache.
    pub fn hottest(&self) -> Option<(K, Tick, u64)> {
        self.inner.read().hottest()
    }

    /// Changes the capacity. Shrinking returns the displaced coldest
    /// entries, metadata intact, for the caller to move elsewhere.
    ///
    /// # Panics
    ///
    /// Panics if `new_capacity` is zero.
    pub fn resize(&self, new_capacity: usize) -> Vec<(K, Entry<V>)> {
        self.inner.write().resize(new_capacity)
    }

    /// Inserts entries verbatim, preserving their `last_tick` and `uses`,
    /// then evicts coldest entries if the capacity is exceeded.
    pub fn bulk_insert<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, Entry<V>)>,
    {
        self.inner.write().bulk_insert(entries)
    }

    /// Snapshot of the operation counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats()
    }

    pub(crate) fn write_core(&self) -> RwLockWriteGuard<'_, HybridCore<K, V, C>> {
        self.inner.write()
    }

    pub(crate) fn read_core(&self) -> RwLockReadGuard<'_, HybridCore<K, V, C>> {
        self.inner.read()
    }
}

impl<K, V, C> fmt::Debug for HybridCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.read();
        f.debug_struct("HybridCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for HybridCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with a default capacity of 16.
    fn default() -> Self {
        Self::new(16)
    }
}

impl<K, V, C> CoreCache<K, V> for HybridCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        HybridCache::insert(self, key, value)
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        HybridCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        HybridCache::contains(self, key)
    }

    fn len(&self) -> usize {
        HybridCache::len(self)
    }

    fn is_full(&self) -> bool {
        HybridCache::is_full(self)
    }

    fn capacity(&self) -> usize {
        HybridCache::capacity(self)
    }

    fn clear(&self) {
        HybridCache::clear(self)
    }
}

impl<K, V, C> MutableCache<K, V> for HybridCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn remove(&self, key: &K) -> Option<Arc<V>> {
        HybridCache::remove(self, key)
    }

    fn remove_batch(&self, keys: &[K]) -> Vec<Option<Arc<V>>> {
        HybridCache::remove_batch(self, keys)
    }
}

impl<K, V, C> SweepCache<K, V> for HybridCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn remove_where<F>(&self, pred: F) -> usize
    where
        F: FnMut(&K, &Entry<V>) -> bool,
    {
        HybridCache::remove_where(self, pred)
    }

    fn remove_stale(&self, max_age: Duration) -> usize {
        HybridCache::remove_stale(self, max_age)
    }
}

impl<K, V, C> ConcurrentCache for HybridCache<K, V, C>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
    C: Clock,
{
}
