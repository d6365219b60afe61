//! Two-segment (active/lazy) partitioned cache.
//!
//! Workloads with a stable hot set suffer under a single bounded map: one
//! scan over a larger warm set flushes the keys that were actually earning
//! their place. The partitioned cache dedicates a small `active` segment
//! that receives all new writes and churns rapidly, and a larger `lazy`
//! segment that accumulates items promoted out of `active` after they proved
//! themselves there. Reads prefer `lazy`, where the stable hot set settles.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                       PartedCache<K, V, C>                         │
//! │                                                                    │
//! │   writes ──────────────┐                 reads ───────────┐        │
//! │                        ▼                                  ▼        │
//! │   ┌────────────────────────────┐      ┌─────────────────────────┐  │
//! │   │      ACTIVE (small)        │      │      LAZY (large)       │  │
//! │   │  all new keys land here    │      │  promoted keys settle   │  │
//! │   │  high churn                │      │  here; queried first    │  │
//! │   └─────────────┬──────────────┘      └────────────┬────────────┘  │
//! │                 │   promote hottest                ▲               │
//! │                 └──────────────────────────────────┘               │
//! │                                                                    │
//! │        shared TickSource: ticks totally ordered across both        │
//! └────────────────────────────────────────────────────────────────────┘
//!
//! Admission (insert of key k, value v)
//! ────────────────────────────────────
//!
//!   1. k in lazy            → update in place there
//!   2. active has room      → insert into active
//!   3. lazy has room        → move active's hottest into lazy,
//!                             then insert into active
//!   4. both full            → if lazy's coldest loses the FIFO-inclusive
//!                             comparison against active's hottest, evict
//!                             it and move the hottest over; otherwise
//!                             active evicts its own coldest. Either way
//!                             the new key lands in active.
//! ```
//!
//! The FIFO-inclusive comparison (`<=` on ticks OR `<=` on uses) resolves
//! ties toward eviction/promotion so the protocol always makes progress.
//! Cross-segment moves carry the entry verbatim: `last_tick` and `uses`
//! survive, so an item's hotness follows it between segments.
//!
//! ## Locking
//!
//! Every cross-segment operation takes both segment write locks, always
//! active before lazy. That keeps the no-duplicate-key invariant atomic and
//! rules out lock-order deadlock.
//!
//! ## Example Usage
//!
//! ```
//! use tiercache::policy::parted::PartedCache;
//!
//! // 10 slots: 8 active, 2 lazy.
//! let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.8);
//!
//! for i in 0..10 {
//!     cache.insert(i, i);
//! }
//! assert_eq!(cache.len(), 10);
//!
//! // The earliest writes were promoted to the lazy segment and survive
//! // further churn in active.
//! let (active_len, lazy_len) = cache.segment_lens();
//! assert_eq!(active_len, 8);
//! assert_eq!(lazy_len, 2);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock, TickSource};
use crate::entry::Entry;
use crate::error::ConfigError;
use crate::policy::hybrid::{HybridCache, HybridCore};
use crate::stats::CacheStats;
use crate::traits::{ConcurrentCache, CoreCache, MutableCache, SweepCache};

/// Per-segment view of keys or values, as returned by
/// [`PartedCache::parted_keys`] and [`PartedCache::parted_values`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartedView<T> {
    /// Contents of the active segment.
    pub active: T,
    /// Contents of the lazy segment.
    pub lazy: T,
}

/// Splits a total capacity by the active rate, keeping both segments
/// non-empty.
fn split_capacity(total: usize, rate: f64) -> (usize, usize) {
    let active = ((total as f64 * rate).round() as usize).clamp(1, total - 1);
    (active, total - active)
}

fn check_rate(rate: f64) -> Result<(), ConfigError> {
    if rate > 0.0 && rate < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::new("active rate must be in (0, 1)"))
    }
}

/// Two-segment partitioned cache.
///
/// Composes two [`HybridCache`] segments sharing one tick source. See the
/// [module docs](self) for the admission and promotion protocol.
///
/// # Example
///
/// ```
/// use tiercache::policy::parted::PartedCache;
///
/// let cache: PartedCache<&str, i32> = PartedCache::new(10, 0.5);
/// cache.insert("key", 1);
/// assert_eq!(*cache.get(&"key").unwrap(), 1);
/// ```
pub struct PartedCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    active: HybridCache<K, V, C>,
    lazy: HybridCache<K, V, C>,
    capacity: usize,
    rate: Mutex<f64>,
}

impl<K, V> PartedCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    /// Creates a partitioned cache with `capacity` total slots, an
    /// `active_rate` fraction of them in the active segment.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2` or `active_rate` is outside `(0, 1)`.
    ///
    /// # Example
    ///
    /// ```
    /// use tiercache::policy::parted::PartedCache;
    ///
    /// let cache: PartedCache<u32, i32> = PartedCache::new(10, 0.8);
    /// assert_eq!(cache.capacity(), 10);
    /// assert_eq!(cache.segment_capacities(), (8, 2));
    /// ```
    pub fn new(capacity: usize, active_rate: f64) -> Self {
        Self::with_clock(capacity, active_rate, SystemClock)
    }

    /// Fallible form of [`new`](Self::new).
    pub fn try_new(capacity: usize, active_rate: f64) -> Result<Self, ConfigError> {
        Self::try_with_clock(capacity, active_rate, SystemClock)
    }
}

impl<K, V, C> PartedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock + Clone,
{
    /// Creates a partitioned cache with a custom clock.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2` or `active_rate` is outside `(0, 1)`.
    pub fn with_clock(capacity: usize, active_rate: f64, clock: C) -> Self {
        Self::try_with_clock(capacity, active_rate, clock).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Fallible form of [`with_clock`](Self::with_clock).
    pub fn try_with_clock(
        capacity: usize,
        active_rate: f64,
        clock: C,
    ) -> Result<Self, ConfigError> {
        check_rate(active_rate)?;
        if capacity < 2 {
            return Err(ConfigError::new(
                "capacity must be at least 2 to split across segments",
            ));
        }
        let (active_cap, lazy_cap) = split_capacity(capacity, active_rate);
        let ticks = TickSource::new(clock);
        Ok(Self {
            active: HybridCache::try_with_ticks(active_cap, ticks.clone())?,
            lazy: HybridCache::try_with_ticks(lazy_cap, ticks)?,
            capacity,
            rate: Mutex::new(active_rate),
        })
    }
}

impl<K, V, C> PartedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// Inserts a value, wrapping it in `Arc<V>` internally.
    ///
    /// Follows the admission protocol in the [module docs](self): updates
    /// find their key wherever it lives; new keys always land in the active
    /// segment, spilling the active hottest into lazy when needed. Returns
    /// the previous value if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        self.insert_arc(key, Arc::new(value))
    }

    /// Inserts an `Arc<V>` directly (zero-copy if already shared).
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let mut active = self.active.write_core();
        let mut lazy = self.lazy.write_core();

        let replaced = Self::admit(&mut active, &mut lazy, key, value);

        #[cfg(debug_assertions)]
        Self::validate_invariants(&active, &lazy, self.capacity);

        replaced
    }

    fn admit(
        active: &mut HybridCore<K, V, C>,
        lazy: &mut HybridCore<K, V, C>,
        key: K,
        value: Arc<V>,
    ) -> Option<Arc<V>> {
        // Update path: a key resident in lazy is refreshed in place. The
        // membership probe must not touch the entry, so no `get` here.
        if lazy.contains(&key) {
            return lazy.insert(key, value);
        }

        if !active.is_full() {
            return active.insert(key, value);
        }

        // Active is full; its hottest entry is the promotion candidate.
        let (hot_key, hot_tick, hot_uses) = match active.hottest() {
            Some(hot) => hot,
            None => return active.insert(key, value),
        };

        if !lazy.is_full() {
            if let Some(entry) = active.take_entry(&hot_key) {
                lazy.put_entry(hot_key, entry);
            }
            return active.insert(key, value);
        }

        // Both full: the lazy coldest must defend its slot against the
        // active hottest. Ties go to eviction so the protocol cannot stall.
        if let Some((cold_key, cold_tick, cold_uses)) = lazy.coldest() {
            if cold_tick <= hot_tick || cold_uses <= hot_uses {
                lazy.evict_key(&cold_key);
                if let Some(entry) = active.take_entry(&hot_key) {
                    lazy.put_entry(hot_key, entry);
                }
            }
        }

        // Either the hottest moved out (room exists) or active evicts its
        // own coldest on the way in.
        active.insert(key, value)
    }

    /// Looks up a key, preferring the lazy segment.
    ///
    /// A lazy hit touches the entry and returns. An active hit additionally
    /// runs the promotion check: if the lazy coldest loses the
    /// FIFO-inclusive comparison against the active hottest, it is evicted
    /// and the hottest moves into lazy.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut active = self.active.write_core();
        let mut lazy = self.lazy.write_core();

        if let Some(value) = lazy.get(key) {
            return Some(value);
        }

        let value = active.get(key)?;

        if let (Some((hot_key, hot_tick, hot_uses)), Some((cold_key, cold_tick, cold_uses))) =
            (active.hottest(), lazy.coldest())
        {
            if cold_tick <= hot_tick || cold_uses <= hot_uses {
                lazy.evict_key(&cold_key);
                if let Some(entry) = active.take_entry(&hot_key) {
                    lazy.put_entry(hot_key, entry);
                }
            }
        }

        #[cfg(debug_assertions)]
        Self::validate_invariants(&active, &lazy, self.capacity);

        Some(value)
    }

    /// Looks up a key without touching it, in either segment.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        lazy.peek(key).or_else(|| active.peek(key))
    }

    /// Returns `true` if the key is present in either segment.
    pub fn contains(&self, key: &K) -> bool {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        lazy.contains(key) || active.contains(key)
    }

    /// Removes a key from whichever segment holds it.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let mut active = self.active.write_core();
        let mut lazy = self.lazy.write_core();
        let from_active = active.remove(key);
        let from_lazy = lazy.remove(key);
        from_active.or(from_lazy)
    }

    /// Removes several keys under one lock acquisition per segment.
    pub fn remove_batch(&self, keys: &[K]) -> Vec<Option<Arc<V>>> {
        let mut active = self.active.write_core();
        let mut lazy = self.lazy.write_core();
        keys.iter()
            .map(|k| {
                let from_active = active.remove(k);
                let from_lazy = lazy.remove(k);
                from_active.or(from_lazy)
            })
            .collect()
    }

    /// Removes every entry matching `pred` across both segments.
    ///
    /// The predicate runs under both exclusive locks and must not call back
    /// into the cache.
    pub fn remove_where<F>(&self, mut pred: F) -> usize
    where
        F: FnMut(&K, &Entry<V>) -> bool,
    {
        let mut active = self.active.write_core();
        let mut lazy = self.lazy.write_core();
        active.remove_where(|k, e| pred(k, e)) + lazy.remove_where(|k, e| pred(k, e))
    }

    /// Removes every entry whose last use is older than `max_age`, across
    /// both segments.
    pub fn remove_stale(&self, max_age: Duration) -> usize {
        let mut active = self.active.write_core();
        let mut lazy = self.lazy.write_core();
        active.remove_stale(max_age) + lazy.remove_stale(max_age)
    }

    /// Removes a key only if it lives in the lazy segment.
    pub fn remove_lazy(&self, key: &K) -> Option<Arc<V>> {
        self.lazy.remove(key)
    }

    /// Removes several keys from the lazy segment only.
    pub fn remove_lazy_batch(&self, keys: &[K]) -> Vec<Option<Arc<V>>> {
        self.lazy.remove_batch(keys)
    }

    /// Drops all entries from both segments, keeping the capacities.
    pub fn clear(&self) {
        let mut active = self.active.write_core();
        let mut lazy = self.lazy.write_core();
        active.clear();
        lazy.clear();
    }

    /// Total number of entries across both segments.
    pub fn len(&self) -> usize {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        active.len() + lazy.len()
    }

    /// Returns `true` if both segments are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if both segments are at capacity.
    pub fn is_full(&self) -> bool {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        active.is_full() && lazy.is_full()
    }

    /// Total capacity across both segments.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current `(active, lazy)` segment capacities.
    pub fn segment_capacities(&self) -> (usize, usize) {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        (active.capacity(), lazy.capacity())
    }

    /// Current `(active, lazy)` entry counts.
    pub fn segment_lens(&self) -> (usize, usize) {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        (active.len(), lazy.len())
    }

    /// Current fraction of the capacity assigned to the active segment.
    pub fn active_rate(&self) -> f64 {
        *self.rate.lock()
    }

    /// Clones of all keys across both segments, in unspecified order.
    pub fn keys(&self) -> Vec<K> {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        let mut keys = active.keys();
        keys.extend(lazy.keys());
        keys
    }

    /// Shared handles to all values across both segments.
    pub fn values(&self) -> Vec<Arc<V>> {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        let mut values = active.values();
        values.extend(lazy.values());
        values
    }

    /// Keys split by segment.
    pub fn parted_keys(&self) -> PartedView<Vec<K>> {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        PartedView {
            active: active.keys(),
            lazy: lazy.keys(),
        }
    }

    /// Values split by segment.
    pub fn parted_values(&self) -> PartedView<Vec<Arc<V>>> {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        PartedView {
            active: active.values(),
            lazy: lazy.values(),
        }
    }

    /// Point-in-time copy of all entries across both segments, tracking
    /// metadata included.
    pub fn snapshot(&self) -> HashMap<K, Entry<V>> {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        let mut map = active.snapshot();
        map.extend(lazy.snapshot());
        map
    }

    /// Point-in-time key → value map across both segments.
    pub fn to_map(&self) -> HashMap<K, Arc<V>> {
        let active = self.active.read_core();
        let lazy = self.lazy.read_core();
        let mut map = active.to_map();
        map.extend(lazy.to_map());
        map
    }

    /// Operation counters of the active segment.
    pub fn active_stats(&self) -> CacheStats {
        self.active.stats()
    }

    /// Operation counters of the lazy segment.
    pub fn lazy_stats(&self) -> CacheStats {
        self.lazy.stats()
    }

    /// Shifts the capacity split halfway toward `new_rate`.
    ///
    /// The adjustment is damped to avoid oscillation when callers react to
    /// hit-rate feedback. The growing segment is resized first; the entries
    /// displaced by shrinking the other side are moved over with their
    /// tracking metadata intact, so relative hotness survives the move.
    /// Returns `true` if the split actually changed.
    ///
    /// # Panics
    ///
    /// Panics if `new_rate` is outside `(0, 1)`.
    ///
    /// # Example
    ///
    /// ```
    /// use tiercache::policy::parted::PartedCache;
    ///
    /// let cache: PartedCache<u32, i32> = PartedCache::new(10, 0.5);
    /// assert!(cache.adjust_rate(0.8));
    /// // Halfway from 0.5 toward 0.8:
    /// assert_eq!(cache.segment_capacities(), (7, 3));
    /// ```
    pub fn adjust_rate(&self, new_rate: f64) -> bool {
        check_rate(new_rate).unwrap_or_else(|e| panic!("{e}"));

        let mut rate = self.rate.lock();
        let damped = *rate - (*rate - new_rate) / 2.0;
        let (active_cap, lazy_cap) = split_capacity(self.capacity, damped);

        let mut active = self.active.write_core();
        let mut lazy = self.lazy.write_core();

        if active_cap == active.capacity() {
            return false;
        }

        if active_cap > active.capacity() {
            active.resize(active_cap);
            let overflow = lazy.resize(lazy_cap);
            active.bulk_insert(overflow);
        } else {
            lazy.resize(lazy_cap);
            let overflow = active.resize(active_cap);
            lazy.bulk_insert(overflow);
        }

        #[cfg(debug_assertions)]
        Self::validate_invariants(&active, &lazy, self.capacity);

        *rate = damped;
        true
    }

    #[cfg(debug_assertions)]
    fn validate_invariants(
        active: &HybridCore<K, V, C>,
        lazy: &HybridCore<K, V, C>,
        capacity: usize,
    ) {
        debug_assert!(active.len() <= active.capacity(), "active over capacity");
        debug_assert!(lazy.len() <= lazy.capacity(), "lazy over capacity");
        debug_assert_eq!(
            active.capacity() + lazy.capacity(),
            capacity,
            "segment capacities must sum to the total"
        );
        for key in active.keys() {
            debug_assert!(
                !lazy.contains(&key),
                "key present in both segments after an operation"
            );
        }
    }
}

impl<K, V, C> fmt::Debug for PartedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (active_len, lazy_len) = self.segment_lens();
        f.debug_struct("PartedCache")
            .field("capacity", &self.capacity)
            .field("active_len", &active_len)
            .field("lazy_len", &lazy_len)
            .finish_non_exhaustive()
    }
}

impl<K, V, C> CoreCache<K, V> for PartedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        PartedCache::insert(self, key, value)
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        PartedCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        PartedCache::contains(self, key)
    }

    fn len(&self) -> usize {
        PartedCache::len(self)
    }

    fn is_full(&self) -> bool {
        PartedCache::is_full(self)
    }

    fn capacity(&self) -> usize {
        PartedCache::capacity(self)
    }

    fn clear(&self) {
        PartedCache::clear(self)
    }
}

impl<K, V, C> MutableCache<K, V> for PartedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn remove(&self, key: &K) -> Option<Arc<V>> {
        PartedCache::remove(self, key)
    }

    fn remove_batch(&self, keys: &[K]) -> Vec<Option<Arc<V>>> {
        PartedCache::remove_batch(self, keys)
    }
}

impl<K, V, C> SweepCache<K, V> for PartedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn remove_where<F>(&self, pred: F) -> usize
    where
        F: FnMut(&K, &Entry<V>) -> bool,
    {
        PartedCache::remove_where(self, pred)
    }

    fn remove_stale(&self, max_age: Duration) -> usize {
        PartedCache::remove_stale(self, max_age)
    }
}

impl<K, V, C> ConcurrentCache for PartedCache<K, V, C>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
    C: Clock,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_no_duplicate_keys<K, V, C>(cache: &PartedCache<K, V, C>)
    where
        K: Eq + Hash + Clone,
        C: Clock,
    {
        let view = cache.parted_keys();
        for key in &view.active {
            assert!(
                !view.lazy.contains(key),
                "a key must live in at most one segment"
            );
        }
    }

    // ==============================================
    // Construction
    // ==============================================

    mod construction {
        use super::*;

        #[test]
        fn splits_capacity_by_rate() {
            let cache: PartedCache<u32, i32> = PartedCache::new(10, 0.8);
            assert_eq!(cache.capacity(), 10);
            assert_eq!(cache.segment_capacities(), (8, 2));
            assert_eq!(cache.active_rate(), 0.8);
        }

        #[test]
        fn both_segments_are_at_least_one() {
            let cache: PartedCache<u32, i32> = PartedCache::new(2, 0.9);
            assert_eq!(cache.segment_capacities(), (1, 1));
        }

        #[test]
        fn rejects_out_of_range_rates() {
            assert!(PartedCache::<u32, i32>::try_new(10, 0.0).is_err());
            assert!(PartedCache::<u32, i32>::try_new(10, 1.0).is_err());
            assert!(PartedCache::<u32, i32>::try_new(10, 1.5).is_err());
            assert!(PartedCache::<u32, i32>::try_new(10, -0.2).is_err());
        }

        #[test]
        fn rejects_too_small_capacity() {
            assert!(PartedCache::<u32, i32>::try_new(0, 0.5).is_err());
            assert!(PartedCache::<u32, i32>::try_new(1, 0.5).is_err());
            assert!(PartedCache::<u32, i32>::try_new(2, 0.5).is_ok());
        }

        #[test]
        #[should_panic(expected = "active rate must be in (0, 1)")]
        fn new_panics_on_bad_rate() {
            let _ = PartedCache::<u32, i32>::new(10, 2.0);
        }
    }

    // ==============================================
    // Admission Protocol
    // ==============================================

    mod admission {
        use super::*;

        #[test]
        fn new_keys_fill_active_first() {
            let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.5);

            for i in 0..5 {
                cache.insert(i, i);
                assert_eq!(cache.segment_lens(), ((i + 1) as usize, 0));
            }
        }

        #[test]
        fn spill_promotes_active_hottest_into_lazy() {
            // active=2, lazy=2
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 1);
            cache.insert(2, 2);

            // Active full, lazy empty: the most recent write (2) moves over.
            cache.insert(3, 3);

            let view = cache.parted_keys();
            assert_eq!(view.lazy, vec![2]);
            assert_eq!(cache.segment_lens(), (2, 1));
            assert_no_duplicate_keys(&cache);
        }

        #[test]
        fn update_of_lazy_key_stays_in_lazy() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3); // promotes 2 into lazy

            let old = cache.insert(2, 200);

            assert_eq!(*old.unwrap(), 2);
            assert_eq!(*cache.peek(&2).unwrap(), 200);
            let view = cache.parted_keys();
            assert_eq!(view.lazy, vec![2]);
            assert_eq!(cache.len(), 3);
        }

        #[test]
        fn update_of_active_key_with_room_never_moves() {
            let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.5);
            cache.insert(1, 1);
            cache.insert(2, 2);

            let old = cache.insert(1, 100);

            assert_eq!(*old.unwrap(), 1);
            assert_eq!(cache.segment_lens(), (2, 0));
        }

        #[test]
        fn both_full_swap_when_lazy_coldest_loses() {
            // active=2, lazy=2; all single-use entries, so the lazy coldest
            // is strictly older than the active hottest and loses.
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3); // lazy: {2}
            cache.insert(4, 4); // lazy: {2, 3}, active: {1, 4}
            assert!(cache.is_full());

            cache.insert(5, 5);

            // Lazy coldest (2) was evicted, active hottest (4) promoted.
            assert!(!cache.contains(&2));
            assert!(cache.contains(&4));
            assert!(cache.contains(&5));
            assert_eq!(cache.len(), 4);
            assert_no_duplicate_keys(&cache);
        }

        #[test]
        fn both_full_keeps_lazy_when_it_defends_its_slot() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3); // lazy: {2}
            cache.insert(4, 4); // lazy: {2, 3}, active: {1, 4}

            // Make both lazy entries strictly newer and more used than
            // anything in active.
            cache.get(&2);
            cache.get(&3);

            cache.insert(5, 5);

            // Lazy untouched; active evicted its own coldest (1).
            assert!(cache.contains(&2));
            assert!(cache.contains(&3));
            assert!(!cache.contains(&1));
            assert!(cache.contains(&5));
            assert_eq!(cache.len(), 4);
            assert_no_duplicate_keys(&cache);
        }

        #[test]
        fn len_never_exceeds_capacity_under_churn() {
            let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.3);
            for i in 0..100 {
                cache.insert(i, i);
                assert!(cache.len() <= cache.capacity());
            }
            assert_no_duplicate_keys(&cache);
        }
    }

    // ==============================================
    // Read Protocol
    // ==============================================

    mod reads {
        use super::*;

        #[test]
        fn lazy_hit_returns_without_promotion() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3); // lazy: {2}

            let before = cache.parted_keys();
            assert_eq!(*cache.get(&2).unwrap(), 2);
            let after = cache.parted_keys();

            assert_eq!(before.lazy, after.lazy);
        }

        #[test]
        fn active_hit_can_promote_the_hottest() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3); // lazy: {2}
            cache.insert(4, 4); // lazy: {2, 3}, active: {1, 4}

            // Touching 1 makes it the active hottest; the lazy coldest (2)
            // loses the FIFO-inclusive comparison and gives up its slot.
            assert_eq!(*cache.get(&1).unwrap(), 1);

            let view = cache.parted_keys();
            assert!(view.lazy.contains(&1));
            assert!(!cache.contains(&2));
            assert_no_duplicate_keys(&cache);
        }

        #[test]
        fn miss_returns_none() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 1);
            assert!(cache.get(&99).is_none());
        }

        #[test]
        fn hot_set_survives_active_churn() {
            // capacity 10, active=8, lazy=2: fill with 10 keys, then churn
            // the low indexes through active again. The first promoted keys
            // (8 and 9's predecessors) sit in lazy and survive.
            let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.8);
            for i in 0..10 {
                cache.insert(i, i);
            }
            for i in 0..8 {
                cache.insert(i, i + 100);
            }

            assert_eq!(*cache.get(&8).unwrap(), 8);
            assert_eq!(*cache.get(&9).unwrap(), 9);
        }
    }

    // ==============================================
    // Whole-Cache Operations
    // ==============================================

    mod whole_cache {
        use super::*;
        use crate::clock::MockClock;
        use std::time::Duration;

        #[test]
        fn remove_reaches_both_segments() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3); // lazy: {2}

            assert_eq!(*cache.remove(&2).unwrap(), 2); // lazy resident
            assert_eq!(*cache.remove(&1).unwrap(), 1); // active resident
            assert!(cache.remove(&1).is_none());
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn remove_batch_spans_segments() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            for i in 1..=4 {
                cache.insert(i, i);
            }

            let removed = cache.remove_batch(&[1, 2, 99]);
            assert!(removed[0].is_some());
            assert!(removed[1].is_some());
            assert!(removed[2].is_none());
        }

        #[test]
        fn remove_lazy_ignores_active_residents() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3); // lazy: {2}

            assert!(cache.remove_lazy(&1).is_none());
            assert!(cache.contains(&1));
            assert_eq!(*cache.remove_lazy(&2).unwrap(), 2);
        }

        #[test]
        fn remove_where_spans_segments() {
            let cache: PartedCache<u32, u32> = PartedCache::new(6, 0.5);
            for i in 0..6 {
                cache.insert(i, i);
            }

            let removed = cache.remove_where(|k, _| k % 2 == 0);

            assert_eq!(removed, 3);
            assert_eq!(cache.len(), 3);
        }

        #[test]
        fn remove_stale_spans_segments() {
            let clock = MockClock::new();
            let cache: PartedCache<u32, u32, MockClock> =
                PartedCache::with_clock(4, 0.5, clock.clone());
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3); // lazy: {2}

            clock.advance(Duration::from_secs(10));
            cache.insert(4, 4);

            let removed = cache.remove_stale(Duration::from_secs(5));

            assert_eq!(removed, 3);
            assert!(cache.contains(&4));
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn clear_empties_both_segments() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            for i in 0..4 {
                cache.insert(i, i);
            }

            cache.clear();
            cache.clear();

            assert!(cache.is_empty());
            assert_eq!(cache.capacity(), 4);
        }

        #[test]
        fn keys_values_and_maps_span_segments() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(3, 30); // lazy: {2}

            let mut keys = cache.keys();
            keys.sort_unstable();
            assert_eq!(keys, vec![1, 2, 3]);

            assert_eq!(cache.values().len(), 3);

            let map = cache.to_map();
            assert_eq!(*map[&2], 20);

            let snapshot = cache.snapshot();
            assert_eq!(snapshot.len(), 3);
            assert_eq!(snapshot[&1].uses(), 1);
        }

        #[test]
        fn segment_stats_are_separate() {
            let cache: PartedCache<u32, u32> = PartedCache::new(4, 0.5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3); // lazy: {2}

            cache.get(&2); // lazy hit
            cache.get(&1); // active hit (after lazy miss)

            assert_eq!(cache.lazy_stats().hits, 1);
            assert_eq!(cache.active_stats().hits, 1);
        }
    }

    // ==============================================
    // Rebalance
    // ==============================================

    mod rebalance {
        use super::*;

        #[test]
        fn adjustment_is_damped() {
            let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.5);

            assert!(cache.adjust_rate(0.8));

            // Halfway from 0.5 toward 0.8 is 0.65.
            assert!((cache.active_rate() - 0.65).abs() < 1e-9);
            assert_eq!(cache.segment_capacities(), (7, 3));
        }

        #[test]
        fn unchanged_split_returns_false() {
            let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.5);
            assert!(!cache.adjust_rate(0.5));
            assert_eq!(cache.active_rate(), 0.5);
        }

        #[test]
        fn growing_active_absorbs_lazy_overflow() {
            let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.5);
            for i in 0..10 {
                cache.insert(i, i);
            }
            assert_eq!(cache.len(), 10);

            assert!(cache.adjust_rate(0.8));

            // No entry is lost: the shrinking lazy side's overflow moved
            // into the grown active side.
            assert_eq!(cache.len(), 10);
            for i in 0..10 {
                assert!(cache.contains(&i), "key {} lost in rebalance", i);
            }
            assert_no_duplicate_keys(&cache);
        }

        #[test]
        fn shrinking_active_spills_into_lazy() {
            let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.8);
            for i in 0..10 {
                cache.insert(i, i);
            }

            assert!(cache.adjust_rate(0.2));

            assert_eq!(cache.segment_capacities(), (5, 5));
            assert_eq!(cache.len(), 10);
            for i in 0..10 {
                assert!(cache.contains(&i), "key {} lost in rebalance", i);
            }
            assert_no_duplicate_keys(&cache);
        }

        #[test]
        fn moved_entries_keep_their_metadata() {
            let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.5);
            for i in 0..10 {
                cache.insert(i, i);
            }
            cache.get(&0);
            cache.get(&0);
            let uses_before = cache.snapshot()[&0].uses();

            cache.adjust_rate(0.8);

            assert_eq!(cache.snapshot()[&0].uses(), uses_before);
        }

        #[test]
        fn repeated_adjustments_converge() {
            let cache: PartedCache<u32, u32> = PartedCache::new(100, 0.5);
            for _ in 0..10 {
                cache.adjust_rate(0.9);
            }
            let rate = cache.active_rate();
            assert!(rate > 0.85 && rate < 0.9);
        }

        #[test]
        #[should_panic(expected = "active rate must be in (0, 1)")]
        fn out_of_range_rate_panics() {
            let cache: PartedCache<u32, u32> = PartedCache::new(10, 0.5);
            cache.adjust_rate(1.2);
        }
    }
}
