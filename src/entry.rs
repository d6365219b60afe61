//! Cached entry with recency and frequency tracking.

use std::sync::Arc;

use crate::clock::Tick;

/// A cached value together with its tracking metadata.
///
/// Values are stored as `Arc<V>` so reads can hand out cheap shared handles
/// without holding the cache lock. The metadata drives eviction decisions:
/// `last_tick` records the most recent successful insert/update/get for the
/// key, `uses` counts them.
///
/// Invariants for any live entry:
///
/// - `uses >= 1` (an entry exists because it was inserted at least once)
/// - `last_tick` never decreases
///
/// Entries are created by the caches; user code only observes them through
/// snapshots and [`remove_where`](crate::policy::hybrid::HybridCache::remove_where)
/// predicates.
#[derive(Debug)]
pub struct Entry<V> {
    value: Arc<V>,
    last_tick: Tick,
    uses: u64,
}

impl<V> Clone for Entry<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            last_tick: self.last_tick,
            uses: self.uses,
        }
    }
}

impl<V> Entry<V> {
    pub(crate) fn new(value: Arc<V>, tick: Tick) -> Self {
        Self {
            value,
            last_tick: tick,
            uses: 1,
        }
    }

    /// Borrows the cached value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns a shared handle to the cached value.
    #[inline]
    pub fn shared_value(&self) -> Arc<V> {
        Arc::clone(&self.value)
    }

    /// Tick of the most recent insert, update or hit for this entry.
    #[inline]
    pub fn last_tick(&self) -> Tick {
        self.last_tick
    }

    /// Number of inserts, updates and hits recorded for this entry.
    #[inline]
    pub fn uses(&self) -> u64 {
        self.uses
    }

    /// Records an access: refreshes `last_tick` and bumps `uses`.
    ///
    /// `last_tick` only moves forward; the counter saturates instead of
    /// wrapping.
    pub(crate) fn touch(&mut self, tick: Tick) {
        if tick > self.last_tick {
            self.last_tick = tick;
        }
        self.uses = self.uses.saturating_add(1);
    }

    /// Replaces the value and touches the entry. Returns the old value.
    pub(crate) fn replace(&mut self, value: Arc<V>, tick: Tick) -> Arc<V> {
        let old = std::mem::replace(&mut self.value, value);
        self.touch(tick);
        old
    }

    pub(crate) fn into_value(self) -> Arc<V> {
        self.value
    }
}
