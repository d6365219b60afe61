//! Time-decay cache wrapper with a background reaper.
//!
//! [`TimedCache`] wraps any [`SweepCache`] with a background thread that
//! periodically bulk-deletes entries, either by a caller-supplied predicate
//! or by the built-in stale-by-age rule (last use older than a configured
//! age).
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────┐
//!   │                    TimedCache<K, V, S>                   │
//!   │                                                          │
//!   │   callers ──► Deref ──► Arc<S> ◄── reaper thread         │
//!   │                           │                              │
//!   │                           │  every `period`:             │
//!   │                           │    remove_where(pred)   or   │
//!   │                           │    remove_stale(max_age)     │
//!   │                                                          │
//!   │   Drop / stop(): flag + notify + join; the reaper is     │
//!   │   gone before the cache state can be freed               │
//!   └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The reaper parks on a condition variable with a timeout rather than
//! sleeping, so cancellation takes effect immediately instead of waiting out
//! the period. Each pass takes the same lock as every other caller and is
//! bounded by the current entry count.

use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::entry::Entry;
use crate::error::ConfigError;
use crate::traits::SweepCache;

/// Handle to the background reaper thread.
///
/// Dropping it flags the thread to stop, wakes it, and joins.
struct Reaper {
    stop: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<JoinHandle<()>>,
}

impl Reaper {
    fn spawn(period: Duration, sweep: Box<dyn Fn() + Send>) -> Self {
        let stop = Arc::new((Mutex::new(false), Condvar::new()));
        let thread_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("tiercache-reaper".into())
            .spawn(move || {
                let (flag, signal) = &*thread_stop;
                loop {
                    let mut stopped = flag.lock();
                    if *stopped {
                        break;
                    }
                    signal.wait_for(&mut stopped, period);
                    if *stopped {
                        break;
                    }
                    drop(stopped);
                    sweep();
                }
            })
            .expect("failed to spawn reaper thread");
        Self {
            stop,
            handle: Some(handle),
        }
    }

    fn shutdown(&mut self) {
        let (flag, signal) = &*self.stop;
        *flag.lock() = true;
        signal.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cache wrapper that reaps entries on a schedule.
///
/// Derefs to the wrapped cache, so the full cache API stays available:
///
/// ```
/// use std::time::Duration;
/// use tiercache::policy::hybrid::HybridCache;
/// use tiercache::policy::timed::TimedCache;
///
/// let cache = TimedCache::with_max_age(
///     HybridCache::<u32, String>::new(100),
///     Duration::from_millis(50),
///     Duration::from_secs(300),
/// );
///
/// cache.insert(1, "session".to_string());
/// assert!(cache.contains(&1));
/// // The reaper stops when `cache` is dropped.
/// ```
pub struct TimedCache<K, V, S>
where
    S: SweepCache<K, V> + Send + Sync + 'static,
{
    inner: Arc<S>,
    reaper: Reaper,
    _marker: PhantomData<fn(K, V)>,
}

impl<K, V, S> TimedCache<K, V, S>
where
    S: SweepCache<K, V> + Send + Sync + 'static,
{
    /// Wraps `inner`, applying `pred` as a bulk-delete every `period`.
    ///
    /// The predicate sees each key and its entry under the cache's
    /// exclusive lock; it must be pure and must not call back into the
    /// cache.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn with_predicate<P>(inner: S, period: Duration, pred: P) -> Self
    where
        P: Fn(&K, &Entry<V>) -> bool + Send + Sync + 'static,
    {
        Self::try_with_predicate(inner, period, pred).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Fallible form of [`with_predicate`](Self::with_predicate).
    pub fn try_with_predicate<P>(
        inner: S,
        period: Duration,
        pred: P,
    ) -> Result<Self, ConfigError>
    where
        P: Fn(&K, &Entry<V>) -> bool + Send + Sync + 'static,
    {
        if period.is_zero() {
            return Err(ConfigError::new("check period must be greater than zero"));
        }
        let inner = Arc::new(inner);
        let sweeper = Arc::clone(&inner);
        let reaper = Reaper::spawn(
            period,
            Box::new(move || {
                sweeper.remove_where(|k, e| pred(k, e));
            }),
        );
        Ok(Self {
            inner,
            reaper,
            _marker: PhantomData,
        })
    }

    /// Wraps `inner`, removing entries whose last use is older than
    /// `max_age`, checked every `period`.
    ///
    /// # Panics
    ///
    /// Panics if `period` or `max_age` is zero.
    pub fn with_max_age(inner: S, period: Duration, max_age: Duration) -> Self {
        Self::try_with_max_age(inner, period, max_age).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Fallible form of [`with_max_age`](Self::with_max_age).
    pub fn try_with_max_age(
        inner: S,
        period: Duration,
        max_age: Duration,
    ) -> Result<Self, ConfigError> {
        if period.is_zero() {
            return Err(ConfigError::new("check period must be greater than zero"));
        }
        if max_age.is_zero() {
            return Err(ConfigError::new("max age must be greater than zero"));
        }
        let inner = Arc::new(inner);
        let sweeper = Arc::clone(&inner);
        let reaper = Reaper::spawn(
            period,
            Box::new(move || {
                sweeper.remove_stale(max_age);
            }),
        );
        Ok(Self {
            inner,
            reaper,
            _marker: PhantomData,
        })
    }

    /// The wrapped cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Stops the reaper (joining its thread) and hands the wrapped cache
    /// back.
    pub fn stop(self) -> Arc<S> {
        let TimedCache {
            inner, mut reaper, ..
        } = self;
        reaper.shutdown();
        inner
    }
}

impl<K, V, S> Deref for TimedCache<K, V, S>
where
    S: SweepCache<K, V> + Send + Sync + 'static,
{
    type Target = S;

    fn deref(&self) -> &S {
        &self.inner
    }
}

impl<K, V, S> std::fmt::Debug for TimedCache<K, V, S>
where
    S: SweepCache<K, V> + Send + Sync + 'static + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache")
            .field("inner", &*self.inner)
            .finish_non_exhaustive()
    }
}
