//! Time source and tick generation for recency tracking.
//!
//! Every cache access stamps the touched entry with a [`Tick`], a totally
//! ordered timestamp. Wall-clock microseconds alone are not enough: two
//! accesses can land in the same microsecond, and eviction decisions need a
//! strict order between them. [`TickSource`] therefore pairs the microsecond
//! reading with a per-source nudge counter that increments for every call
//! that does not observe a later microsecond, and resets when the wall clock
//! moves forward.
//!
//! ```text
//!   wall clock (µs):   1000      1000      1000      1001      1001
//!   tick produced:  (1000,0)  (1000,1)  (1000,2)  (1001,0)  (1001,1)
//! ```
//!
//! Tick ordering, not wall-clock accuracy, is the contract: ticks from one
//! source never decrease, even if the wall clock steps backwards.
//!
//! The underlying time reading is injectable through the [`Clock`] trait so
//! time-dependent behavior can be tested deterministically with
//! [`MockClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Trait for time readings to enable deterministic testing.
///
/// Production code uses [`SystemClock`]; tests use [`MockClock`] to control
/// time progression without real delays.
pub trait Clock: Send + Sync {
    /// Current time in microseconds since the Unix epoch.
    fn micros(&self) -> u64;
}

/// Real system clock for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn micros(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as u64
    }
}

/// Mock clock for deterministic testing.
///
/// Clones share the same underlying reading, so a test can hold one handle
/// while the cache holds another.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tiercache::clock::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// assert_eq!(clock.micros(), 0);
///
/// clock.advance(Duration::from_millis(5));
/// assert_eq!(clock.micros(), 5_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    micros: Arc<AtomicU64>,
}

impl MockClock {
    /// Creates a mock clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        self.advance_micros(duration.as_micros() as u64);
    }

    /// Advances the clock by the given number of microseconds.
    pub fn advance_micros(&self, micros: u64) {
        self.micros.fetch_add(micros, Ordering::Relaxed);
    }

    /// Sets the clock to an absolute microsecond reading.
    pub fn set_micros(&self, micros: u64) {
        self.micros.store(micros, Ordering::Relaxed);
    }
}

impl Clock for MockClock {
    fn micros(&self) -> u64 {
        self.micros.load(Ordering::Relaxed)
    }
}

/// Totally ordered timestamp used for recency comparisons.
///
/// A tick is a `(microseconds, nudge)` pair ordered lexicographically. Two
/// ticks produced by the same [`TickSource`] within one microsecond differ in
/// the nudge component, so the later call always compares greater.
///
/// # Example
///
/// ```
/// use tiercache::clock::{MockClock, TickSource};
///
/// let source = TickSource::new(MockClock::new());
/// let a = source.now();
/// let b = source.now();
/// assert!(b > a);
/// assert_eq!(a.micros(), b.micros());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick {
    micros: u64,
    nudge: u32,
}

impl Tick {
    /// Microseconds-since-epoch component of the tick.
    #[inline]
    pub fn micros(&self) -> u64 {
        self.micros
    }

    /// Intra-microsecond disambiguation counter.
    #[inline]
    pub fn nudge(&self) -> u32 {
        self.nudge
    }
}

/// Calls per microsecond before the source gives up. A caller producing more
/// than this many ticks without the wall clock moving is spinning.
const NUDGE_LIMIT: u32 = 100_000;

#[derive(Debug)]
struct NudgeState {
    last_micros: u64,
    nudge: u32,
}

/// Produces strictly increasing [`Tick`]s from a [`Clock`].
///
/// The nudge state is guarded by a mutex, so one source can be shared by
/// every thread touching a cache. Clones share the same state; a
/// [`PartedCache`](crate::policy::parted::PartedCache) hands one clone to
/// each segment so ticks are totally ordered across the whole partition.
pub struct TickSource<C = SystemClock> {
    clock: C,
    state: Arc<Mutex<NudgeState>>,
}

impl<C: Clock> TickSource<C> {
    /// Creates a tick source reading from the given clock.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(NudgeState {
                last_micros: 0,
                nudge: 0,
            })),
        }
    }

    /// Produces the next tick.
    ///
    /// If the wall clock has advanced past the last observed microsecond, the
    /// new reading is taken and the nudge resets. Otherwise (same
    /// microsecond, or a backwards wall-clock step) the last microsecond is
    /// kept and the nudge increments, so the returned tick still compares
    /// greater than every earlier one from this source.
    ///
    /// # Panics
    ///
    /// Panics after more than 100 000 calls without the wall clock advancing,
    /// which indicates a spinning caller.
    pub fn now(&self) -> Tick {
        let micros = self.clock.micros();
        let mut state = self.state.lock();
        if micros > state.last_micros {
            state.last_micros = micros;
            state.nudge = 0;
        } else {
            state.nudge += 1;
            assert!(
                state.nudge <= NUDGE_LIMIT,
                "tick source exhausted: more than {NUDGE_LIMIT} ticks within one microsecond"
            );
        }
        Tick {
            micros: state.last_micros,
            nudge: state.nudge,
        }
    }
}

impl<C: Clock + Clone> Clone for TickSource<C> {
    /// Clones share the nudge state, preserving the total order across all
    /// handles.
    fn clone(&self) -> Self {
        Self {
            clock: self.clock.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: Clock + std::fmt::Debug> std::fmt::Debug for TickSource<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickSource")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
