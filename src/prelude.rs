pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::clock::{Clock, MockClock, SystemClock, Tick, TickSource};
pub use crate::entry::Entry;
pub use crate::error::ConfigError;
pub use crate::policy::hybrid::{HybridCache, HybridCore};
pub use crate::policy::parted::{PartedCache, PartedView};
pub use crate::policy::timed::TimedCache;
pub use crate::stats::CacheStats;
pub use crate::traits::{ConcurrentCache, CoreCache, MutableCache, SweepCache};
