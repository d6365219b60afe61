//! Cache variants.
//!
//! - [`hybrid`]: the bounded building block, a map with approximate LRU/LFU
//!   hybrid eviction, as a single-threaded core plus a lock-guarded wrapper.
//! - [`parted`]: two hybrid segments (`active`/`lazy`) with a fill-then-spill
//!   admission protocol for workloads with a stable hot set.
//! - [`timed`]: wraps any sweepable cache with a periodic background reaper.

pub mod hybrid;
pub mod parted;
pub mod timed;
