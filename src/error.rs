//! Error types for the tiercache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (zero capacity, out-of-range split rate, zero reaper period or age).
//!
//! ## Example Usage
//!
//! ```
//! use tiercache::error::ConfigError;
//! use tiercache::policy::parted::PartedCache;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache: Result<PartedCache<String, i32>, ConfigError> =
//!     PartedCache::try_new(100, 0.2);
//! assert!(cache.is_ok());
//!
//! // Invalid rate is caught without panicking
//! let bad = PartedCache::<String, i32>::try_new(100, 1.5);
//! assert!(bad.is_err());
//! ```

use std::fmt;

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`HybridCache::try_new`](crate::policy::hybrid::HybridCache::try_new),
/// [`PartedCache::try_new`](crate::policy::parted::PartedCache::try_new) and
/// [`TimedCache::try_with_max_age`](crate::policy::timed::TimedCache::try_with_max_age).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use tiercache::policy::hybrid::HybridCache;
///
/// let err = HybridCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_message() {
        let err = ConfigError::new("capacity must be greater than zero");
        assert_eq!(err.to_string(), "capacity must be greater than zero");
    }

    #[test]
    fn debug_includes_message() {
        let err = ConfigError::new("bad rate");
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("bad rate"));
    }

    #[test]
    fn message_accessor() {
        let err = ConfigError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }
}
