//! Error types for the cache library
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction.
///
/// Cache misses are not errors; reads report them as `None` or
/// [`Lookup::Absent`](crate::cache::Lookup::Absent).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity below 1
    #[error("Invalid capacity: cache requires an integer value greater than or equal to 1, got {0}")]
    InvalidCapacity(usize),

    /// TTL below 1ms or not a whole number of milliseconds
    #[error("Invalid TTL: cache requires a whole number of milliseconds greater than or equal to 1, got {0:?}")]
    InvalidTtl(Duration),

    /// No tokio runtime to schedule sweeps on
    #[error("No tokio runtime available to schedule expiration sweeps")]
    RuntimeUnavailable,
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Validation ==
/// Rejects a capacity below 1.
pub(crate) fn validate_capacity(capacity: usize) -> Result<usize> {
    if capacity < 1 {
        return Err(CacheError::InvalidCapacity(capacity));
    }
    Ok(capacity)
}

/// Rejects a TTL shorter than 1ms or carrying a sub-millisecond remainder.
pub(crate) fn validate_ttl(ttl: Duration) -> Result<Duration> {
    if ttl < Duration::from_millis(1) || ttl.subsec_nanos() % 1_000_000 != 0 {
        return Err(CacheError::InvalidTtl(ttl));
    }
    Ok(ttl)
}
