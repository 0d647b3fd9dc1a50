//! Ephemeral Cache - A small generic key-value cache
//!
//! Provides a capacity-bounded cache that evicts the least-read entry on
//! overflow, and time-bounded variants that also expire entries after a TTL.

pub mod cache;
pub mod config;
pub mod error;
pub mod policy;
pub mod tasks;

pub use cache::{CacheStats, Lookup};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use policy::{
    Cache, DeferredCache, EphemeralCache, SimpleCache, SweepState, TemporaryCache, TypeLabel,
};
