//! Configuration Module
//!
//! Construction parameters shared by every cache policy.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{validate_capacity, validate_ttl, CacheError, Result};
use crate::policy::TypeLabel;

/// Cache construction parameters.
///
/// Deserializable so a host application can embed it in its own config file.
/// Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Time to live in milliseconds (ignored by `SimpleCache`)
    pub ttl_ms: u64,
    /// Optional display label for the key and value types
    pub label: Option<TypeLabel>,
}

impl CacheConfig {
    /// Creates a config with the given capacity and TTL and no label.
    ///
    /// # Errors
    /// `CacheError::InvalidTtl` when `ttl` is under 1 ms or not a whole
    /// number of milliseconds. Capacity is checked by [`validate`](Self::validate).
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        let ttl = validate_ttl(ttl)?;
        let ttl_ms = u64::try_from(ttl.as_millis()).map_err(|_| CacheError::InvalidTtl(ttl))?;

        Ok(Self {
            capacity,
            ttl_ms,
            label: None,
        })
    }

    pub fn with_label(mut self, label: TypeLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Checks capacity and TTL the same way the cache constructors do.
    pub fn validate(&self) -> Result<()> {
        validate_capacity(self.capacity)?;
        validate_ttl(self.ttl())?;
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl_ms: 300_000,
            label: None,
        }
    }
}
