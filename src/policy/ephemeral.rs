//! Ephemeral Cache
//!
//! Capacity-bounded cache whose entries expire a fixed TTL after their most
//! recent write. Expiration is checked lazily on read.

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use serde::ser::{Serialize, Serializer};
use tokio::time::Instant;

use crate::cache::{CacheStats, CoreCache, TimedItemFactory};
use crate::config::CacheConfig;
use crate::error::{validate_ttl, Result};
use crate::policy::{write_policy_name, Cache, TypeLabel};

// == Ephemeral Cache ==
/// Cache with a sliding TTL and no background work.
///
/// An expired entry is removed the next time it is read. Entries that are
/// never read again stay in the store until a rebalance evicts them or
/// [`purge_expired`](Self::purge_expired) is called.
#[derive(Debug)]
pub struct EphemeralCache<K, V> {
    core: CoreCache<K, V, TimedItemFactory>,
    ttl: Duration,
    label: Option<TypeLabel>,
}

impl<K, V> EphemeralCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// # Errors
    /// `CacheError::InvalidCapacity` when `capacity < 1`,
    /// `CacheError::InvalidTtl` when `ttl` is under 1ms or not whole milliseconds.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        let ttl = validate_ttl(ttl)?;

        Ok(Self {
            core: CoreCache::with_factory(capacity, TimedItemFactory::new(ttl))?,
            ttl,
            label: None,
        })
    }

    pub fn with_label(capacity: usize, ttl: Duration, label: TypeLabel) -> Result<Self> {
        let mut cache = Self::new(capacity, ttl)?;
        cache.label = Some(label);
        Ok(cache)
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let mut cache = Self::new(config.capacity, config.ttl())?;
        cache.label = config.label.clone();
        Ok(cache)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn label(&self) -> Option<&TypeLabel> {
        self.label.as_ref()
    }

    pub fn hits(&self, key: &K) -> Option<u64> {
        self.core.hits(key)
    }

    // == Purge Expired ==
    /// Removes every expired entry now. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        self.core.purge_expired(Instant::now())
    }
}

impl<K, V> Cache<K, V> for EphemeralCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn read(&mut self, key: &K) -> Option<V> {
        self.core.read_at(key, Instant::now())
    }

    fn write(&mut self, key: K, value: V) {
        self.core.write(key, value);
    }

    fn remove(&mut self, key: &K) {
        self.core.remove(key);
    }

    fn clear(&mut self) {
        self.core.clear();
    }

    fn size(&self) -> usize {
        self.core.len()
    }

    fn capacity(&self) -> usize {
        self.core.capacity()
    }

    fn keys(&self) -> Vec<K> {
        self.core.keys()
    }

    fn values(&self) -> Vec<V> {
        self.core.values()
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.core.entries()
    }

    fn stats(&self) -> CacheStats {
        self.core.stats()
    }
}

impl<K, V> fmt::Display for EphemeralCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_policy_name(f, "EphemeralCache", self.label.as_ref())?;
        write!(
            f,
            " {{ size: {}, capacity: {}, durationMs: {} }}",
            self.core.len(),
            self.core.capacity(),
            self.ttl.as_millis()
        )
    }
}

impl<K: Serialize, V: Serialize> Serialize for EphemeralCache<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.core.serialize(serializer)
    }
}
