//! Simple Cache
//!
//! Capacity-bounded cache with no time dimension.

use std::fmt;
use std::hash::Hash;

use serde::ser::{Serialize, Serializer};

use crate::cache::{CacheStats, CoreCache};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::policy::{write_policy_name, Cache, TypeLabel};

// == Simple Cache ==
/// Cache bounded by entry count. On overflow the least-read entries are
/// evicted, except the key just written.
///
/// Keep `capacity * size_of::<V>()` in mind when sizing: a rebalance costs a
/// sort over all entries plus one removal per evicted key.
#[derive(Debug)]
pub struct SimpleCache<K, V> {
    core: CoreCache<K, V>,
    label: Option<TypeLabel>,
}

impl<K, V> SimpleCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// # Errors
    /// `CacheError::InvalidCapacity` when `capacity < 1`.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            core: CoreCache::new(capacity)?,
            label: None,
        })
    }

    pub fn with_label(capacity: usize, label: TypeLabel) -> Result<Self> {
        let mut cache = Self::new(capacity)?;
        cache.label = Some(label);
        Ok(cache)
    }

    /// Builds from a config. The TTL is ignored.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let mut cache = Self::new(config.capacity)?;
        cache.label = config.label.clone();
        Ok(cache)
    }

    /// Hit count recorded for `key`, without counting a read.
    pub fn hits(&self, key: &K) -> Option<u64> {
        self.core.hits(key)
    }

    pub fn label(&self) -> Option<&TypeLabel> {
        self.label.as_ref()
    }
}

impl<K, V> Cache<K, V> for SimpleCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn read(&mut self, key: &K) -> Option<V> {
        self.core.read(key)
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

impl<K, V> fmt::Display for SimpleCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_policy_name(f, "SimpleCache", self.label.as_ref())?;
        write!(
            f,
            " {{ size: {}, capacity: {} }}",
            self.core.len(),
            self.core.capacity()
        )
    }
}

impl<K: Serialize, V: Serialize> Serialize for SimpleCache<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.core.serialize(serializer)
    }
}
