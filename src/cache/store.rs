//! Cache Store Module
//!
//! Ordered key-to-item storage shared by every cache policy. Capacity is
//! enforced on write through a hit-ranked rebalance.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::cache::rebalance::rebalance;
use crate::cache::{BaseItemFactory, CacheStats, Expiring, Item, ItemFactory, Lookup};
use crate::error::{validate_capacity, Result};

// == Core Cache ==
/// Capacity-bounded storage keyed by `K`, with item records built by `F`.
///
/// Iteration order is insertion order. Overwriting a key keeps its position;
/// removing a key keeps the relative order of the rest.
pub struct CoreCache<K, V, F = BaseItemFactory>
where
    F: ItemFactory<K, V>,
{
    store: IndexMap<K, F::Item>,
    factory: F,
    capacity: usize,
    stats: CacheStats,
    _value: PhantomData<fn() -> V>,
}

impl<K, V> CoreCache<K, V, BaseItemFactory>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a core holding plain hit-counted items.
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` when `capacity < 1`.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_factory(capacity, BaseItemFactory)
    }
}

impl<K, V, F> CoreCache<K, V, F>
where
    K: Eq + Hash + Clone,
    V: Clone,
    F: ItemFactory<K, V>,
{
    /// Creates a core whose items are built by `factory`.
    pub fn with_factory(capacity: usize, factory: F) -> Result<Self> {
        let capacity = validate_capacity(capacity)?;

        Ok(Self {
            store: IndexMap::new(),
            factory,
            capacity,
            stats: CacheStats::new(),
            _value: PhantomData,
        })
    }

    // == Read ==
    /// Returns a clone of the value for `key` and counts a hit.
    ///
    /// A miss leaves the store untouched.
    pub fn read(&mut self, key: &K) -> Option<V> {
        match self.store.get_mut(key) {
            Some(item) => {
                item.record_hit();
                self.stats.record_hit();
                Some(item.value().clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Same lookup as [`read`](Self::read), as an explicit [`Lookup`].
    pub fn get(&mut self, key: &K) -> Lookup<V> {
        self.read(key).into()
    }

    // == Write ==
    /// Stores `value` at `key`.
    ///
    /// An overwrite keeps the prior hit count. If the store grows past
    /// capacity, a rebalance evicts the least-read entries, never `key`.
    pub fn write(&mut self, key: K, value: V) {
        let mut item = self.factory.create(key.clone(), value);
        if let Some(existing) = self.store.get(&key) {
            item.inherit_hits(existing.hits());
        }

        self.store.insert(key.clone(), item);

        if self.store.len() > self.capacity {
            let evicted = rebalance(&mut self.store, self.capacity, &key);
            self.stats.record_evictions(evicted.len());
            debug!(
                evicted = evicted.len(),
                capacity = self.capacity,
                "Rebalanced cache after overflow"
            );
        }

        self.stats.set_total_entries(self.store.len());
    }

    // == Remove ==
    /// Deletes `key` if present.
    pub fn remove(&mut self, key: &K) {
        if self.store.shift_remove(key).is_some() {
            self.stats.set_total_entries(self.store.len());
        }
    }

    // == Clear ==
    /// Removes every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.store.clear();
        self.stats.set_total_entries(0);
    }

    /// Synonym for [`clear`](Self::clear).
    pub fn invalidate(&mut self) {
        self.clear();
    }

    // == Introspection ==
    /// Returns the number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the maximum number of entries kept after a write.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the keys in iteration order.
    pub fn keys(&self) -> Vec<K> {
        self.store.keys().cloned().collect()
    }

    /// Returns the values in the same order as [`keys`](Self::keys).
    pub fn values(&self) -> Vec<V> {
        self.store.values().map(|item| item.value().clone()).collect()
    }

    /// Returns `(key, value)` pairs in the same order as [`keys`](Self::keys).
    pub fn entries(&self) -> Vec<(K, V)> {
        self.store
            .iter()
            .map(|(key, item)| (key.clone(), item.value().clone()))
            .collect()
    }

    /// Returns the hit count recorded for `key` without counting a read.
    pub fn hits(&self, key: &K) -> Option<u64> {
        self.store.get(key).map(|item| item.hits())
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }
}

impl<K, V, F> CoreCache<K, V, F>
where
    K: Eq + Hash + Clone,
    V: Clone,
    F: ItemFactory<K, V>,
    F::Item: Expiring,
{
    // == Read Unexpired ==
    /// Reads `key` as of `now`, removing it instead if it has expired.
    pub fn read_at(&mut self, key: &K, now: Instant) -> Option<V> {
        let expired = match self.store.get(key) {
            Some(item) => item.is_expired_at(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.store.shift_remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.store.len());
            trace!("Removed expired entry on read");
            return None;
        }

        self.read(key)
    }

    // == Purge Expired ==
    /// Removes every entry expired as of `now`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.store.len();
        self.store.retain(|_, item| !item.is_expired_at(now));

        let removed = before - self.store.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.store.len());
        removed
    }
}

impl<K, V, F> fmt::Debug for CoreCache<K, V, F>
where
    F: ItemFactory<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreCache")
            .field("size", &self.store.len())
            .field("capacity", &self.capacity)
            .field("stats", &self.stats)
            .finish()
    }
}

// == Serialization ==
/// Serializes as an ordered sequence of `[key, value]` pairs.
impl<K, V, F> Serialize for CoreCache<K, V, F>
where
    K: Serialize,
    V: Serialize,
    F: ItemFactory<K, V>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.store.len()))?;
        for (key, item) in &self.store {
            seq.serialize_element(&(key, item.value()))?;
        }
        seq.end()
    }
}
