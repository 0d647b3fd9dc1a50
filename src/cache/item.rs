//! Cache Item Module
//!
//! Defines the item records held by the storage core and the factories that
//! build them on first write.

use std::time::Duration;

use tokio::time::Instant;

// == Item Trait ==
/// An item record stored against a key.
pub trait Item {
    type Key;
    type Value;

    fn key(&self) -> &Self::Key;

    fn value(&self) -> &Self::Value;

    /// Number of successful reads of this key.
    fn hits(&self) -> u64;

    /// Increments the hit counter after a successful read.
    fn record_hit(&mut self);

    /// Carries the hit count of the item this one replaces.
    fn inherit_hits(&mut self, hits: u64);
}

// == Expiring Trait ==
/// Item records that carry an expiration instant.
pub trait Expiring {
    /// Returns true once `now` is strictly past the expiration instant.
    fn is_expired_at(&self, now: Instant) -> bool;
}

// == Item Factory ==
/// Builds a fresh item record for a key written for the first time, or
/// rewritten over an existing one.
pub trait ItemFactory<K, V> {
    type Item: Item<Key = K, Value = V>;

    fn create(&self, key: K, value: V) -> Self::Item;
}

// == Cache Item ==
/// Plain item record with a hit counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheItem<K, V> {
    pub key: K,
    pub value: V,
    pub hits: u64,
}

impl<K, V> CacheItem<K, V> {
    /// Creates an item with zero hits.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            hits: 0,
        }
    }
}

impl<K, V> Item for CacheItem<K, V> {
    type Key = K;
    type Value = V;

    fn key(&self) -> &K {
        &self.key
    }

    fn value(&self) -> &V {
        &self.value
    }

    fn hits(&self) -> u64 {
        self.hits
    }

    fn record_hit(&mut self) {
        self.hits += 1;
    }

    fn inherit_hits(&mut self, hits: u64) {
        self.hits += hits;
    }
}

// == Timed Cache Item ==
/// Item record with a sliding expiration instant.
#[derive(Debug, Clone)]
pub struct TimedCacheItem<K, V> {
    pub item: CacheItem<K, V>,
    /// Write time plus TTL; refreshed on every write of the key
    pub expires_at: Instant,
}

impl<K, V> TimedCacheItem<K, V> {
    /// Creates an item expiring `ttl` from now.
    pub fn new(key: K, value: V, ttl: Duration) -> Self {
        Self {
            item: CacheItem::new(key, value),
            expires_at: Instant::now() + ttl,
        }
    }

    /// Returns remaining time to live, or zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

impl<K, V> Item for TimedCacheItem<K, V> {
    type Key = K;
    type Value = V;

    fn key(&self) -> &K {
        self.item.key()
    }

    fn value(&self) -> &V {
        self.item.value()
    }

    fn hits(&self) -> u64 {
        self.item.hits()
    }

    fn record_hit(&mut self) {
        self.item.record_hit();
    }

    fn inherit_hits(&mut self, hits: u64) {
        self.item.inherit_hits(hits);
    }
}

impl<K, V> Expiring for TimedCacheItem<K, V> {
    fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

// == Factories ==
/// Builds plain [`CacheItem`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseItemFactory;

impl<K, V> ItemFactory<K, V> for BaseItemFactory {
    type Item = CacheItem<K, V>;

    fn create(&self, key: K, value: V) -> Self::Item {
        CacheItem::new(key, value)
    }
}

/// Builds [`TimedCacheItem`]s stamped with `now + ttl`.
#[derive(Debug, Clone, Copy)]
pub struct TimedItemFactory {
    ttl: Duration,
}

impl TimedItemFactory {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<K, V> ItemFactory<K, V> for TimedItemFactory {
    type Item = TimedCacheItem<K, V>;

    fn create(&self, key: K, value: V) -> Self::Item {
        TimedCacheItem::new(key, value, self.ttl)
    }
}
