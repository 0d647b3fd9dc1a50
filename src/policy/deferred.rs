//! Deferred Cache
//!
//! TTL cache that batches expiration into a background sweep, scheduled at
//! most once per TTL window from read/write traffic.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::ser::{Serialize, Serializer};
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheStats, CoreCache, TimedItemFactory};
use crate::config::CacheConfig;
use crate::error::{validate_ttl, CacheError, Result};
use crate::policy::{write_policy_name, Cache, TypeLabel};
use crate::tasks::{spawn_purge, SharedStore};

// == Deferred Cache ==
/// Cache with a sliding TTL and a deferred full sweep.
///
/// Reads still drop expired entries on the spot. After each read or write,
/// once more than one TTL has passed since the last sweep was scheduled, a
/// new sweep is spawned on the runtime captured at construction. Until it
/// runs, `size()` may count entries that have already expired.
pub struct DeferredCache<K, V> {
    store: SharedStore<K, V>,
    ttl: Duration,
    label: Option<TypeLabel>,
    runtime: Handle,
    last_purged: Instant,
}

impl<K, V> DeferredCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity`, `CacheError::InvalidTtl`, or
    /// `CacheError::RuntimeUnavailable` when no runtime is running.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        let ttl = validate_ttl(ttl)?;
        let core = CoreCache::with_factory(capacity, TimedItemFactory::new(ttl))?;
        let runtime = Handle::try_current().map_err(|_| CacheError::RuntimeUnavailable)?;

        Ok(Self {
            store: Arc::new(Mutex::new(core)),
            ttl,
            label: None,
            runtime,
            last_purged: Instant::now(),
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
        self.store.lock().hits(key)
    }

    // == Schedule Purge ==
    fn schedule_purge(&mut self) {
        let now = Instant::now();
        if now <= self.last_purged + self.ttl {
            return;
        }

        self.last_purged = now;
        spawn_purge(&self.runtime, Arc::downgrade(&self.store));
        debug!("Scheduled deferred purge");
    }
}

impl<K, V> Cache<K, V> for DeferredCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    fn read(&mut self, key: &K) -> Option<V> {
        let value = self.store.lock().read_at(key, Instant::now());
        self.schedule_purge();
        value
    }

    fn write(&mut self, key: K, value: V) {
        self.store.lock().write(key, value);
        self.schedule_purge();
    }

    fn remove(&mut self, key: &K) {
        self.store.lock().remove(key);
    }

    fn clear(&mut self) {
        self.store.lock().clear();
    }

    fn size(&self) -> usize {
        self.store.lock().len()
    }

    fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    fn keys(&self) -> Vec<K> {
        self.store.lock().keys()
    }

    fn values(&self) -> Vec<V> {
        self.store.lock().values()
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.store.lock().entries()
    }

    fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }
}

impl<K, V> fmt::Debug for DeferredCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredCache")
            .field("store", &*self.store.lock())
            .field("ttl", &self.ttl)
            .field("label", &self.label)
            .field("last_purged", &self.last_purged)
            .finish()
    }
}

impl<K, V> fmt::Display for DeferredCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (size, capacity) = {
            let store = self.store.lock();
            (store.len(), store.capacity())
        };

        write_policy_name(f, "DeferredCache", self.label.as_ref())?;
        write!(
            f,
            " {{ size: {}, capacity: {}, durationMs: {} }}",
            size,
            capacity,
            self.ttl.as_millis()
        )
    }
}

impl<K: Serialize, V: Serialize> Serialize for DeferredCache<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.store.lock().serialize(serializer)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_requires_runtime() {
        let result = DeferredCache::<u8, u8>::new(1, Duration::from_millis(10));
        assert!(matches!(result, Err(CacheError::RuntimeUnavailable)));
    }

    #[tokio::test]
    async fn test_deferred_rejects_invalid_arguments() {
        assert!(matches!(
            DeferredCache::<u8, u8>::new(0, Duration::from_millis(10)),
            Err(CacheError::InvalidCapacity(0))
        ));
        assert!(matches!(
            DeferredCache::<u8, u8>::new(1, Duration::ZERO),
            Err(CacheError::InvalidTtl(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_purge_is_not_inline() {
        let mut cache = DeferredCache::new(10, Duration::from_millis(20)).unwrap();
        cache.write("a", 1);

        tokio::time::sleep(Duration::from_millis(25)).await;
        cache.write("b", 2);

        // Sweep is scheduled but has not run yet
        assert_eq!(cache.size(), 2);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(cache.size(), 1);
        assert_eq!(cache.keys(), vec!["b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_schedules_once_per_window() {
        let mut cache = DeferredCache::new(10, Duration::from_millis(20)).unwrap();
        cache.write("a", 1);

        tokio::time::sleep(Duration::from_millis(25)).await;
        cache.write("b", 2);
        let scheduled_at = cache.last_purged;
        cache.write("c", 3);
        cache.read(&"b");

        assert_eq!(cache.last_purged, scheduled_at);
    }

    #[tokio::test]
    async fn test_deferred_display() {
        let cache = DeferredCache::<String, u32>::with_label(
            5,
            Duration::from_millis(50),
            TypeLabel::new("string", "number"),
        )
        .unwrap();

        assert_eq!(
            cache.to_string(),
            "DeferredCache<string, number> { size: 0, capacity: 5, durationMs: 50 }"
        );
    }
}
