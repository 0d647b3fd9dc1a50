//! Temporary Cache
//!
//! TTL cache with a recurring background sweep that runs every TTL interval,
//! independent of read/write traffic.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::ser::{Serialize, Serializer};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

use crate::cache::{CacheStats, CoreCache, TimedItemFactory};
use crate::config::CacheConfig;
use crate::error::{validate_ttl, CacheError, Result};
use crate::policy::{write_policy_name, Cache, TypeLabel};
use crate::tasks::{spawn_sweep_task, SharedStore};

// == Sweep State ==
/// Whether the recurring sweep is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Running,
    Stopped,
}

// == Temporary Cache ==
/// Cache with a sliding TTL and an interval sweep.
///
/// The sweep starts at construction. Reads still check expiration, so a
/// delayed tick never exposes a stale value. Dropping the cache stops the
/// sweep.
pub struct TemporaryCache<K, V> {
    store: SharedStore<K, V>,
    ttl: Duration,
    label: Option<TypeLabel>,
    runtime: Handle,
    sweeper: Option<JoinHandle<()>>,
}

impl<K, V> TemporaryCache<K, V>
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

        let mut cache = Self {
            store: Arc::new(Mutex::new(core)),
            ttl,
            label: None,
            runtime,
            sweeper: None,
        };
        cache.start_interval();
        Ok(cache)
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

    // == Interval Control ==
    /// Starts the recurring sweep, replacing any sweep already running.
    pub fn start_interval(&mut self) {
        self.stop_interval();
        self.sweeper = Some(spawn_sweep_task(
            &self.runtime,
            Arc::downgrade(&self.store),
            self.ttl,
        ));
    }

    /// Cancels the recurring sweep. Safe to call when already stopped.
    pub fn stop_interval(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
            info!("Stopped TTL sweep task");
        }
    }
}

impl<K, V> TemporaryCache<K, V> {
    /// A sweep whose task has already finished, for example because its
    /// runtime shut down, counts as stopped.
    pub fn sweep_state(&self) -> SweepState {
        match &self.sweeper {
            Some(handle) if !handle.is_finished() => SweepState::Running,
            _ => SweepState::Stopped,
        }
    }
}

impl<K, V> Cache<K, V> for TemporaryCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    fn read(&mut self, key: &K) -> Option<V> {
        self.store.lock().read_at(key, Instant::now())
    }

    fn write(&mut self, key: K, value: V) {
        self.store.lock().write(key, value);
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

impl<K, V> Drop for TemporaryCache<K, V> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

impl<K, V> fmt::Debug for TemporaryCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCache")
            .field("store", &*self.store.lock())
            .field("ttl", &self.ttl)
            .field("label", &self.label)
            .field("sweep_state", &self.sweep_state())
            .finish()
    }
}

impl<K, V> fmt::Display for TemporaryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (size, capacity) = {
            let store = self.store.lock();
            (store.len(), store.capacity())
        };

        write_policy_name(f, "TemporaryCache", self.label.as_ref())?;
        write!(
            f,
            " {{ size: {}, capacity: {}, durationMs: {} }}",
            size,
            capacity,
            self.ttl.as_millis()
        )
    }
}

impl<K: Serialize, V: Serialize> Serialize for TemporaryCache<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.store.lock().serialize(serializer)
    }
}
