//! TTL Sweep Tasks
//!
//! Background tasks that remove expired entries from a shared store.

use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::{CoreCache, TimedItemFactory};

/// Store shared between a time-bounded cache and its sweep tasks.
pub type SharedStore<K, V> = Arc<Mutex<CoreCache<K, V, TimedItemFactory>>>;

/// Spawns a task that sweeps expired entries every `interval`.
///
/// The task holds a weak reference and exits on its own once the cache is
/// dropped. The returned handle aborts it early.
pub fn spawn_sweep_task<K, V>(
    runtime: &Handle,
    store: Weak<Mutex<CoreCache<K, V, TimedItemFactory>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    runtime.spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = store.upgrade() else {
                debug!("Cache dropped, stopping TTL sweep task");
                break;
            };

            // Lock is held for the whole scan
            let removed = store.lock().purge_expired(Instant::now());

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}

/// Spawns a one-shot sweep that runs once the caller yields to the runtime.
pub fn spawn_purge<K, V>(
    runtime: &Handle,
    store: Weak<Mutex<CoreCache<K, V, TimedItemFactory>>>,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    runtime.spawn(async move {
        let Some(store) = store.upgrade() else {
            return;
        };

        let removed = store.lock().purge_expired(Instant::now());
        debug!("Deferred purge: removed {} expired entries", removed);
    })
}
