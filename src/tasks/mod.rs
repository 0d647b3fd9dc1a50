//! Background Tasks Module
//!
//! Contains the background sweeps used by the time-bounded caches.
//!
//! # Tasks
//! - Interval sweep: removes expired entries on a fixed period
//! - Deferred purge: one-shot sweep spawned from read/write traffic

mod sweep;

pub use sweep::{spawn_purge, spawn_sweep_task, SharedStore};
