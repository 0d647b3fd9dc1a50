//! Cache Module
//!
//! Provides the shared storage core with hit-ranked eviction and the item
//! records it stores.

mod item;
mod lookup;
mod rebalance;
mod stats;
mod store;


// Re-export public types
pub use item::{
    BaseItemFactory, CacheItem, Expiring, Item, ItemFactory, TimedCacheItem, TimedItemFactory,
};
pub use lookup::Lookup;
pub use rebalance::rebalance;
pub use stats::CacheStats;
pub use store::CoreCache;
