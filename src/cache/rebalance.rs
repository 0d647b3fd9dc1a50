//! Rebalance Module
//!
//! Evicts the least-read entries once a write pushes the store over capacity.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::cache::Item;

// == Rebalance ==
/// Evicts entries in ascending hit order until `store.len() <= capacity`.
///
/// The sort is stable, so among entries with equal hits the one earliest in
/// iteration order goes first. `newest` is the key whose write triggered the
/// pass; it is skipped even when it has the fewest hits, so a freshly written
/// value always survives its own rebalance.
///
/// Returns the evicted keys in eviction order.
pub fn rebalance<K, I>(store: &mut IndexMap<K, I>, capacity: usize, newest: &K) -> Vec<K>
where
    K: Eq + Hash + Clone,
    I: Item<Key = K>,
{
    let mut candidates: Vec<(&K, u64)> = store.iter().map(|(k, item)| (k, item.hits())).collect();
    candidates.sort_by_key(|&(_, hits)| hits);

    let overflow = store.len().saturating_sub(capacity);
    let victims: Vec<K> = candidates
        .into_iter()
        .map(|(k, _)| k)
        .filter(|k| *k != newest)
        .take(overflow)
        .cloned()
        .collect();

    for key in &victims {
        store.shift_remove(key);
    }

    victims
}
