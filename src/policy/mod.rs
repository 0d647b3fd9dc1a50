//! Policy Module
//!
//! Cache policies built on the shared storage core.
//!
//! # Policies
//! - [`SimpleCache`]: capacity-bounded, evicts the least-read entry on overflow
//! - [`EphemeralCache`]: adds a sliding TTL checked on every read
//! - [`DeferredCache`]: TTL plus a background sweep scheduled at most once per TTL window
//! - [`TemporaryCache`]: TTL plus a recurring sweep on a fixed interval

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheStats, Lookup};

mod deferred;
mod ephemeral;
mod simple;
mod temporary;

pub use deferred::DeferredCache;
pub use ephemeral::EphemeralCache;
pub use simple::SimpleCache;
pub use temporary::{SweepState, TemporaryCache};

// == Cache Trait ==
/// Operations shared by every cache policy.
pub trait Cache<K, V> {
    /// Reads a value, counting a hit. `None` on a miss or an expired entry.
    fn read(&mut self, key: &K) -> Option<V>;

    /// Same as [`read`](Cache::read), wrapped in a [`Lookup`].
    fn get(&mut self, key: &K) -> Lookup<V> {
        self.read(key).into()
    }

    /// Writes a value, evicting the least-read entries if capacity is exceeded.
    fn write(&mut self, key: K, value: V);

    /// Removes a key. Absent keys are ignored.
    fn remove(&mut self, key: &K);

    /// Removes every entry.
    fn clear(&mut self);

    /// Synonym for [`clear`](Cache::clear).
    fn invalidate(&mut self) {
        self.clear();
    }

    fn size(&self) -> usize;

    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn keys(&self) -> Vec<K>;

    fn values(&self) -> Vec<V>;

    fn entries(&self) -> Vec<(K, V)>;

    fn stats(&self) -> CacheStats;
}

// == Type Label ==
/// Descriptive key/value type names shown by `Display`. Never affects behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeLabel {
    pub key: String,
    pub value: String,
}

impl TypeLabel {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.key, self.value)
    }
}

/// Writes `Name` or `Name<key, value>` depending on the label.
fn write_policy_name(f: &mut fmt::Formatter<'_>, name: &str, label: Option<&TypeLabel>) -> fmt::Result {
    match label {
        Some(label) => write!(f, "{name}<{label}>"),
        None => write!(f, "{name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_label_display() {
        let label = TypeLabel::new("string", "number");
        assert_eq!(label.to_string(), "string, number");
    }

    #[test]
    fn test_type_label_deserialize() {
        let label: TypeLabel = serde_json::from_str(r#"{"key":"u64","value":"Session"}"#).unwrap();
        assert_eq!(label, TypeLabel::new("u64", "Session"));
    }
}
