//! Lookup result for explicit present/absent reads.

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    Present(V),
    Absent,
}

impl<V> Lookup<V> {
    pub fn is_present(&self) -> bool {
        matches!(self, Lookup::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        !self.is_present()
    }

    pub fn into_option(self) -> Option<V> {
        match self {
            Lookup::Present(value) => Some(value),
            Lookup::Absent => None,
        }
    }

    /// Returns the value, or `default` when absent.
    pub fn unwrap_or(self, default: V) -> V {
        self.into_option().unwrap_or(default)
    }
}

impl<V> From<Option<V>> for Lookup<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(value) => Lookup::Present(value),
            None => Lookup::Absent,
        }
    }
}

impl<V> From<Lookup<V>> for Option<V> {
    fn from(lookup: Lookup<V>) -> Self {
        lookup.into_option()
    }
}
