//! Batch results and their routing back to individual keys.

use std::collections::HashMap;
use std::hash::Hash;

/// Per-key results returned by a [`BatchLoader`](super::BatchLoader).
///
/// Each value is a tagged `Result`: `Err` rejects only that key's task.
///
/// # Addressing
///
/// | Variant | Result for a key is found by |
/// |---------|------------------------------|
/// | `Ordered` | Position of the key in the requested key list |
/// | `Keyed` | Looking the key up in the map |
///
/// A key without a result (missing map entry, or a position past the end of
/// the list) resolves to `None`. Surplus positional results are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchResults<K, V, E>
where
    K: Eq + Hash,
{
    /// Results aligned with the requested keys by position.
    Ordered(Vec<Result<V, E>>),
    /// Results looked up by key.
    Keyed(HashMap<K, Result<V, E>>),
}

impl<K, V, E> BatchResults<K, V, E>
where
    K: Eq + Hash,
{
    /// Number of results the loader returned.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ordered(results) => results.len(),
            Self::Keyed(results) => results.len(),
        }
    }

    /// Returns `true` if the loader returned no results at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_router(self) -> ResultRouter<K, V, E> {
        match self {
            Self::Ordered(results) => ResultRouter::Ordered(results.into_iter()),
            Self::Keyed(results) => ResultRouter::Keyed(results),
        }
    }
}

impl<K, V, E> From<Vec<Result<V, E>>> for BatchResults<K, V, E>
where
    K: Eq + Hash,
{
    fn from(results: Vec<Result<V, E>>) -> Self {
        Self::Ordered(results)
    }
}

impl<K, V, E> From<HashMap<K, Result<V, E>>> for BatchResults<K, V, E>
where
    K: Eq + Hash,
{
    fn from(results: HashMap<K, Result<V, E>>) -> Self {
        Self::Keyed(results)
    }
}

impl<K, V, E> FromIterator<(K, Result<V, E>)> for BatchResults<K, V, E>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, Result<V, E>)>>(iter: I) -> Self {
        Self::Keyed(iter.into_iter().collect())
    }
}

/// Hands out results one key at a time, in batch order.
///
/// Positional results are consumed in sequence, so `take` must be called
/// exactly once per batch entry, in the order the keys were requested.
pub(crate) enum ResultRouter<K, V, E> {
    Ordered(std::vec::IntoIter<Result<V, E>>),
    Keyed(HashMap<K, Result<V, E>>),
}

impl<K, V, E> ResultRouter<K, V, E>
where
    K: Eq + Hash,
{
    pub(crate) fn take(&mut self, key: &K) -> Option<Result<V, E>> {
        match self {
            Self::Ordered(results) => results.next(),
            Self::Keyed(results) => results.remove(key),
        }
    }
}
