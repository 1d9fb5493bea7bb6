//! The bulk operation the batcher calls once per batch.

use std::future::Future;
use std::hash::Hash;

use super::BatchResults;

/// What a [`BatchLoader`] produces for one batch.
///
/// `Err` fails the whole batch; per-key failures belong inside
/// [`BatchResults`].
pub type LoadResult<K, V, E> = Result<BatchResults<K, V, E>, E>;

/// Loads many keys in one call.
///
/// Receives the keys of a batch in the order they were first requested.
/// Retries, if wanted, belong in the implementation; the batcher never
/// retries a load.
///
/// Any `Fn(Vec<K>) -> impl Future<Output = LoadResult<K, V, E>>` closure is a
/// loader.
///
/// # Example
///
/// ```
/// use task_batcher::batch::{BatchLoader, LoadResult};
///
/// struct Squares;
///
/// impl BatchLoader<u64, u64, String> for Squares {
///     async fn load(&self, keys: Vec<u64>) -> LoadResult<u64, u64, String> {
///         Ok(keys.iter().map(|k| (*k, Ok(k * k))).collect())
///     }
/// }
/// ```
pub trait BatchLoader<K, V, E>: Send + Sync
where
    K: Eq + Hash,
{
    /// Loads every key of one batch.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the batch as a whole failed. Every task of the
    /// batch then settles with [`TaskError::BatchFailed`].
    ///
    /// [`TaskError::BatchFailed`]: super::TaskError::BatchFailed
    fn load(&self, keys: Vec<K>) -> impl Future<Output = LoadResult<K, V, E>> + Send;
}

impl<K, V, E, F, Fut> BatchLoader<K, V, E> for F
where
    K: Eq + Hash,
    F: Fn(Vec<K>) -> Fut + Send + Sync,
    Fut: Future<Output = LoadResult<K, V, E>> + Send,
{
    fn load(&self, keys: Vec<K>) -> impl Future<Output = LoadResult<K, V, E>> + Send {
        self(keys)
    }
}
