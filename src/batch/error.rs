//! Error types for batched tasks.

use thiserror::Error;

/// Why a task handle settled without a value.
///
/// `E` is the loader's error type. Per-key failures and whole-batch failures
/// carry it in separate variants so callers can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError<E> {
    /// The loader reported an error for this key.
    ///
    /// Other keys of the same batch are unaffected.
    #[error("Task failed: {0}")]
    Failed(E),

    /// The whole batch load failed.
    ///
    /// Every task of the batch settles with a clone of the same error.
    #[error("Batch failed: {0}")]
    BatchFailed(E),

    /// The task was dropped before its batch settled.
    ///
    /// Happens when the loader panics, or when the last batcher handle is
    /// dropped while the task is still queued.
    #[error("Task abandoned before its batch settled")]
    Abandoned,
}

impl<E> TaskError<E> {
    /// Returns the loader error carried by this error, if any.
    #[must_use]
    pub const fn loader_error(&self) -> Option<&E> {
        match self {
            Self::Failed(e) | Self::BatchFailed(e) => Some(e),
            Self::Abandoned => None,
        }
    }
}

/// Error type for batcher operations that do not involve a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// The requested operation name is neither `add_task` nor its alias.
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),
}
