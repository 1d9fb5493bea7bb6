//! Shared per-key task handles.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::oneshot;

use super::TaskError;

/// Outcome of a batched task.
///
/// `Ok(None)` means the loader returned no value for the key.
pub type TaskResult<V, E> = Result<Option<V>, TaskError<E>>;

/// Future resolving to the outcome of one key's task.
///
/// Clones share one underlying future: every caller that asked for the same
/// key while it was in flight holds a clone of the same handle, and
/// [`ptr_eq`](Self::ptr_eq) tells them apart from handles of other cycles.
#[derive(Clone)]
pub struct TaskHandle<V, E> {
    inner: Shared<BoxFuture<'static, TaskResult<V, E>>>,
}

impl<V, E> TaskHandle<V, E>
where
    V: Clone,
    E: Clone,
{
    /// Returns `true` if both handles belong to the same task.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }

    /// Returns the outcome if the task already settled and was polled.
    #[must_use]
    pub fn peek(&self) -> Option<&TaskResult<V, E>> {
        self.inner.peek()
    }
}

impl<V, E> Future for TaskHandle<V, E>
where
    V: Clone,
    E: Clone,
{
    type Output = TaskResult<V, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<V, E> fmt::Debug for TaskHandle<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle").finish_non_exhaustive()
    }
}

/// Completes the handle it was created with.
///
/// Dropping a settler without using it settles the handle with
/// [`TaskError::Abandoned`].
pub(crate) struct Settler<V, E> {
    tx: oneshot::Sender<TaskResult<V, E>>,
}

impl<V, E> Settler<V, E> {
    pub(crate) fn resolve(self, value: Option<V>) {
        self.settle(Ok(value));
    }

    pub(crate) fn reject(self, error: TaskError<E>) {
        self.settle(Err(error));
    }

    fn settle(self, result: TaskResult<V, E>) {
        // Every handle clone may already be gone; nobody is left to notify.
        let _ = self.tx.send(result);
    }
}

impl<V, E> fmt::Debug for Settler<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settler")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// Creates a pending handle and the settler that completes it.
pub(crate) fn pending<V, E>() -> (Settler<V, E>, TaskHandle<V, E>)
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let (tx, rx) = oneshot::channel();
    let inner = async move { rx.await.unwrap_or(Err(TaskError::Abandoned)) }
        .boxed()
        .shared();
    (Settler { tx }, TaskHandle { inner })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_delivers_value_to_every_clone() {
        let (settler, handle) = pending::<u32, String>();
        let other = handle.clone();

        settler.resolve(Some(7));

        assert_eq!(handle.await, Ok(Some(7)));
        assert_eq!(other.await, Ok(Some(7)));
    }

    #[tokio::test]
    async fn reject_delivers_error() {
        let (settler, handle) = pending::<u32, String>();

        settler.reject(TaskError::Failed("boom".to_string()));

        assert_eq!(handle.await, Err(TaskError::Failed("boom".to_string())));
    }

    #[tokio::test]
    async fn dropped_settler_abandons_task() {
        let (settler, handle) = pending::<u32, String>();

        drop(settler);

        assert_eq!(handle.await, Err(TaskError::Abandoned));
    }

    #[test]
    fn clones_are_ptr_eq_and_fresh_handles_are_not() {
        let (_settler, handle) = pending::<u32, String>();
        let (_other_settler, other) = pending::<u32, String>();

        assert!(handle.ptr_eq(&handle.clone()));
        assert!(!handle.ptr_eq(&other));
    }

    #[tokio::test]
    async fn peek_reports_settled_outcome_after_poll() {
        let (settler, handle) = pending::<u32, String>();
        assert!(handle.peek().is_none());

        settler.resolve(None);
        let _ = handle.clone().await;

        assert_eq!(handle.peek(), Some(&Ok(None)));
    }

    #[test]
    fn resolve_after_handles_dropped_does_not_panic() {
        let (settler, handle) = pending::<u32, String>();
        drop(handle);

        settler.resolve(Some(1));
    }
}
