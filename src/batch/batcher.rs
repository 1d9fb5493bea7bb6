//! The batching engine: enqueue, dedup, dispatch and result routing.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, trace, warn};

use super::debounce::{DebounceWindow, Decision};
use super::handle::{self, Settler, TaskHandle};
use super::queue::{PendingQueue, TaskEntry};
use super::{BatchError, BatchLoader, BatchOptions, BatchResults, LoadResult, TaskError};
use crate::time::{Clock, Timer, TokioClock, TokioTimer};

/// Name of the enqueue operation, as accepted by [`Batcher::invoke`].
pub const ADD_TASK: &str = "add_task";

/// Coalesces per-key requests into debounced calls to a [`BatchLoader`].
///
/// Cloning is cheap; clones share one queue, one dedup cache and one timer.
///
/// # Lifecycle of a key
///
/// 1. [`add_task`](Self::add_task) queues the key and returns a [`TaskHandle`].
///    Asking again while the key is in flight returns a clone of that handle.
/// 2. When the batch window closes, the queue is drained and the loader gets
///    every drained key, in first-requested order.
/// 3. When the load finishes, the keys leave the dedup cache and each handle
///    settles with its own result.
///
/// # Runtime
///
/// The default [`TokioTimer`] and the batch calls are spawned on tokio, so
/// `add_task` must run inside a tokio runtime.
///
/// # Example
///
/// ```
/// use task_batcher::batch::{BatchOptions, Batcher, LoadResult};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let batcher = Batcher::new(
///     |keys: Vec<u32>| async move {
///         let results: LoadResult<u32, String, String> =
///             Ok(keys.iter().map(|k| Ok(format!("user-{k}"))).collect::<Vec<_>>().into());
///         results
///     },
///     BatchOptions::default(),
/// );
///
/// let (a, b) = tokio::join!(batcher.add_task(1), batcher.add_task(2));
/// assert_eq!(a, Ok(Some("user-1".to_string())));
/// assert_eq!(b, Ok(Some("user-2".to_string())));
/// # }
/// ```
pub struct Batcher<K, V, E, L> {
    inner: Arc<Inner<K, V, E, L>>,
}

struct Inner<K, V, E, L> {
    loader: L,
    options: BatchOptions,
    clock: Box<dyn Clock>,
    timer: Box<dyn Timer>,
    state: Mutex<State<K, V, E>>,
}

struct State<K, V, E> {
    queue: PendingQueue<K, Settler<V, E>>,
    in_flight: HashMap<K, TaskHandle<V, E>>,
    window: DebounceWindow,
}

type Batch<K, V, E> = Vec<TaskEntry<K, Settler<V, E>>>;

impl<K, V, E, L> Batcher<K, V, E, L>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    L: BatchLoader<K, V, E> + 'static,
{
    /// Creates a batcher on tokio's clock and timers.
    #[must_use]
    pub fn new(loader: L, options: BatchOptions) -> Self {
        Self::with_time(loader, options, TokioClock, TokioTimer)
    }

    /// Creates a batcher with an injected clock and timer.
    ///
    /// This is primarily useful for tests that drive windows by hand.
    #[must_use]
    pub fn with_time(
        loader: L,
        options: BatchOptions,
        clock: impl Clock + 'static,
        timer: impl Timer + 'static,
    ) -> Self {
        let state = State {
            queue: PendingQueue::new(),
            in_flight: HashMap::new(),
            window: DebounceWindow::new(options.debounce()),
        };
        Self {
            inner: Arc::new(Inner {
                loader,
                options,
                clock: Box::new(clock),
                timer: Box::new(timer),
                state: Mutex::new(state),
            }),
        }
    }

    /// Requests `key`, joining the in-flight request for it if there is one.
    ///
    /// Awaiting the handle yields `Ok(Some(value))`, `Ok(None)` when the
    /// loader returned nothing for the key, or a [`TaskError`].
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime when the batcher uses [`TokioTimer`],
    /// or when this call closes the window and spawns the batch.
    pub fn add_task(&self, key: K) -> TaskHandle<V, E> {
        let mut state = self.inner.lock_state();

        if let Some(existing) = state.in_flight.get(&key) {
            trace!("Joined in-flight task");
            return existing.clone();
        }

        let (settler, task) = handle::pending();
        state.queue.push(key.clone(), settler);
        state.in_flight.insert(key, task.clone());

        match state.window.request(self.inner.clock.now()) {
            Decision::Arm { after, generation } => {
                trace!(?after, queued = state.queue.len(), "Batch timer armed");
                let inner = Arc::downgrade(&self.inner);
                let timer = self.inner.timer.schedule(
                    after,
                    Box::new(move || Inner::on_timer(&inner, generation)),
                );
                state.window.attach(generation, timer);
            }
            Decision::FireNow => {
                debug!(queued = state.queue.len(), "Max wait reached, firing batch now");
                let batch = state.queue.drain();
                drop(state);
                Inner::dispatch(&self.inner, batch);
            }
        }

        task
    }

    /// Calls `add_task` through one of its operation names.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::UnknownOperation`] if `operation` is neither
    /// [`ADD_TASK`] nor the configured alias.
    pub fn invoke(&self, operation: &str, key: K) -> Result<TaskHandle<V, E>, BatchError> {
        if operation == ADD_TASK || self.alias() == Some(operation) {
            Ok(self.add_task(key))
        } else {
            Err(BatchError::UnknownOperation(operation.to_string()))
        }
    }
}

impl<K, V, E, L> Batcher<K, V, E, L> {
    /// Returns the options the batcher was built with.
    #[must_use]
    pub fn options(&self) -> &BatchOptions {
        &self.inner.options
    }

    /// Returns the alternate name of `add_task`, if configured.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.inner.options.alias()
    }

    /// Lists the names `add_task` answers to: [`ADD_TASK`], then the alias.
    ///
    /// An alias equal to [`ADD_TASK`] is listed once.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(ADD_TASK).chain(self.alias().filter(|alias| *alias != ADD_TASK))
    }

    /// Number of keys waiting for the current window to fire.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.lock_state().queue.len()
    }

    /// Number of keys queued or being loaded.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.inner.lock_state().in_flight.len()
    }

    /// Returns `true` if no batch window is open.
    ///
    /// Batches already dispatched may still be loading.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let state = self.inner.lock_state();
        state.window.is_idle() && state.queue.is_empty()
    }
}

impl<K, V, E, L> Clone for Batcher<K, V, E, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, E, L> std::fmt::Debug for Batcher<K, V, E, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("Batcher")
            .field("options", &self.inner.options)
            .field("pending", &state.queue.len())
            .field("in_flight", &state.in_flight.len())
            .field("window_started_at", &state.window.started_at())
            .finish_non_exhaustive()
    }
}

impl<K, V, E, L> Inner<K, V, E, L> {
    fn lock_state(&self) -> MutexGuard<'_, State<K, V, E>> {
        // State stays consistent between statements; a panic elsewhere must
        // not wedge every later caller.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V, E, L> Inner<K, V, E, L>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    L: BatchLoader<K, V, E> + 'static,
{
    fn on_timer(inner: &Weak<Self>, generation: u64) {
        let Some(inner) = inner.upgrade() else {
            // Every batcher handle is gone; the queued settlers were dropped with it.
            return;
        };

        let batch = {
            let mut state = inner.lock_state();
            if !state.window.expire(generation) {
                trace!(generation, "Ignored superseded batch timer");
                return;
            }
            state.queue.drain()
        };

        Self::dispatch(&inner, batch);
    }

    fn dispatch(inner: &Arc<Self>, batch: Batch<K, V, E>) {
        if batch.is_empty() {
            return;
        }

        let keys: Vec<K> = batch.iter().map(|entry| entry.key.clone()).collect();
        debug!(batch_size = keys.len(), "Dispatching batch");

        let in_flight = InFlightBatch {
            inner: Arc::clone(inner),
            entries: batch,
        };
        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            let outcome = inner.loader.load(keys).await;
            in_flight.settle(outcome);
        });
    }
}

impl<K, V, E, L> Inner<K, V, E, L>
where
    K: Eq + Hash,
{
    /// Removes the batch's keys from the dedup cache.
    fn release(&self, batch: &Batch<K, V, E>) {
        let mut state = self.lock_state();
        for entry in batch {
            state.in_flight.remove(&entry.key);
        }
    }
}

/// A dispatched batch whose load has not finished.
///
/// If it is dropped unsettled (the loader panicked, or the runtime shut
/// down), its keys still leave the dedup cache and every handle settles with
/// [`TaskError::Abandoned`].
struct InFlightBatch<K, V, E, L>
where
    K: Eq + Hash,
{
    inner: Arc<Inner<K, V, E, L>>,
    entries: Batch<K, V, E>,
}

impl<K, V, E, L> InFlightBatch<K, V, E, L>
where
    K: Eq + Hash,
    E: Clone,
{
    fn settle(mut self, outcome: LoadResult<K, V, E>) {
        let entries = std::mem::take(&mut self.entries);
        // Release before settling so a caller woken by its result starts a
        // fresh cycle when it asks for the same key again.
        self.inner.release(&entries);

        match outcome {
            Ok(results) => {
                if matches!(&results, BatchResults::Ordered(values) if values.len() != entries.len())
                {
                    debug!(
                        expected = entries.len(),
                        returned = results.len(),
                        "Positional results do not match batch size"
                    );
                }

                let mut router = results.into_router();
                for TaskEntry { key, settler } in entries {
                    match router.take(&key) {
                        Some(Ok(value)) => settler.resolve(Some(value)),
                        Some(Err(error)) => settler.reject(TaskError::Failed(error)),
                        None => settler.resolve(None),
                    }
                }
            }
            Err(error) => {
                warn!(
                    batch_size = entries.len(),
                    "Batch load failed, rejecting every task in the batch"
                );
                for TaskEntry { settler, .. } in entries {
                    settler.reject(TaskError::BatchFailed(error.clone()));
                }
            }
        }
    }
}

impl<K, V, E, L> Drop for InFlightBatch<K, V, E, L>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        warn!(
            batch_size = self.entries.len(),
            "Batch dropped before its load finished, abandoning its tasks"
        );
        self.inner.release(&self.entries);
    }
}

#[cfg(test)]
#[path = "batcher_tests.rs"]
mod tests;
