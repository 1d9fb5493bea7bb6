//! Time abstraction for testability.
//!
//! The batcher never reads the runtime clock or spawns sleeps directly. It
//! asks a [`Clock`] for the current instant and a [`Timer`] to run a callback
//! later, so tests can drive batching windows without real waits.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

/// Abstraction over monotonic time.
///
/// # Example
///
/// ```
/// use task_batcher::time::{Clock, TokioClock};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let clock = TokioClock;
/// let earlier = clock.now();
/// assert!(clock.now() >= earlier);
/// # }
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Production clock backed by [`tokio::time::Instant`].
///
/// Follows tokio's paused clock in tests, so `tokio::time::advance` moves it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Callback run by a [`Timer`] once its delay has elapsed.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Schedules callbacks to run after a delay.
///
/// # Contract
///
/// `schedule` must return before the callback can run. The batcher calls it
/// while holding its internal lock, and the callback takes that same lock.
pub trait Timer: Send + Sync {
    /// Runs `callback` once `after` has elapsed, unless the returned handle
    /// is cancelled first.
    fn schedule(&self, after: Duration, callback: TimerCallback) -> TimerHandle;
}

/// Handle to a callback scheduled through a [`Timer`].
///
/// Dropping the handle does not cancel the callback; call [`cancel`](Self::cancel).
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl TimerHandle {
    /// Creates a handle that runs `cancel` when cancelled.
    #[must_use]
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Creates a handle with nothing to cancel.
    #[must_use]
    pub const fn detached() -> Self {
        Self { cancel: None }
    }

    /// Cancels the scheduled callback if it has not run yet.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// Production timer that spawns a tokio task per scheduled callback.
///
/// Cancelling aborts the task. Must be used from inside a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn schedule(&self, after: Duration, callback: TimerCallback) -> TimerHandle {
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            callback();
        });
        TimerHandle::new(move || task.abort())
    }
}
