//! Debounce policy and per-window timing state.

use std::time::Duration;

use tokio::time::Instant;

use crate::time::TimerHandle;

/// Timing policy deciding when a batch window fires.
///
/// A window opens with the first key after an idle period. Every further key
/// pushes the fire time out by `delay` (classic debounce), but never past
/// `max_wait` after the window opened.
///
/// # Defaults
///
/// - `delay`: 50 milliseconds
/// - `max_wait`: 250 milliseconds
///
/// `max_wait` shorter than `delay` is accepted. Windows then always close
/// through the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncePolicy {
    delay: Duration,
    max_wait: Duration,
}

impl DebouncePolicy {
    /// Default quiet period (50 milliseconds).
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

    /// Default window ceiling (250 milliseconds).
    pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(250);

    /// Creates a policy with the given quiet period and ceiling.
    #[must_use]
    pub const fn new(delay: Duration, max_wait: Duration) -> Self {
        Self { delay, max_wait }
    }

    /// Returns the quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the window ceiling.
    #[must_use]
    pub const fn max_wait(&self) -> Duration {
        self.max_wait
    }
}

impl Default for DebouncePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY, Self::DEFAULT_MAX_WAIT)
    }
}

/// What the batcher must do after a new key entered the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Schedule a fire `after` from now, tagged with `generation`.
    Arm { after: Duration, generation: u64 },
    /// The ceiling is reached; drain the queue before returning.
    FireNow,
}

/// Mutable timing state of the current batch window.
///
/// Idle when `started_at` is `None`. At most one timer is live; each new arm
/// cancels the previous one and bumps `generation`, so a superseded callback
/// that already started running can recognize itself as stale.
#[derive(Debug)]
pub(crate) struct DebounceWindow {
    policy: DebouncePolicy,
    started_at: Option<Instant>,
    timer: Option<TimerHandle>,
    generation: u64,
}

impl DebounceWindow {
    pub(crate) const fn new(policy: DebouncePolicy) -> Self {
        Self {
            policy,
            started_at: None,
            timer: None,
            generation: 0,
        }
    }

    /// Records a fire request made at `now` and returns the action to take.
    ///
    /// The previous timer, if any, is cancelled in every case.
    pub(crate) fn request(&mut self, now: Instant) -> Decision {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }

        let Some(started_at) = self.started_at else {
            self.started_at = Some(now);
            return self.arm(self.policy.delay.min(self.policy.max_wait));
        };

        let elapsed = now.saturating_duration_since(started_at);
        if elapsed >= self.policy.max_wait {
            self.reset();
            return Decision::FireNow;
        }

        let until_ceiling = self.policy.max_wait - elapsed;
        self.arm(self.policy.delay.min(until_ceiling))
    }

    /// Stores the handle of the timer scheduled for the latest arm.
    ///
    /// A handle for an older generation is cancelled on the spot.
    pub(crate) fn attach(&mut self, generation: u64, timer: TimerHandle) {
        if generation == self.generation && self.started_at.is_some() {
            self.timer = Some(timer);
        } else {
            timer.cancel();
        }
    }

    /// Handles a timer callback. Returns `true` if the window closed and the
    /// queue must be drained, `false` if the callback was superseded.
    pub(crate) fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.started_at.is_none() {
            return false;
        }
        // The firing timer is the one being dropped here; nothing to cancel.
        self.timer = None;
        self.started_at = None;
        true
    }

    pub(crate) const fn is_idle(&self) -> bool {
        self.started_at.is_none()
    }

    pub(crate) const fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    fn arm(&mut self, after: Duration) -> Decision {
        self.generation = self.generation.wrapping_add(1);
        Decision::Arm {
            after,
            generation: self.generation,
        }
    }

    fn reset(&mut self) {
        self.started_at = None;
        self.generation = self.generation.wrapping_add(1);
    }
}
