//! Default values for configuration options.
//!
//! The batcher owns its defaults; these accessors expose them to the
//! configuration layer so a missing key and an absent file agree.

use std::time::Duration;

use crate::batch::DebouncePolicy;

/// Default quiet period (50 milliseconds).
#[must_use]
pub const fn delay() -> Duration {
    DebouncePolicy::DEFAULT_DELAY
}

/// Default window ceiling (250 milliseconds).
#[must_use]
pub const fn max_wait() -> Duration {
    DebouncePolicy::DEFAULT_MAX_WAIT
}
