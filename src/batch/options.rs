//! Batcher construction options.

use std::time::Duration;

use super::DebouncePolicy;

/// Options recognized by [`Batcher`](super::Batcher).
///
/// # Defaults
///
/// - `delay`: 50 milliseconds
/// - `max_wait`: 250 milliseconds
/// - no alias for `add_task`
///
/// # Example
///
/// ```
/// use task_batcher::batch::BatchOptions;
/// use std::time::Duration;
///
/// let options = BatchOptions::new()
///     .with_delay(Duration::from_millis(10))
///     .with_max_wait(Duration::from_millis(100))
///     .with_add_task_alias("load");
///
/// assert_eq!(options.alias(), Some("load"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchOptions {
    debounce: DebouncePolicy,
    rename_add_task_to: Option<String>,
}

impl BatchOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quiet period a window waits for before firing.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.debounce = DebouncePolicy::new(delay, self.debounce.max_wait());
        self
    }

    /// Sets the ceiling on a window's lifetime.
    #[must_use]
    pub const fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.debounce = DebouncePolicy::new(self.debounce.delay(), max_wait);
        self
    }

    /// Replaces the whole debounce policy.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: DebouncePolicy) -> Self {
        self.debounce = debounce;
        self
    }

    /// Exposes `add_task` under an additional operation name.
    ///
    /// The alias only affects [`Batcher::invoke`](super::Batcher::invoke) and
    /// [`Batcher::operation_names`](super::Batcher::operation_names).
    ///
    /// The builder does not validate the name; configuration files go
    /// through [`ValidatedConfig`](crate::config::ValidatedConfig), which
    /// rejects empty names, non-identifiers and `add_task` itself.
    #[must_use]
    pub fn with_add_task_alias(mut self, alias: impl Into<String>) -> Self {
        self.rename_add_task_to = Some(alias.into());
        self
    }

    /// Returns the debounce policy.
    #[must_use]
    pub const fn debounce(&self) -> DebouncePolicy {
        self.debounce
    }

    /// Returns the quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.debounce.delay()
    }

    /// Returns the window ceiling.
    #[must_use]
    pub const fn max_wait(&self) -> Duration {
        self.debounce.max_wait()
    }

    /// Returns the alternate name of `add_task`, if configured.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.rename_add_task_to.as_deref()
    }
}
