//! Batching layer: coalesces per-key requests into bulk loads.
//!
//! This module provides:
//! - The batching engine ([`Batcher`])
//! - The bulk operation contract ([`BatchLoader`], [`BatchResults`])
//! - Per-key result handles ([`TaskHandle`], [`TaskResult`])
//! - Window timing ([`DebouncePolicy`]) and construction options ([`BatchOptions`])
//! - Error handling ([`TaskError`], [`BatchError`])
//!
//! # Windows
//!
//! The first key after an idle period opens a window. Each new key restarts
//! the `delay` quiet period, and the window closes when the quiet period
//! elapses or `max_wait` after it opened, whichever comes first. Closing the
//! window drains the queue into one [`BatchLoader::load`] call.
//!
//! # Operation names
//!
//! `add_task` can be exposed under one additional name, fixed at construction
//! with [`BatchOptions::with_add_task_alias`] or the `rename_add_task_to`
//! config key. The alias is reachable only by name: [`Batcher::invoke`]
//! dispatches on [`ADD_TASK`] or the alias, and [`Batcher::operation_names`]
//! lists the names a caller may pass to it. No method is added to
//! [`Batcher`] for the alias; Rust callers use [`Batcher::add_task`] directly.
//!
//! ```
//! use task_batcher::batch::{ADD_TASK, BatchOptions, Batcher, LoadResult};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let batcher = Batcher::new(
//!     |keys: Vec<u32>| async move {
//!         let results: LoadResult<u32, u32, String> =
//!             Ok(keys.iter().map(|k| Ok(k + 1)).collect::<Vec<_>>().into());
//!         results
//!     },
//!     BatchOptions::default().with_add_task_alias("load"),
//! );
//!
//! assert_eq!(batcher.operation_names().collect::<Vec<_>>(), [ADD_TASK, "load"]);
//! assert_eq!(batcher.invoke("load", 1).unwrap().await, Ok(Some(2)));
//! assert!(batcher.invoke("fetch", 1).is_err());
//! # }
//! ```

mod batcher;
mod debounce;
mod error;
mod handle;
mod loader;
mod options;
mod queue;
mod results;

#[cfg(test)]
mod debounce_tests;

pub use batcher::{ADD_TASK, Batcher};
pub use debounce::DebouncePolicy;
pub use error::{BatchError, TaskError};
pub use handle::{TaskHandle, TaskResult};
pub use loader::{BatchLoader, LoadResult};
pub use options::BatchOptions;
pub use results::BatchResults;
