//! Task Batcher: debounced, de-duplicating request batching.
//!
//! A library that coalesces many per-key asynchronous requests issued in
//! quick succession into fewer calls to a bulk loader, and routes each
//! result back to the caller that asked for it.
//!
//! - [`batch`]: the engine ([`batch::Batcher`]), the loader contract and the
//!   name-based entry point ([`batch::Batcher::invoke`],
//!   [`batch::Batcher::operation_names`]) that honours an `add_task` alias.
//! - [`config`]: TOML configuration producing [`batch::BatchOptions`].
//! - [`time`]: injectable clock and timer.

pub mod batch;
pub mod config;
pub mod time;
