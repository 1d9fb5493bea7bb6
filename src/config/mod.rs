//! Configuration layer for the batcher.
//!
//! This module provides:
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Each option comes from the `[batcher]` table if present, otherwise from
//! the built-in defaults. A missing file section is the same as an empty one.
//!
//! # Units
//!
//! Durations are whole milliseconds (`delay_ms`, `max_wait_ms`). Zero is
//! accepted for both: a zero `delay` fires on the next timer tick, and a zero
//! `max_wait` makes every second request in a window fire immediately.

pub mod defaults;
mod error;
mod toml;
mod validated;


pub use error::ConfigError;
pub use toml::{BatcherSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
