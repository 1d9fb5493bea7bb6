//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write the configuration file.
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The `add_task` alias is not a usable operation name.
    #[error("Invalid add_task alias '{alias}': {reason}")]
    InvalidAlias {
        /// The rejected alias
        alias: String,
        /// Reason for invalidity
        reason: &'static str,
    },
}

impl ConfigError {
    /// Creates an `InvalidAlias` error.
    #[must_use]
    pub fn invalid_alias(alias: &str, reason: &'static str) -> Self {
        Self::InvalidAlias {
            alias: alias.to_string(),
            reason,
        }
    }
}
