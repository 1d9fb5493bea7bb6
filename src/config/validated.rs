//! Validated configuration built from the TOML source.
//!
//! This module contains the final, validated configuration handed to the
//! batcher. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::batch::{ADD_TASK, BatchOptions, DebouncePolicy};

use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_toml`] on an already parsed file, or
/// [`load`](Self::load) / [`parse`](Self::parse) to do both steps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatedConfig {
    /// Options for [`Batcher`](crate::batch::Batcher)
    pub options: BatchOptions,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ delay: {}ms, max_wait: {}ms, alias: {} }}",
            self.options.delay().as_millis(),
            self.options.max_wait().as_millis(),
            self.options.alias().unwrap_or("none"),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from a parsed TOML config.
    ///
    /// Missing values fall back to [`defaults`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAlias`] if `rename_add_task_to` is not a
    /// usable operation name.
    pub fn from_toml(toml: &TomlConfig) -> Result<Self, ConfigError> {
        let section = &toml.batcher;

        let delay = section
            .delay_ms
            .map_or_else(defaults::delay, Duration::from_millis);
        let max_wait = section
            .max_wait_ms
            .map_or_else(defaults::max_wait, Duration::from_millis);

        let mut options = BatchOptions::new().with_debounce(DebouncePolicy::new(delay, max_wait));
        if let Some(alias) = &section.rename_add_task_to {
            validate_alias(alias)?;
            options = options.with_add_task_alias(alias.as_str());
        }

        Ok(Self { options })
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let toml = TomlConfig::load(path)?;
        Self::from_toml(&toml)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let toml = TomlConfig::parse(content)?;
        Self::from_toml(&toml)
    }
}

/// Checks that `alias` can serve as an operation name.
fn validate_alias(alias: &str) -> Result<(), ConfigError> {
    let mut chars = alias.chars();
    let Some(first) = chars.next() else {
        return Err(ConfigError::invalid_alias(alias, "must not be empty"));
    };

    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(ConfigError::invalid_alias(
            alias,
            "must start with an ASCII letter or '_'",
        ));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::invalid_alias(
            alias,
            "may only contain ASCII letters, digits and '_'",
        ));
    }
    if alias == ADD_TASK {
        return Err(ConfigError::invalid_alias(
            alias,
            "must differ from the operation it renames",
        ));
    }

    Ok(())
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
