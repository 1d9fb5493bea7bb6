//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional; anything left out falls back to
/// [`defaults`](super::defaults).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Batcher configuration section
    #[serde(default)]
    pub batcher: BatcherSection,
}

/// Batcher configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatcherSection {
    /// Quiet period in milliseconds
    pub delay_ms: Option<u64>,

    /// Window ceiling in milliseconds
    pub max_wait_ms: Option<u64>,

    /// Additional operation name for `add_task`
    pub rename_add_task_to: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Task Batcher Configuration File

[batcher]
# Quiet period in milliseconds: a window fires once no new key has arrived
# for this long (default: 50)
delay_ms = 50

# Ceiling in milliseconds on how long a window stays open, measured from its
# first key (default: 250)
max_wait_ms = 250

# Additional operation name for add_task
# Must be an identifier and must not be "add_task"
# rename_add_task_to = "load"
"#
    .to_string()
}
