// SPDX-License-Identifier: MIT

//! Engine configuration
//!
//! Settings are passed into the evaluator explicitly. `from_env` is only a
//! convenience for the binary; the engine itself never reads the process
//! environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::error::FormError;

/// Overrides `join_separator`
pub const ENV_JOIN_SEPARATOR: &str = "FORMLOGIC_JOIN_SEPARATOR";
/// Overrides `date_output_format`
pub const ENV_DATE_FORMAT: &str = "FORMLOGIC_DATE_FORMAT";

/// Formatting settings used by answer recall
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Separator for array values rendered into templates and by `join`
    pub join_separator: String,
    /// chrono format used by `date_format` when no format argument is given
    pub date_output_format: String,
    /// chrono formats tried, in order, when parsing a date that is not RFC 3339
    pub date_input_formats: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            join_separator: ", ".to_string(),
            date_output_format: "%B %-d, %Y".to_string(),
            date_input_formats: vec![
                "%Y-%m-%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%d.%m.%Y".to_string(),
            ],
        }
    }
}

impl EngineConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(separator) = std::env::var(ENV_JOIN_SEPARATOR) {
            config.join_separator = separator;
        }
        if let Ok(format) = std::env::var(ENV_DATE_FORMAT) {
            if !format.trim().is_empty() {
                config.date_output_format = format;
            }
        }
        config
    }

    /// Load a configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FormError> {
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    pub fn parse_yaml(content: &str) -> Result<Self, FormError> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        if config.date_output_format.trim().is_empty() {
            return Err(FormError::config("date_output_format must not be empty"));
        }
        Ok(config)
    }
}
