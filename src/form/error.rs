// SPDX-License-Identifier: MIT

//! Typed error handling for formlogic-rs
//!
//! `FormError` covers loading and normalizing form documents and is returned
//! to the caller. `ConfigurationError` is a form-author mistake found on a
//! single field; the engine collects it into a validation report and keeps
//! evaluating the remaining fields.

use thiserror::Error;

/// Top-level error type for loading forms and responses
#[derive(Debug, Error)]
pub enum FormError {
    /// Configuration errors (bad engine config file, unsupported document format)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A shorthand `*_when` expression failed to parse
    #[error("Invalid expression on field '{field}': {source}")]
    Expression {
        field: String,
        #[source]
        source: ExpressionError,
    },

    /// A field carries more than one logic declaration
    #[error("Field '{field}' declares more than one conditional logic block")]
    ConflictingLogic { field: String },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Malformed logic or recall configuration on a single field
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("Malformed function call in template: {0}")]
    MalformedCall(String),

    #[error("Answer recall is enabled but has neither a source field nor a template")]
    EmptyRecall,
}

/// Errors from the shorthand condition expression parser
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("Empty expression")]
    Empty,

    #[error("Could not parse condition: {0}")]
    Condition(String),

    #[error("Could not parse literal: {0}")]
    Literal(String),

    #[error("Cannot mix 'and' with 'or' in one expression")]
    MixedCombinators,
}

impl FormError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl ConfigurationError {
    /// Create an unknown function error
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into() }
    }
}
