// SPDX-License-Identifier: MIT

//! Form document model
//!
//! This module provides:
//! - `FormField` and its logic/recall blocks - the stored field definitions
//! - `ResponseValue` / `ResponseMap` - the values being evaluated
//! - `FormLoader` - YAML/JSON loading with shorthand normalization
//! - `EngineConfig` - formatting settings injected into the evaluator

pub mod config;
pub mod error;
pub mod field;
pub mod loader;
mod normalizer;
pub mod response;
pub mod types;

pub use config::EngineConfig;
pub use error::{ConfigurationError, ExpressionError, FormError};
pub use field::{
    AnswerRecall, Combinator, Condition, ConditionalLogic, FieldType, FormField, LogicAction,
    Operator, RecallMode,
};
pub use loader::FormLoader;
pub use normalizer::normalize_form;
pub use response::{FileRef, Overlay, ResponseMap, ResponseValue, ValueLookup};
pub use types::{FieldDefinition, FormDefinition};
