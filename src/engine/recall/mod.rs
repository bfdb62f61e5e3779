// SPDX-License-Identifier: MIT

//! Answer recall: auto-filling a field from other fields' values
//!
//! This module provides:
//! - `Template` - parsing of `{{fieldId}}` templates and function calls
//! - `FunctionRegistry` / `RecallFunction` - named formatting functions
//! - `RecallResolver` - resolves a field's recall block against values

mod functions;
mod template;

pub use functions::{FunctionRegistry, RecallFunction};
pub use template::{Segment, Template};

use crate::form::config::EngineConfig;
use crate::form::error::ConfigurationError;
use crate::form::field::{AnswerRecall, RecallMode};
use crate::form::response::{ResponseValue, ValueLookup};

/// Resolves recall blocks with a fixed config and function set
pub struct RecallResolver<'a> {
    config: &'a EngineConfig,
    functions: &'a FunctionRegistry,
}

impl<'a> RecallResolver<'a> {
    pub fn new(config: &'a EngineConfig, functions: &'a FunctionRegistry) -> Self {
        Self { config, functions }
    }

    /// The recalled value, or `None` when recall doesn't apply
    ///
    /// Recall doesn't apply when it is disabled, when the direct source has
    /// no value, or when every field a template references is absent.
    pub fn resolve(
        &self,
        recall: &AnswerRecall,
        values: &dyn ValueLookup,
    ) -> Result<Option<ResponseValue>, ConfigurationError> {
        if !recall.enabled {
            return Ok(None);
        }
        match recall.mode() {
            None => Err(ConfigurationError::EmptyRecall),
            Some(RecallMode::Direct(source)) => {
                let value = values.lookup(source);
                Ok((!value.is_absent()).then(|| value.clone()))
            }
            Some(RecallMode::Template(template)) => Ok(self
                .render(&Template::parse(template), values)?
                .map(ResponseValue::String)),
        }
    }

    /// Substitute tokens and apply functions
    pub fn render(
        &self,
        template: &Template,
        values: &dyn ValueLookup,
    ) -> Result<Option<String>, ConfigurationError> {
        template.check(self.functions)?;

        let mut out = String::new();
        let mut referenced = false;
        let mut present = false;

        for segment in template.segments() {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Token(field) => {
                    let value = values.lookup(field);
                    referenced = true;
                    present |= !value.is_absent();
                    out.push_str(&value.join(&self.config.join_separator));
                }
                Segment::Call {
                    function,
                    field,
                    argument,
                } => {
                    let value = values.lookup(field);
                    referenced = true;
                    present |= !value.is_absent();
                    let f = self
                        .functions
                        .get(function)
                        .ok_or_else(|| ConfigurationError::unknown_function(function.as_str()))?;
                    out.push_str(&f.apply(value, argument.as_deref(), self.config));
                }
                Segment::Malformed(body) => {
                    return Err(ConfigurationError::MalformedCall(body.clone()));
                }
            }
        }

        if referenced && !present {
            return Ok(None);
        }
        Ok(Some(out))
    }
}
