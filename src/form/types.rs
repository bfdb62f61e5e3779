// SPDX-License-Identifier: MIT

//! Document types for form files
//!
//! A form file carries field definitions that may still use the
//! `show_when` / `hide_when` / `require_when` shorthand. `normalize_form`
//! turns them into plain `FormField`s.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::field::FormField;

/// Top-level form document
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct FormDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// A field as written in a form document
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct FieldDefinition {
    #[serde(flatten)]
    pub field: FormField,
    /// Shorthand for a `show` logic block, e.g. `plan == 'pro'`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_when: Option<String>,
    /// Shorthand for a `hide` logic block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_when: Option<String>,
    /// Shorthand for a `require` logic block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_when: Option<String>,
}

impl From<FormField> for FieldDefinition {
    fn from(field: FormField) -> Self {
        Self {
            field,
            show_when: None,
            hide_when: None,
            require_when: None,
        }
    }
}
