// SPDX-License-Identifier: MIT

//! Form loader - YAML/JSON file loading and parsing
//!
//! This module handles loading form documents and response maps from disk.

use super::error::FormError;
use super::field::FormField;
use super::normalizer::normalize_form;
use super::response::ResponseMap;
use super::types::FormDefinition;
use std::fs;
use std::path::Path;

/// Loads form definitions and responses from files
pub struct FormLoader;

impl FormLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a form document; `.json` files parse as JSON, anything else as YAML
    pub fn load_form<P: AsRef<Path>>(&self, path: P) -> Result<FormDefinition, FormError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        if is_json(path) {
            Self::parse_json(&content)
        } else {
            Self::parse_yaml(&content)
        }
    }

    /// Load a form document and normalize it into display-ordered fields
    pub fn load_fields<P: AsRef<Path>>(&self, path: P) -> Result<Vec<FormField>, FormError> {
        let def = self.load_form(path)?;
        log::debug!("Loaded form '{}' with {} fields", def.title, def.fields.len());
        normalize_form(&def)
    }

    /// Load a response map from a JSON or YAML object
    pub fn load_responses<P: AsRef<Path>>(&self, path: P) -> Result<ResponseMap, FormError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let value: serde_json::Value = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        if !value.is_object() {
            return Err(FormError::config(format!(
                "Responses in {} must be an object keyed by field id",
                path.display()
            )));
        }
        Ok(ResponseMap::from_json(&value))
    }

    /// Parse a form document from a YAML string
    pub fn parse_yaml(content: &str) -> Result<FormDefinition, FormError> {
        let def: FormDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }

    /// Parse a form document from a JSON string
    pub fn parse_json(content: &str) -> Result<FormDefinition, FormError> {
        let def: FormDefinition = serde_json::from_str(content)?;
        Ok(def)
    }
}

impl Default for FormLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
