// SPDX-License-Identifier: MIT

//! Evaluation driver: one ordered pass over the field list
//!
//! For each field in display order the driver applies its logic, then its
//! recall, and folds the field's effective value into an accumulator.
//! Recall only ever reads that accumulator, so it sees fields declared
//! earlier and never the field itself or anything after it. Logic reads
//! the submitted responses overlaid with values recalled so far.

use serde::Serialize;
use std::collections::BTreeMap;

use super::index::FieldIndex;
use super::logic::{apply_logic, FieldOutcome, Visibility};
use super::recall::{FunctionRegistry, RecallResolver};
use super::report::{IssueKind, ValidationReport};
use super::validate::validate_with;
use crate::form::config::EngineConfig;
use crate::form::field::FormField;
use crate::form::response::{Overlay, ResponseMap, ResponseValue};

/// Everything a preview or submission needs to know about a form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub visible: Vec<String>,
    pub hidden: Vec<String>,
    pub required: Vec<String>,
    pub skip_targets: BTreeMap<String, Option<String>>,
    /// Fields with enabled recall -> recalled value, `null` when inapplicable
    pub recalled: BTreeMap<String, Option<ResponseValue>>,
    pub report: ValidationReport,
}

impl SimulationResult {
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.iter().any(|v| v == id)
    }

    pub fn is_required(&self, id: &str) -> bool {
        self.required.iter().any(|v| v == id)
    }

    /// The recalled value for a field, if it produced one
    pub fn recalled_value(&self, id: &str) -> Option<&ResponseValue> {
        self.recalled.get(id).and_then(Option::as_ref)
    }
}

/// Runs the evaluation pipeline with a fixed configuration
pub struct Evaluator<'a> {
    config: EngineConfig,
    functions: &'a FunctionRegistry,
}

impl Evaluator<'static> {
    /// Evaluator using the built-in recall functions
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            functions: FunctionRegistry::builtin(),
        }
    }
}

impl<'a> Evaluator<'a> {
    pub fn with_functions(config: EngineConfig, functions: &'a FunctionRegistry) -> Self {
        Self { config, functions }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Static validation with this evaluator's function set
    pub fn validate(&self, fields: &[FormField]) -> ValidationReport {
        validate_with(fields, self.functions)
    }

    /// Evaluate visibility, requirement, skip targets and recall
    ///
    /// Configuration errors are reported per field and never stop the pass;
    /// a field with broken logic stays visible with its static required
    /// flag, and a field with broken recall recalls nothing.
    pub fn evaluate(&self, fields: &[FormField], responses: &ResponseMap) -> SimulationResult {
        let index = FieldIndex::build(fields);
        let resolver = RecallResolver::new(&self.config, self.functions);
        let mut report = self.validate(fields);

        let mut visibility = Visibility::default();
        let mut recalled = BTreeMap::new();
        // values recalled so far, read by logic on top of the responses
        let mut recalled_so_far = ResponseMap::new();
        // effective values of fields already evaluated, read by recall
        let mut scope = ResponseMap::new();

        for (position, field) in fields.iter().enumerate() {
            if !index.is_canonical(position) {
                log::debug!("Skipping duplicate field '{}'", field.id);
                continue;
            }

            let outcome = {
                let merged = Overlay::new(&recalled_so_far, responses);
                apply_logic(field, &merged).unwrap_or_else(|e| {
                    log::warn!("Logic on field '{}' is misconfigured: {}", field.id, e);
                    report.configuration(&field.id, &e);
                    FieldOutcome::static_for(field)
                })
            };
            visibility.record(field, outcome);

            let mut effective = responses.get(&field.id).clone();
            if let Some(recall) = field.answer_recall.as_ref().filter(|r| r.enabled) {
                let value = resolver.resolve(recall, &scope).unwrap_or_else(|e| {
                    log::warn!("Recall on field '{}' is misconfigured: {}", field.id, e);
                    report.configuration(&field.id, &e);
                    None
                });
                if let Some(v) = &value {
                    recalled_so_far.insert(field.id.clone(), v.clone());
                    effective = v.clone();
                }
                recalled.insert(field.id.clone(), value);
            }

            log::debug!(
                "Field '{}': visible={} required={}",
                field.id,
                outcome.visible,
                outcome.required
            );
            scope.insert(field.id.clone(), effective);
        }

        for id in responses.keys() {
            if !index.contains(id) {
                report.warning(
                    id,
                    IssueKind::MissingReference,
                    format!("Response for unknown field '{}' was ignored", id),
                );
            }
        }

        let visibility = visibility.finish(fields);
        SimulationResult {
            visible: visibility.visible,
            hidden: visibility.hidden,
            required: visibility.required,
            skip_targets: visibility.skip_targets,
            recalled,
            report,
        }
    }
}

impl Default for Evaluator<'static> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Evaluate with default configuration and built-in functions
pub fn evaluate_form(fields: &[FormField], responses: &ResponseMap) -> SimulationResult {
    Evaluator::default().evaluate(fields, responses)
}
