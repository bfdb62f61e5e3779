// SPDX-License-Identifier: MIT

//! Logic aggregation: combines condition results and applies the action

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::condition::evaluate_condition;
use crate::form::error::ConfigurationError;
use crate::form::field::{Combinator, ConditionalLogic, FormField, LogicAction};
use crate::form::response::ValueLookup;

/// Evaluate every condition and combine the results
///
/// AND over zero conditions fires; OR over zero conditions does not.
pub fn evaluate_logic(
    logic: &ConditionalLogic,
    values: &dyn ValueLookup,
) -> Result<bool, ConfigurationError> {
    let results = logic
        .conditions
        .iter()
        .map(|c| evaluate_condition(c, values))
        .collect::<Result<Vec<bool>, _>>()?;

    Ok(match logic.combinator {
        Combinator::And => results.iter().all(|r| *r),
        Combinator::Or => results.iter().any(|r| *r),
    })
}

/// Visibility and requirement of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOutcome {
    pub visible: bool,
    pub required: bool,
}

impl FieldOutcome {
    /// Outcome for a field without logic, or whose logic is broken
    pub fn static_for(field: &FormField) -> Self {
        Self {
            visible: true,
            required: field.required,
        }
    }
}

/// Apply a field's logic block, if any
pub fn apply_logic(
    field: &FormField,
    values: &dyn ValueLookup,
) -> Result<FieldOutcome, ConfigurationError> {
    let Some(logic) = &field.conditional_logic else {
        return Ok(FieldOutcome::static_for(field));
    };

    let fired = evaluate_logic(logic, values)?;
    Ok(match logic.action {
        LogicAction::Show => FieldOutcome {
            visible: fired,
            required: field.required,
        },
        LogicAction::Hide => FieldOutcome {
            visible: !fired,
            required: field.required,
        },
        LogicAction::Require => FieldOutcome {
            visible: true,
            required: fired || field.required,
        },
    })
}

/// Visibility sets over a whole field list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Visibility {
    /// Visible field ids in display order
    pub visible: Vec<String>,
    /// Hidden field ids in display order
    pub hidden: Vec<String>,
    /// Visible fields that must be answered
    pub required: Vec<String>,
    /// Hidden field id -> next field to show, `None` at the end of the form
    pub skip_targets: BTreeMap<String, Option<String>>,
}

impl Visibility {
    /// Record one field's outcome; call in display order
    pub fn record(&mut self, field: &FormField, outcome: FieldOutcome) {
        if outcome.visible {
            self.visible.push(field.id.clone());
            if outcome.required {
                self.required.push(field.id.clone());
            }
        } else {
            self.hidden.push(field.id.clone());
        }
    }

    /// Compute skip targets once every field has been recorded
    ///
    /// A hidden field skips to its `skip_to` target when that target is
    /// visible and declared later, otherwise to the next visible field.
    pub fn finish(mut self, fields: &[FormField]) -> Self {
        let visible: HashSet<&str> = self.visible.iter().map(String::as_str).collect();
        let hidden: HashSet<&str> = self.hidden.iter().map(String::as_str).collect();
        let mut targets = BTreeMap::new();

        for (position, field) in fields.iter().enumerate() {
            if !hidden.contains(field.id.as_str()) || targets.contains_key(&field.id) {
                continue;
            }
            let later = &fields[position + 1..];
            let explicit = field
                .conditional_logic
                .as_ref()
                .and_then(|l| l.skip_to.as_deref())
                .filter(|t| visible.contains(t) && later.iter().any(|f| f.id == *t));
            let target = explicit.map(str::to_string).or_else(|| {
                later
                    .iter()
                    .find(|f| visible.contains(f.id.as_str()))
                    .map(|f| f.id.clone())
            });
            targets.insert(field.id.clone(), target);
        }

        self.skip_targets = targets;
        self
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.iter().any(|v| v == id)
    }
}

/// Evaluate visibility for every field against a fixed set of values
///
/// Returns the visibility sets plus any per-field configuration errors;
/// fields with broken logic stay visible with their static required flag.
pub fn evaluate_visibility(
    fields: &[FormField],
    values: &dyn ValueLookup,
) -> (Visibility, Vec<(String, ConfigurationError)>) {
    let mut visibility = Visibility::default();
    let mut errors = Vec::new();

    for field in fields {
        let outcome = apply_logic(field, values).unwrap_or_else(|e| {
            errors.push((field.id.clone(), e));
            FieldOutcome::static_for(field)
        });
        visibility.record(field, outcome);
    }

    (visibility.finish(fields), errors)
}
