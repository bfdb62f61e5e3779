// SPDX-License-Identifier: MIT

//! Dependency extraction over logic and recall configuration

use std::collections::BTreeSet;

use super::index::FieldIndex;
use super::recall::Template;
use crate::form::field::{FormField, RecallMode};

/// Other field ids this field's logic or recall reads
pub fn field_dependencies(field: &FormField) -> BTreeSet<String> {
    let mut deps: BTreeSet<String> = logic_references(field)
        .into_iter()
        .chain(recall_references(field))
        .collect();
    deps.remove(&field.id);
    deps
}

/// Source fields of the logic block's conditions
pub fn logic_references(field: &FormField) -> Vec<String> {
    field
        .conditional_logic
        .iter()
        .flat_map(|l| l.conditions.iter())
        .map(|c| c.field.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

/// Fields the recall block reads, whether or not it is enabled
pub fn recall_references(field: &FormField) -> Vec<String> {
    match field.answer_recall.as_ref().and_then(|r| r.mode()) {
        Some(RecallMode::Direct(source)) => vec![source.to_string()],
        Some(RecallMode::Template(template)) => Template::parse(template)
            .references()
            .into_iter()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect(),
        None => vec![],
    }
}

/// A reference from one field to another declared after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardReference {
    pub field: String,
    pub references: String,
}

/// Every reference pointing at a later field, in display order
pub fn forward_references(index: &FieldIndex<'_>) -> Vec<ForwardReference> {
    index
        .fields()
        .iter()
        .enumerate()
        .filter(|(position, _)| index.is_canonical(*position))
        .flat_map(|(_, field)| {
            field_dependencies(field)
                .into_iter()
                .filter(|dep| index.is_forward(&field.id, dep))
                .map(|dep| ForwardReference {
                    field: field.id.clone(),
                    references: dep,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
