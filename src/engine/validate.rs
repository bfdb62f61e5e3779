// SPDX-License-Identifier: MIT

//! Static validation of a form's logic and recall configuration
//!
//! Runs without responses, so it catches author mistakes before any
//! submission reaches the evaluator.

use super::dependencies::{forward_references, logic_references, recall_references};
use super::index::FieldIndex;
use super::recall::{FunctionRegistry, Template};
use super::report::{IssueKind, ValidationReport};
use crate::form::error::ConfigurationError;
use crate::form::field::{FormField, Operator, RecallMode};

/// Validate with the built-in recall functions
pub fn validate_form(fields: &[FormField]) -> ValidationReport {
    validate_with(fields, FunctionRegistry::builtin())
}

/// Validate against a specific function registry
pub fn validate_with(fields: &[FormField], functions: &FunctionRegistry) -> ValidationReport {
    let index = FieldIndex::build(fields);
    let mut report = ValidationReport::new();

    for dup in index.duplicates() {
        report.error(
            &dup.id,
            IssueKind::DuplicateField,
            format!("Field id '{}' is declared more than once", dup.id),
        );
    }

    for (position, field) in fields.iter().enumerate() {
        if !index.is_canonical(position) {
            continue;
        }
        check_options(field, &mut report);
        check_logic(field, &index, &mut report);
        check_recall(field, functions, &mut report);
        check_references(field, &index, &mut report);
    }

    for forward in forward_references(&index) {
        report.warning(
            &forward.field,
            IssueKind::ForwardReference,
            format!(
                "References '{}', which is declared later and reads as empty here",
                forward.references
            ),
        );
    }

    log::debug!(
        "Validated {} fields: {} errors, {} warnings",
        fields.len(),
        report.errors.len(),
        report.warnings.len()
    );
    report
}

fn check_options(field: &FormField, report: &mut ValidationReport) {
    if field.field_type.is_choice() && field.options.is_empty() {
        report.warning(
            &field.id,
            IssueKind::MissingOptions,
            "Choice field has no options",
        );
    }
}

fn check_logic(field: &FormField, index: &FieldIndex<'_>, report: &mut ValidationReport) {
    let Some(logic) = &field.conditional_logic else {
        return;
    };

    for condition in &logic.conditions {
        match &condition.operator {
            Operator::Unknown(name) => {
                report.configuration(&field.id, &ConfigurationError::UnknownOperator(name.clone()));
            }
            op if op.needs_value() && condition.value.is_none() => {
                report.warning(
                    &field.id,
                    IssueKind::MissingLiteral,
                    format!("Condition on '{}' uses '{}' without a value", condition.field, op),
                );
            }
            _ => {}
        }
    }

    if let Some(target) = &logic.skip_to {
        let valid = index
            .position(target)
            .zip(index.position(&field.id))
            .is_some_and(|(t, own)| t > own);
        if !valid {
            report.warning(
                &field.id,
                IssueKind::InvalidSkipTarget,
                format!("Skip target '{}' is not a later field", target),
            );
        }
    }
}

fn check_recall(field: &FormField, functions: &FunctionRegistry, report: &mut ValidationReport) {
    let Some(recall) = field.answer_recall.as_ref().filter(|r| r.enabled) else {
        return;
    };

    let result = match recall.mode() {
        None => Err(ConfigurationError::EmptyRecall),
        Some(RecallMode::Direct(_)) => Ok(()),
        Some(RecallMode::Template(template)) => Template::parse(template).check(functions),
    };
    if let Err(err) = result {
        report.configuration(&field.id, &err);
    }

    if recall_references(field).iter().any(|r| *r == field.id) {
        report.warning(
            &field.id,
            IssueKind::SelfReference,
            "Answer recall reads the field's own value, which is never available",
        );
    }
}

fn check_references(field: &FormField, index: &FieldIndex<'_>, report: &mut ValidationReport) {
    for reference in logic_references(field)
        .into_iter()
        .chain(recall_references(field))
    {
        if !index.contains(&reference) {
            report.warning(
                &field.id,
                IssueKind::MissingReference,
                format!("References unknown field '{}'", reference),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::field::{
        AnswerRecall, Combinator, Condition, ConditionalLogic, FieldType, LogicAction,
    };

    fn logic(conditions: Vec<Condition>) -> ConditionalLogic {
        ConditionalLogic::new(LogicAction::Show, Combinator::And, conditions)
    }

    fn kinds(report: &ValidationReport) -> Vec<IssueKind> {
        report
            .errors
            .iter()
            .chain(report.warnings.iter())
            .map(|i| i.kind)
            .collect()
    }

    #[test]
    fn test_clean_form() {
        let fields = vec![
            FormField::new("plan", FieldType::Radio).with_options(&["free", "pro"]),
            FormField::new("seats", FieldType::Number).with_logic(logic(vec![Condition::new(
                "plan",
                Operator::Equals,
                Some("pro"),
            )])),
            FormField::new("summary", FieldType::Text)
                .with_recall(AnswerRecall::template("{{plan}} x {{seats}}")),
        ];

        let report = validate_form(&fields);
        assert!(report.valid, "{:?}", report);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_unknown_operator_and_function() {
        let fields = vec![
            FormField::new("a", FieldType::Text).with_logic(logic(vec![Condition::new(
                "b",
                Operator::from("between"),
                Some("1"),
            )])),
            FormField::new("b", FieldType::Text)
                .with_recall(AnswerRecall::template("foobar({{a}})")),
        ];

        let report = validate_form(&fields);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].field, "a");
        assert_eq!(report.errors[1].message, "Unknown function: foobar");
    }

    #[test]
    fn test_unclosed_call_is_error() {
        let fields = vec![
            FormField::new("a", FieldType::Text),
            FormField::new("b", FieldType::Text)
                .with_recall(AnswerRecall::template("foobar({{a}}")),
        ];

        let report = validate_form(&fields);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].field, "b");
        assert_eq!(
            report.errors[0].message,
            "Malformed function call in template: foobar({{a}}"
        );
    }

    #[test]
    fn test_reference_warnings() {
        let fields = vec![
            FormField::new("a", FieldType::Text)
                .with_recall(AnswerRecall::template("{{b}} {{ghost}}")),
            FormField::new("b", FieldType::Text),
            FormField::new("c", FieldType::Text).with_recall(AnswerRecall::direct("c")),
        ];

        let report = validate_form(&fields);
        assert!(report.valid);
        let found = kinds(&report);
        assert!(found.contains(&IssueKind::MissingReference));
        assert!(found.contains(&IssueKind::ForwardReference));
        assert!(found.contains(&IssueKind::SelfReference));
    }

    #[test]
    fn test_duplicates_and_options() {
        let fields = vec![
            FormField::new("a", FieldType::Dropdown),
            FormField::new("a", FieldType::Text),
        ];

        let report = validate_form(&fields);
        let found = kinds(&report);
        assert_eq!(found, vec![IssueKind::DuplicateField, IssueKind::MissingOptions]);
    }

    #[test]
    fn test_missing_literal_and_skip_target() {
        let fields = vec![
            FormField::new("a", FieldType::Text),
            FormField::new("b", FieldType::Text).with_logic(
                logic(vec![Condition::new("a", Operator::Equals, None)]).with_skip_to("a"),
            ),
        ];

        let found = kinds(&validate_form(&fields));
        assert!(found.contains(&IssueKind::MissingLiteral));
        assert!(found.contains(&IssueKind::InvalidSkipTarget));
    }

    #[test]
    fn test_disabled_recall_not_checked() {
        let mut recall = AnswerRecall::template("foobar({{x}})");
        recall.enabled = false;
        let fields = vec![
            FormField::new("x", FieldType::Text),
            FormField::new("y", FieldType::Text).with_recall(recall),
        ];
        assert!(validate_form(&fields).valid);
    }

    #[test]
    fn test_empty_recall() {
        let fields = vec![FormField::new("x", FieldType::Text).with_recall(AnswerRecall {
            enabled: true,
            ..Default::default()
        })];
        let report = validate_form(&fields);
        assert_eq!(
            report.errors[0].message,
            ConfigurationError::EmptyRecall.to_string()
        );
    }
}
