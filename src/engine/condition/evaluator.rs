//! Condition evaluator

use crate::form::error::ConfigurationError;
use crate::form::field::{Condition, Operator};
use crate::form::response::{parse_number, ResponseValue, ValueLookup};

/// Evaluate a single condition against the current values
///
/// Unknown source fields read as absent. An unknown operator is a
/// configuration error rather than a silent pass.
pub fn evaluate_condition(
    condition: &Condition,
    values: &dyn ValueLookup,
) -> Result<bool, ConfigurationError> {
    let value = values.lookup(&condition.field);
    let literal = condition.value.as_deref().unwrap_or("");

    let fired = match &condition.operator {
        Operator::Equals => values_equal(value, literal),
        Operator::NotEquals => !values_equal(value, literal),
        Operator::Contains => check_contains(value, literal),
        Operator::NotContains => !check_contains(value, literal),
        Operator::GreaterThan => compare_numbers(value, literal, |a, b| a > b),
        Operator::LessThan => compare_numbers(value, literal, |a, b| a < b),
        Operator::IsEmpty => value.is_empty(),
        Operator::IsNotEmpty => !value.is_empty(),
        Operator::Unknown(name) => return Err(ConfigurationError::UnknownOperator(name.clone())),
    };
    Ok(fired)
}

fn values_equal(value: &ResponseValue, literal: &str) -> bool {
    value.to_text().trim() == literal.trim()
}

fn compare_numbers<F>(value: &ResponseValue, literal: &str, cmp: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (value.as_number(), parse_number(literal)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

fn check_contains(value: &ResponseValue, literal: &str) -> bool {
    match value {
        ResponseValue::Absent => false,
        // String contains substring
        ResponseValue::String(s) => s.contains(literal),
        // Array contains value
        ResponseValue::StringArray(items) => items.iter().any(|item| item.trim() == literal.trim()),
        ResponseValue::FileRef(file) => file.name.contains(literal),
    }
}
