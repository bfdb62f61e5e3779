//! Shorthand condition expression parser
//!
//! Parses expressions like:
//! - `plan == 'pro'`
//! - `age > 18`
//! - `a == 'x' and b > 5`
//! - `tags contains 'vip' or notes is not empty`
//!
//! Expressions are flat: one combinator per expression, no parentheses.

use crate::form::error::ExpressionError;
use crate::form::field::{Combinator, Condition, ConditionalLogic, LogicAction, Operator};

/// Parse an expression string into a logic block with the given action
pub fn parse(input: &str, action: LogicAction) -> Result<ConditionalLogic, ExpressionError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let (combinator, parts) = split_compound(input)?;
    let conditions = parts
        .into_iter()
        .map(parse_comparison)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConditionalLogic::new(action, combinator, conditions))
}

fn split_compound(input: &str) -> Result<(Combinator, Vec<&str>), ExpressionError> {
    // Look for " and " or " or " outside quotes
    let mut parts = Vec::new();
    let mut combinator = None;
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut skip_until = 0;

    for (i, c) in input.char_indices() {
        if i < skip_until {
            continue;
        }
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {
                let rest = &input[i..];
                let found = if rest.starts_with(" and ") {
                    Some((Combinator::And, 5))
                } else if rest.starts_with(" or ") {
                    Some((Combinator::Or, 4))
                } else {
                    None
                };
                if let Some((kind, len)) = found {
                    if combinator.is_some_and(|k| k != kind) {
                        return Err(ExpressionError::MixedCombinators);
                    }
                    combinator = Some(kind);
                    parts.push(&input[start..i]);
                    start = i + len;
                    skip_until = start;
                }
            }
        }
    }
    parts.push(&input[start..]);

    Ok((combinator.unwrap_or_default(), parts))
}

fn parse_comparison(input: &str) -> Result<Condition, ExpressionError> {
    let input = input.trim();

    // Unary forms first
    for (suffix, op) in [
        (" is not empty", Operator::IsNotEmpty),
        (" is empty", Operator::IsEmpty),
    ] {
        if let Some(left) = input.strip_suffix(suffix) {
            return Ok(Condition {
                field: parse_field(left, input)?,
                operator: op,
                value: None,
            });
        }
    }

    // Try operators in order of length (longest first)
    let operators = [
        (" not contains ", Operator::NotContains),
        (" contains ", Operator::Contains),
        ("!=", Operator::NotEquals),
        ("==", Operator::Equals),
        (">", Operator::GreaterThan),
        ("<", Operator::LessThan),
    ];

    for (op_str, op) in operators {
        if let Some(pos) = find_operator(input, op_str) {
            let field = parse_field(&input[..pos], input)?;
            let value = parse_literal(&input[pos + op_str.len()..])?;
            return Ok(Condition {
                field,
                operator: op,
                value: Some(value),
            });
        }
    }

    Err(ExpressionError::Condition(input.to_string()))
}

fn parse_field(left: &str, whole: &str) -> Result<String, ExpressionError> {
    let left = left.trim();
    let valid = !left.is_empty()
        && left
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.');
    if valid {
        Ok(left.to_string())
    } else {
        Err(ExpressionError::Condition(whole.to_string()))
    }
}

fn find_operator(input: &str, op: &str) -> Option<usize> {
    let mut quote: Option<char> = None;

    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if input[i..].starts_with(op) => return Some(i),
            None => {}
        }
    }
    None
}

fn parse_literal(input: &str) -> Result<String, ExpressionError> {
    let input = input.trim();

    // String (single or double quotes)
    if input.len() >= 2
        && ((input.starts_with('\'') && input.ends_with('\''))
            || (input.starts_with('"') && input.ends_with('"')))
    {
        return Ok(input[1..input.len() - 1].to_string());
    }

    // Boolean
    if input == "true" || input == "false" {
        return Ok(input.to_string());
    }

    // Number
    if input.parse::<f64>().is_ok() {
        return Ok(input.to_string());
    }

    Err(ExpressionError::Literal(input.to_string()))
}
