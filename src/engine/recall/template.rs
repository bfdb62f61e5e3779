//! Template parsing for answer recall
//!
//! Recognized forms:
//! - `{{fieldId}}` - the field's value
//! - `uppercase({{fieldId}})` - a function wrapping a token
//! - `{{uppercase(fieldId)}}` - the same call written inside the braces
//! - `date_format({{dob}}, '%d/%m/%Y')` - an optional quoted argument
//!
//! An unterminated `{{` is kept as literal text. A call whose closing `)`
//! is missing is malformed.

use super::functions::FunctionRegistry;
use crate::form::error::ConfigurationError;

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Token(String),
    Call {
        function: String,
        field: String,
        argument: Option<String>,
    },
    /// A `{{...}}` body that looks like a call but doesn't parse
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(input: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = input;

        while let Some(open) = rest.find("{{") {
            let Some(close) = rest[open + 2..].find("}}").map(|c| open + 2 + c) else {
                break;
            };
            let inner = rest[open + 2..close].trim();
            let before = &rest[..open];
            let after = &rest[close + 2..];

            if let Some((prefix, function)) = split_call_prefix(before) {
                text.push_str(prefix);
                flush(&mut text, &mut segments);
                match parse_call_suffix(after) {
                    Some((argument, consumed)) => {
                        segments.push(Segment::Call {
                            function: function.to_string(),
                            field: inner.to_string(),
                            argument,
                        });
                        rest = &after[consumed..];
                    }
                    None => {
                        let body = format!("{}({{{{{}}}}}", function, inner);
                        segments.push(Segment::Malformed(body));
                        rest = after;
                    }
                }
                continue;
            }

            text.push_str(before);
            flush(&mut text, &mut segments);
            segments.push(parse_inner(inner));
            rest = after;
        }

        text.push_str(rest);
        flush(&mut text, &mut segments);
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Field identifiers referenced by tokens and calls, in template order
    pub fn references(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Token(field) | Segment::Call { field, .. } => Some(field.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Reject unknown functions and malformed calls before rendering
    pub fn check(&self, functions: &FunctionRegistry) -> Result<(), ConfigurationError> {
        for segment in &self.segments {
            match segment {
                Segment::Call { function, .. } if !functions.contains(function) => {
                    return Err(ConfigurationError::unknown_function(function.as_str()));
                }
                Segment::Malformed(body) => {
                    return Err(ConfigurationError::MalformedCall(body.clone()));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn flush(text: &mut String, segments: &mut Vec<Segment>) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `"Hello uppercase("` -> `("Hello ", "uppercase")`
fn split_call_prefix(before: &str) -> Option<(&str, &str)> {
    let head = before.strip_suffix('(')?;
    let start = head
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let name = &head[start..];
    is_identifier(name).then_some((&head[..start], name))
}

/// `")..."` or `", 'arg')..."` -> argument and bytes consumed
fn parse_call_suffix(after: &str) -> Option<(Option<String>, usize)> {
    if after.starts_with(')') {
        return Some((None, 1));
    }
    let rest = after.strip_prefix(',')?;
    let trimmed = rest.trim_start();
    let quote = trimmed.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let body = &trimmed[1..];
    let end = body.find(quote)?;
    let tail = body[end + 1..].trim_start();
    if !tail.starts_with(')') {
        return None;
    }
    let consumed = after.len() - tail.len() + 1;
    Some((Some(body[..end].to_string()), consumed))
}

/// Body of `{{...}}`: a bare field id or an inline call
fn parse_inner(inner: &str) -> Segment {
    let Some(open) = inner.find('(') else {
        return Segment::Token(inner.to_string());
    };
    let name = inner[..open].trim();
    let Some(args) = inner[open + 1..].strip_suffix(')') else {
        return Segment::Malformed(inner.to_string());
    };
    if !is_identifier(name) {
        return Segment::Malformed(inner.to_string());
    }

    let (field, argument) = match args.split_once(',') {
        Some((field, arg)) => (field.trim(), Some(unquote(arg.trim()))),
        None => (args.trim(), None),
    };
    match argument {
        _ if field.is_empty() => Segment::Malformed(inner.to_string()),
        Some(None) => Segment::Malformed(inner.to_string()),
        Some(Some(arg)) => Segment::Call {
            function: name.to_string(),
            field: field.to_string(),
            argument: Some(arg),
        },
        None => Segment::Call {
            function: name.to_string(),
            field: field.to_string(),
            argument: None,
        },
    }
}

fn unquote(input: &str) -> Option<String> {
    let quote = input.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    (input.len() >= 2 && input.ends_with(quote)).then(|| input[1..input.len() - 1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(function: &str, field: &str, argument: Option<&str>) -> Segment {
        Segment::Call {
            function: function.into(),
            field: field.into(),
            argument: argument.map(str::to_string),
        }
    }

    #[test]
    fn test_plain_tokens() {
        let t = Template::parse("{{first}} {{ last }}");
        assert_eq!(
            t.segments(),
            &[
                Segment::Token("first".into()),
                Segment::Text(" ".into()),
                Segment::Token("last".into()),
            ]
        );
        assert_eq!(t.references(), vec!["first", "last"]);
    }

    #[test]
    fn test_wrapping_call() {
        let t = Template::parse("Hi uppercase({{name}})!");
        assert_eq!(
            t.segments(),
            &[
                Segment::Text("Hi ".into()),
                call("uppercase", "name", None),
                Segment::Text("!".into()),
            ]
        );
    }

    #[test]
    fn test_wrapping_call_with_argument() {
        let t = Template::parse("Born date_format({{dob}}, '%d/%m/%Y')");
        assert_eq!(
            t.segments(),
            &[
                Segment::Text("Born ".into()),
                call("date_format", "dob", Some("%d/%m/%Y")),
            ]
        );
    }

    #[test]
    fn test_inline_call() {
        let t = Template::parse("{{count(tags)}} tags, {{date_format(dob, \"%Y\")}}");
        assert_eq!(
            t.segments(),
            &[
                call("count", "tags", None),
                Segment::Text(" tags, ".into()),
                call("date_format", "dob", Some("%Y")),
            ]
        );
    }

    #[test]
    fn test_parenthesis_in_prose_is_text() {
        let t = Template::parse("Hello ({{nickname}})");
        assert_eq!(
            t.segments(),
            &[
                Segment::Text("Hello (".into()),
                Segment::Token("nickname".into()),
                Segment::Text(")".into()),
            ]
        );
    }

    #[test]
    fn test_unterminated_braces_are_text() {
        let t = Template::parse("Total: {{amount");
        assert_eq!(t.segments(), &[Segment::Text("Total: {{amount".into())]);
        assert!(t.references().is_empty());
    }

    #[test]
    fn test_malformed_inline_call() {
        let t = Template::parse("{{upper(case}}");
        assert_eq!(t.segments(), &[Segment::Malformed("upper(case".into())]);
    }

    #[test]
    fn test_unclosed_wrapping_call_is_malformed() {
        let t = Template::parse("Hi foobar({{a}} there");
        assert_eq!(
            t.segments(),
            &[
                Segment::Text("Hi ".into()),
                Segment::Malformed("foobar({{a}}".into()),
                Segment::Text(" there".into()),
            ]
        );
        assert!(matches!(
            t.check(FunctionRegistry::builtin()),
            Err(ConfigurationError::MalformedCall(_))
        ));
    }

    #[test]
    fn test_check_rejects_unknown_function() {
        let registry = FunctionRegistry::builtin();
        assert!(Template::parse("uppercase({{a}})").check(registry).is_ok());
        assert_eq!(
            Template::parse("foobar({{a}})").check(registry),
            Err(ConfigurationError::unknown_function("foobar"))
        );
        assert!(matches!(
            Template::parse("{{x(}}").check(registry),
            Err(ConfigurationError::MalformedCall(_))
        ));
    }
}
