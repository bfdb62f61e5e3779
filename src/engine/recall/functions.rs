// SPDX-License-Identifier: MIT

//! Named formatting functions usable in recall templates

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::form::config::EngineConfig;
use crate::form::response::{parse_number, ResponseValue};

static BUILTIN: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::with_builtins);

/// A function applied to a recalled value inside a template
pub trait RecallFunction: Send + Sync {
    /// Name used in templates (must be unique within a registry)
    fn name(&self) -> &str;

    /// Render the value; never fails, falling back to the plain text
    fn apply(&self, value: &ResponseValue, argument: Option<&str>, config: &EngineConfig)
        -> String;
}

/// Lookup of recall functions by name
pub struct FunctionRegistry {
    functions: HashMap<String, Box<dyn RecallFunction>>,
}

impl FunctionRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// A registry holding `uppercase`, `lowercase`, `capitalize`,
    /// `date_format`, `join`, `count` and `sum`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Uppercase));
        registry.register(Box::new(Lowercase));
        registry.register(Box::new(Capitalize));
        registry.register(Box::new(DateFormat));
        registry.register(Box::new(Join));
        registry.register(Box::new(Count));
        registry.register(Box::new(Sum));
        registry
    }

    /// Shared registry of the built-in functions
    pub fn builtin() -> &'static FunctionRegistry {
        &BUILTIN
    }

    pub fn register(&mut self, function: Box<dyn RecallFunction>) {
        self.functions.insert(function.name().to_string(), function);
    }

    pub fn get(&self, name: &str) -> Option<&dyn RecallFunction> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

struct Uppercase;

impl RecallFunction for Uppercase {
    fn name(&self) -> &str {
        "uppercase"
    }

    fn apply(&self, value: &ResponseValue, _: Option<&str>, config: &EngineConfig) -> String {
        value.join(&config.join_separator).to_uppercase()
    }
}

struct Lowercase;

impl RecallFunction for Lowercase {
    fn name(&self) -> &str {
        "lowercase"
    }

    fn apply(&self, value: &ResponseValue, _: Option<&str>, config: &EngineConfig) -> String {
        value.join(&config.join_separator).to_lowercase()
    }
}

/// First letter upper, rest unchanged
struct Capitalize;

impl RecallFunction for Capitalize {
    fn name(&self) -> &str {
        "capitalize"
    }

    fn apply(&self, value: &ResponseValue, _: Option<&str>, config: &EngineConfig) -> String {
        let text = value.join(&config.join_separator);
        let mut chars = text.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => text,
        }
    }
}

struct DateFormat;

impl RecallFunction for DateFormat {
    fn name(&self) -> &str {
        "date_format"
    }

    fn apply(
        &self,
        value: &ResponseValue,
        argument: Option<&str>,
        config: &EngineConfig,
    ) -> String {
        let text = value.join(&config.join_separator);
        let Some(date) = parse_date(&text, &config.date_input_formats) else {
            return text;
        };
        let format = argument.unwrap_or(&config.date_output_format);

        // invalid format strings surface as fmt errors
        let mut out = String::new();
        if write!(out, "{}", date.format(format)).is_err() {
            log::warn!("Invalid date format '{}', keeping raw value", format);
            return text;
        }
        out
    }
}

struct Join;

impl RecallFunction for Join {
    fn name(&self) -> &str {
        "join"
    }

    fn apply(
        &self,
        value: &ResponseValue,
        argument: Option<&str>,
        config: &EngineConfig,
    ) -> String {
        value.join(argument.unwrap_or(&config.join_separator))
    }
}

/// Number of entries: array length, 1 for a non-empty scalar
struct Count;

impl RecallFunction for Count {
    fn name(&self) -> &str {
        "count"
    }

    fn apply(&self, value: &ResponseValue, _: Option<&str>, _: &EngineConfig) -> String {
        let count = match value {
            ResponseValue::StringArray(items) => items.len(),
            other if other.is_empty() => 0,
            _ => 1,
        };
        count.to_string()
    }
}

/// Sum of numeric entries; non-numeric entries are skipped
struct Sum;

impl RecallFunction for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn apply(&self, value: &ResponseValue, _: Option<&str>, _: &EngineConfig) -> String {
        let total: f64 = value.items().into_iter().filter_map(parse_number).sum();
        format_number(total)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn parse_date(input: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }
    formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(input, f).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(name: &str, value: ResponseValue, argument: Option<&str>) -> String {
        let config = EngineConfig::default();
        FunctionRegistry::builtin()
            .get(name)
            .unwrap()
            .apply(&value, argument, &config)
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!(
            FunctionRegistry::builtin().names(),
            vec!["capitalize", "count", "date_format", "join", "lowercase", "sum", "uppercase"]
        );
        assert!(!FunctionRegistry::builtin().contains("foobar"));
    }

    #[test]
    fn test_case_functions() {
        assert_eq!(apply("uppercase", "Ada".into(), None), "ADA");
        assert_eq!(apply("lowercase", "Ada".into(), None), "ada");
        assert_eq!(apply("capitalize", "ada lovelace".into(), None), "Ada lovelace");
        assert_eq!(apply("capitalize", "aDA".into(), None), "ADA");
        assert_eq!(apply("capitalize", "".into(), None), "");
    }

    #[test]
    fn test_date_format() {
        assert_eq!(apply("date_format", "2024-03-05".into(), None), "March 5, 2024");
        assert_eq!(
            apply("date_format", "2024-03-05".into(), Some("%d/%m/%Y")),
            "05/03/2024"
        );
        assert_eq!(
            apply("date_format", "2024-03-05T10:30:00Z".into(), Some("%Y")),
            "2024"
        );
        assert_eq!(apply("date_format", "03/05/2024".into(), Some("%Y-%m-%d")), "2024-03-05");
    }

    #[test]
    fn test_date_format_passthrough() {
        assert_eq!(apply("date_format", "next tuesday".into(), None), "next tuesday");
        assert_eq!(apply("date_format", ResponseValue::Absent, None), "");
    }

    #[test]
    fn test_join_and_count() {
        let tags = ResponseValue::from(vec!["a", "b", "c"]);
        assert_eq!(apply("join", tags.clone(), None), "a, b, c");
        assert_eq!(apply("join", tags.clone(), Some("/")), "a/b/c");
        assert_eq!(apply("count", tags, None), "3");
        assert_eq!(apply("count", "x".into(), None), "1");
        assert_eq!(apply("count", ResponseValue::Absent, None), "0");
    }

    #[test]
    fn test_sum() {
        assert_eq!(apply("sum", vec!["1", "2", "3"].into(), None), "6");
        assert_eq!(apply("sum", vec!["1.5", "x", "2"].into(), None), "3.5");
        assert_eq!(apply("sum", vec!["x", "y"].into(), None), "0");
        assert_eq!(apply("sum", ResponseValue::Absent, None), "0");
    }

    #[test]
    fn test_custom_function_registration() {
        struct Reverse;
        impl RecallFunction for Reverse {
            fn name(&self) -> &str {
                "reverse"
            }
            fn apply(&self, value: &ResponseValue, _: Option<&str>, _: &EngineConfig) -> String {
                value.to_text().chars().rev().collect()
            }
        }

        let mut registry = FunctionRegistry::with_builtins();
        registry.register(Box::new(Reverse));
        let f = registry.get("reverse").unwrap();
        assert_eq!(f.apply(&"abc".into(), None, &EngineConfig::default()), "cba");
    }
}
