// SPDX-License-Identifier: MIT

//! Validation report for form authors

use serde::Serialize;

use crate::form::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Unknown operator or function, malformed call, empty recall
    ConfigurationError,
    /// A referenced field doesn't exist; it reads as no value
    MissingReference,
    /// A referenced field is declared later and reads as stale or empty
    ForwardReference,
    /// Recall reads the field's own value, which is never available
    SelfReference,
    DuplicateField,
    MissingOptions,
    MissingLiteral,
    InvalidSkipTarget,
}

/// One finding attached to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub field: String,
    pub kind: IssueKind,
    pub message: String,
}

/// Errors and warnings per field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: vec![],
            warnings: vec![],
        }
    }

    pub fn add(
        &mut self,
        severity: Severity,
        field: &str,
        kind: IssueKind,
        message: impl Into<String>,
    ) {
        let issue = Issue {
            field: field.to_string(),
            kind,
            message: message.into(),
        };
        let list = match severity {
            Severity::Error => &mut self.errors,
            Severity::Warning => &mut self.warnings,
        };
        // the same finding can come from validation and from evaluation
        if !list.contains(&issue) {
            list.push(issue);
        }
        self.valid = self.errors.is_empty();
    }

    pub fn error(&mut self, field: &str, kind: IssueKind, message: impl Into<String>) {
        self.add(Severity::Error, field, kind, message);
    }

    pub fn warning(&mut self, field: &str, kind: IssueKind, message: impl Into<String>) {
        self.add(Severity::Warning, field, kind, message);
    }

    pub fn configuration(&mut self, field: &str, err: &ConfigurationError) {
        self.error(field, IssueKind::ConfigurationError, err.to_string());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All issues for one field, errors first
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(move |i| i.field == field)
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_is_valid() {
        let report = ValidationReport::new();
        assert!(report.valid);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_warnings_keep_report_valid() {
        let mut report = ValidationReport::new();
        report.warning("a", IssueKind::ForwardReference, "later");
        assert!(report.valid);

        report.configuration("b", &ConfigurationError::UnknownOperator("x".into()));
        assert!(!report.valid);
        assert_eq!(report.errors[0].kind, IssueKind::ConfigurationError);
        assert_eq!(report.errors[0].message, "Unknown operator: x");
    }

    #[test]
    fn test_duplicate_issues_collapse() {
        let mut report = ValidationReport::new();
        let err = ConfigurationError::unknown_function("foobar");
        report.configuration("a", &err);
        report.configuration("a", &err);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_for_field_and_json_shape() {
        let mut report = ValidationReport::new();
        report.warning("a", IssueKind::MissingReference, "ghost");
        report.error("a", IssueKind::DuplicateField, "dup");
        report.error("b", IssueKind::DuplicateField, "dup");

        let kinds: Vec<IssueKind> = report.for_field("a").map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::DuplicateField, IssueKind::MissingReference]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["warnings"][0]["kind"], "missing_reference");
    }
}
