// SPDX-License-Identifier: MIT

//! Field definitions as stored with a form document

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single input definition within a form
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct FormField {
    /// Identifier, unique within the form
    pub id: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Display position; ties keep declared order
    #[serde(default)]
    pub order: u32,
    /// Choices for dropdown, radio and checkbox fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalLogic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_recall: Option<AnswerRecall>,
}

impl FormField {
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: String::new(),
            placeholder: None,
            required: false,
            order: 0,
            options: vec![],
            conditional_logic: None,
            answer_recall: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_logic(mut self, logic: ConditionalLogic) -> Self {
        self.conditional_logic = Some(logic);
        self
    }

    pub fn with_recall(mut self, recall: AnswerRecall) -> Self {
        self.answer_recall = Some(recall);
        self
    }
}

/// Supported field types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Email,
    Number,
    Dropdown,
    Radio,
    Checkbox,
    Date,
    File,
}

impl FieldType {
    /// Types whose values come from an options list
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldType::Dropdown | FieldType::Radio | FieldType::Checkbox
        )
    }
}

/// Rules that show, hide or require a field based on other answers
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ConditionalLogic {
    pub action: LogicAction,
    #[serde(default)]
    pub combinator: Combinator,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Field to continue at when this one is hidden
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_to: Option<String>,
}

impl ConditionalLogic {
    pub fn new(action: LogicAction, combinator: Combinator, conditions: Vec<Condition>) -> Self {
        Self {
            action,
            combinator,
            conditions,
            skip_to: None,
        }
    }

    pub fn with_skip_to(mut self, target: impl Into<String>) -> Self {
        self.skip_to = Some(target.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogicAction {
    Show,
    Hide,
    Require,
}

/// How condition results combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    /// All conditions must fire (default)
    #[default]
    #[serde(alias = "and")]
    And,
    /// Any condition firing is enough
    #[serde(alias = "or")]
    Or,
}

/// A single comparison between a source field and a literal
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Condition {
    /// Source field identifier
    pub field: String,
    #[schemars(with = "String")]
    pub operator: Operator,
    /// Comparison literal; numbers and booleans are kept as their text
    #[serde(
        default,
        deserialize_with = "literal::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: Option<&str>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.map(str::to_string),
        }
    }
}

/// Comparison operators
///
/// Names that don't match a known operator are kept as `Unknown` so a
/// malformed definition can be reported for its field without rejecting
/// the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
    Unknown(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::Unknown(name) => name,
        }
    }

    /// Whether the operator compares against a literal
    pub fn needs_value(&self) -> bool {
        !matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        // accepts snake_case and camelCase spellings
        let key: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "equals" => Operator::Equals,
            "notequals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "notcontains" => Operator::NotContains,
            "greaterthan" => Operator::GreaterThan,
            "lessthan" => Operator::LessThan,
            "isempty" => Operator::IsEmpty,
            "isnotempty" => Operator::IsNotEmpty,
            _ => Operator::Unknown(name.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::from(name.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Auto-fill configuration for a field
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct AnswerRecall {
    #[serde(default)]
    pub enabled: bool,
    /// Copy this field's value verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_field: Option<String>,
    /// Template with `{{fieldId}}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// Which recall mode a configuration selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallMode<'a> {
    Direct(&'a str),
    Template(&'a str),
}

impl AnswerRecall {
    pub fn direct(source: impl Into<String>) -> Self {
        Self {
            enabled: true,
            source_field: Some(source.into()),
            template: None,
        }
    }

    pub fn template(template: impl Into<String>) -> Self {
        Self {
            enabled: true,
            source_field: None,
            template: Some(template.into()),
        }
    }

    /// A non-empty source field wins over a template
    pub fn mode(&self) -> Option<RecallMode<'_>> {
        if let Some(source) = non_empty(&self.source_field) {
            return Some(RecallMode::Direct(source.trim()));
        }
        non_empty(&self.template).map(RecallMode::Template)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

mod literal {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(serde::de::Error::custom(
                "condition value must be a string, number or boolean",
            )),
        }
    }
}
