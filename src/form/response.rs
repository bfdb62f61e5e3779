// SPDX-License-Identifier: MIT

//! Response values and the per-submission response map

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

static ABSENT: ResponseValue = ResponseValue::Absent;

/// Reference to an uploaded file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FileRef {
    #[serde(default, alias = "filename", alias = "originalName")]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(
        default,
        alias = "mimeType",
        alias = "mimetype",
        skip_serializing_if = "Option::is_none"
    )]
    pub mime_type: Option<String>,
}

/// A single submitted value
///
/// Deserializes from any JSON value: numbers and booleans become strings,
/// arrays become string arrays, objects become file references and `null`
/// becomes `Absent`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value", into = "Value")]
pub enum ResponseValue {
    #[default]
    Absent,
    String(String),
    StringArray(Vec<String>),
    FileRef(FileRef),
}

impl ResponseValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, ResponseValue::Absent)
    }

    /// Absent, blank string, or empty array
    pub fn is_empty(&self) -> bool {
        match self {
            ResponseValue::Absent => true,
            ResponseValue::String(s) => s.trim().is_empty(),
            ResponseValue::StringArray(items) => items.is_empty(),
            ResponseValue::FileRef(_) => false,
        }
    }

    /// Text form used for comparisons; arrays join with a bare comma
    pub fn to_text(&self) -> String {
        self.join(",")
    }

    /// Text form with a caller-chosen array separator
    pub fn join(&self, separator: &str) -> String {
        match self {
            ResponseValue::Absent => String::new(),
            ResponseValue::String(s) => s.clone(),
            ResponseValue::StringArray(items) => items.join(separator),
            ResponseValue::FileRef(file) => file.name.clone(),
        }
    }

    /// Numeric coercion; only scalar strings coerce
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResponseValue::String(s) => parse_number(s),
            _ => None,
        }
    }

    /// Individual entries: one for a scalar, each element for an array
    pub fn items(&self) -> Vec<&str> {
        match self {
            ResponseValue::Absent => vec![],
            ResponseValue::String(s) => vec![s.as_str()],
            ResponseValue::StringArray(items) => items.iter().map(String::as_str).collect(),
            ResponseValue::FileRef(file) => vec![file.name.as_str()],
        }
    }
}

/// Parse a finite number, ignoring surrounding whitespace
pub fn parse_number(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

impl From<Value> for ResponseValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ResponseValue::Absent,
            Value::String(s) => ResponseValue::String(s),
            Value::Number(n) => ResponseValue::String(n.to_string()),
            Value::Bool(b) => ResponseValue::String(b.to_string()),
            Value::Array(items) => ResponseValue::StringArray(
                items
                    .into_iter()
                    .filter(|v| !v.is_null())
                    .map(scalar_text)
                    .collect(),
            ),
            Value::Object(map) => ResponseValue::FileRef(
                serde_json::from_value(Value::Object(map)).unwrap_or_default(),
            ),
        }
    }
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Object(map) => match map.get("name").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => Value::Object(map).to_string(),
        },
        other => other.to_string(),
    }
}

impl From<ResponseValue> for Value {
    fn from(value: ResponseValue) -> Self {
        match value {
            ResponseValue::Absent => Value::Null,
            ResponseValue::String(s) => Value::String(s),
            ResponseValue::StringArray(items) => {
                Value::Array(items.into_iter().map(Value::String).collect())
            }
            ResponseValue::FileRef(file) => {
                let mut map = Map::new();
                map.insert("name".into(), Value::String(file.name));
                map.insert("url".into(), Value::String(file.url));
                if let Some(size) = file.size {
                    map.insert("size".into(), Value::from(size));
                }
                if let Some(mime) = file.mime_type {
                    map.insert("mime_type".into(), Value::String(mime));
                }
                Value::Object(map)
            }
        }
    }
}

impl From<&str> for ResponseValue {
    fn from(s: &str) -> Self {
        ResponseValue::String(s.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(s: String) -> Self {
        ResponseValue::String(s)
    }
}

impl From<Vec<&str>> for ResponseValue {
    fn from(items: Vec<&str>) -> Self {
        ResponseValue::StringArray(items.into_iter().map(String::from).collect())
    }
}

/// Read access to field values by identifier
///
/// Unknown identifiers resolve to `ResponseValue::Absent`.
pub trait ValueLookup {
    fn lookup(&self, field: &str) -> &ResponseValue;
}

/// Submitted or draft values keyed by field identifier
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ResponseMap {
    values: HashMap<String, ResponseValue>,
}

impl ResponseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ResponseValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a value; missing keys are `Absent`
    pub fn get(&self, key: &str) -> &ResponseValue {
        self.values.get(key).unwrap_or(&ABSENT)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Build a map from a JSON object; anything else yields an empty map
    pub fn from_json(value: &Value) -> Self {
        value
            .as_object()
            .map(|obj| {
                obj.iter()
                    .map(|(k, v)| (k.clone(), ResponseValue::from(v.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ValueLookup for ResponseMap {
    fn lookup(&self, field: &str) -> &ResponseValue {
        self.get(field)
    }
}

impl<K: Into<String>, V: Into<ResponseValue>> FromIterator<(K, V)> for ResponseMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Two maps read as one: `front` wins unless its entry is absent
pub struct Overlay<'a> {
    front: &'a ResponseMap,
    back: &'a ResponseMap,
}

impl<'a> Overlay<'a> {
    pub fn new(front: &'a ResponseMap, back: &'a ResponseMap) -> Self {
        Self { front, back }
    }
}

impl ValueLookup for Overlay<'_> {
    fn lookup(&self, field: &str) -> &ResponseValue {
        match self.front.get(field) {
            ResponseValue::Absent => self.back.get(field),
            value => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_key_is_absent() {
        let mut map = ResponseMap::new();
        assert!(map.get("anything").is_absent());
        assert!(!map.contains("anything"));

        map.insert("blank", "");
        assert!(map.contains("blank"));
        assert!(!map.get("blank").is_absent());
        assert!(map.lookup("anything").is_empty());
    }

    #[test]
    fn test_from_json_variants() {
        let map = ResponseMap::from_json(&json!({
            "name": "Ada",
            "age": 36,
            "subscribed": true,
            "tags": ["a", "b"],
            "resume": {"filename": "cv.pdf", "url": "https://files/cv.pdf", "size": 1024},
            "nothing": null
        }));

        assert_eq!(map.get("name"), &ResponseValue::String("Ada".into()));
        assert_eq!(map.get("age"), &ResponseValue::String("36".into()));
        assert_eq!(map.get("subscribed"), &ResponseValue::String("true".into()));
        assert_eq!(map.get("tags"), &ResponseValue::from(vec!["a", "b"]));
        match map.get("resume") {
            ResponseValue::FileRef(file) => {
                assert_eq!(file.name, "cv.pdf");
                assert_eq!(file.size, Some(1024));
            }
            other => panic!("Expected FileRef, got {:?}", other),
        }
        assert!(map.get("nothing").is_absent());
    }

    #[test]
    fn test_deserialize_map_directly() {
        let map: ResponseMap = serde_json::from_value(json!({"n": 1.5, "list": [1, 2]})).unwrap();
        assert_eq!(map.get("n").as_number(), Some(1.5));
        assert_eq!(map.get("list").items(), vec!["1", "2"]);
    }

    #[test]
    fn test_emptiness() {
        assert!(ResponseValue::Absent.is_empty());
        assert!(ResponseValue::from("").is_empty());
        assert!(ResponseValue::from("   ").is_empty());
        assert!(ResponseValue::StringArray(vec![]).is_empty());
        assert!(!ResponseValue::from("x").is_empty());
        assert!(!ResponseValue::FileRef(FileRef::default()).is_empty());
    }

    #[test]
    fn test_text_and_numbers() {
        let tags = ResponseValue::from(vec!["red", "blue"]);
        assert_eq!(tags.to_text(), "red,blue");
        assert_eq!(tags.join(", "), "red, blue");
        assert_eq!(tags.as_number(), None);

        assert_eq!(ResponseValue::from(" 21 ").as_number(), Some(21.0));
        assert_eq!(ResponseValue::from("abc").as_number(), None);
        assert_eq!(ResponseValue::from("NaN").as_number(), None);
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let value = ResponseValue::from(vec!["a"]);
        assert_eq!(serde_json::to_value(&value).unwrap(), json!(["a"]));
        assert_eq!(
            serde_json::to_value(ResponseValue::Absent).unwrap(),
            json!(null)
        );
    }

    #[test]
    fn test_overlay_prefers_front() {
        let front: ResponseMap = [("a", "recalled")].into_iter().collect();
        let back: ResponseMap = [("a", "typed"), ("b", "other")].into_iter().collect();
        let overlay = Overlay::new(&front, &back);

        assert_eq!(overlay.lookup("a"), &ResponseValue::from("recalled"));
        assert_eq!(overlay.lookup("b"), &ResponseValue::from("other"));
        assert!(overlay.lookup("c").is_absent());
    }
}
