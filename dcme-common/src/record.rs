//! Metadata record model
//!
//! A `Record` is one object from the source metadata file. It is an immutable
//! view over loosely-shaped JSON: any field may be a string, a list of
//! strings, or absent entirely, and the accessors never fail — unknown or
//! missing fields read as empty.

use serde_json::{Map, Value};

/// Immutable metadata record
#[derive(Debug, Clone, Default)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap a JSON object as a record
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a record from a JSON value; non-objects become empty records
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self(Map::new()),
        }
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Scalar field as text; missing or null fields read as empty
    pub fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Field as a list of strings; a scalar value becomes a one-element list
    pub fn text_values(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            Some(Value::Null) | Some(Value::String(_)) | None => Vec::new(),
            Some(other) => vec![other.to_string()],
        }
    }

    /// Field joined for prompt interpolation: lists join with `", "`,
    /// scalars pass through
    pub fn joined(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::Array(_)) => self.text_values(key).join(", "),
            _ => self.text(key),
        }
    }

    /// Record identifier, `"unknown"` when absent
    pub fn object_id(&self) -> String {
        let id = self.text("objectid");
        if id.is_empty() {
            "unknown".to_string()
        } else {
            id
        }
    }
}
