//! Scenario model
//!
//! A scenario is the complete set of user inputs of the calculator: a
//! JSON object tree keyed by strings. Keys are kept sorted, so the same
//! scenario always serializes to the same text.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User input record, always a JSON object at the root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scenario {
    fields: Map<String, Value>,
}

impl Scenario {
    /// Create an empty scenario
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a top-level field as a string slice
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Set a top-level field, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Remove a top-level field
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Whether a top-level field exists
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the scenario has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over top-level fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Overlay every top-level field of `other` onto this scenario.
    ///
    /// Fields missing from `other` keep their current values, so a
    /// scenario saved by an older release merges cleanly over newer
    /// defaults.
    pub fn merge_shallow(&mut self, other: Scenario) {
        for (key, value) in other.fields {
            self.fields.insert(key, value);
        }
    }

    /// Borrow the underlying JSON map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Serialize to compact JSON text
    pub fn to_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }

    /// Parse from JSON text
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }
}

impl From<Map<String, Value>> for Scenario {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<Scenario> for Value {
    fn from(scenario: Scenario) -> Self {
        Value::Object(scenario.fields)
    }
}

impl TryFrom<Value> for Scenario {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(DecodeError::NotAnObject),
        }
    }
}
