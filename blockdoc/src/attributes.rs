//! Block attribute values
//!
//! Attributes are the JSON object embedded in a block's opening delimiter.
//! They are modelled as a closed union so every consumer handles each shape
//! explicitly, and stored in an [`IndexMap`] so authored key order survives
//! a parse/serialize cycle.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered attribute mapping, name → value
pub type Attributes = IndexMap<String, AttributeValue>;

/// A single attribute value
///
/// Only `String` leaves are ever candidates for translation. `List` and
/// `Mapping` are traversed, never translated wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<AttributeValue>),
    Mapping(Attributes),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Attributes> {
        match self {
            AttributeValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// String value of `key` in this mapping, or `""` when absent or not a string
    pub fn str_field(&self, key: &str) -> &str {
        self.get(key).and_then(AttributeValue::as_str).unwrap_or("")
    }

    /// True when this value carries nothing worth keeping
    ///
    /// Empty strings, `"0"`, zero, `false`, `null` and empty collections are
    /// empty. This mirrors how stored field values are filtered before
    /// translation.
    pub fn is_empty_value(&self) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::Bool(b) => !b,
            AttributeValue::Number(n) => n.as_f64() == Some(0.0),
            AttributeValue::String(s) => s.is_empty() || s == "0",
            AttributeValue::List(items) => items.is_empty(),
            AttributeValue::Mapping(map) => map.is_empty(),
        }
    }

    /// Boolean reading of a flag-like attribute
    pub fn is_truthy(&self) -> bool {
        !self.is_empty_value()
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value.into())
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(value: Vec<AttributeValue>) -> Self {
        AttributeValue::List(value)
    }
}

impl From<Attributes> for AttributeValue {
    fn from(value: Attributes) -> Self {
        AttributeValue::Mapping(value)
    }
}

/// Parse an attribute object from its JSON text
pub fn attributes_from_json(json: &str) -> Result<Attributes, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize attributes to compact JSON
///
/// Key order is preserved. Non-ASCII characters and `/` are written as-is.
pub fn attributes_to_json(attributes: &Attributes) -> Result<String, serde_json::Error> {
    serde_json::to_string(attributes)
}
