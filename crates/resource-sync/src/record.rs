//! # Records
//!
//! Resources are schemaless at this layer: a record is a JSON object as the backend returns
//! it. Typed views over records live with the domain code that owns each resource.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

/// A single backend record.
pub type Record = Map<String, Value>;

/// Identifier of a record within its resource.
///
/// Backends use numeric or textual ids; both are normalized to their string form so that
/// `1` and `"1"` address the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordId(pub String);

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).ok_or_else(|| D::Error::custom(format!("invalid record id: {}", value)))
    }
}

impl RecordId {
    /// Reads the `id` field of a record.
    pub fn of(record: &Record) -> Option<Self> {
        record.get("id").and_then(Self::from_value)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a record from a JSON object literal. Non-object values yield an empty record.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Decodes a record into a typed view.
pub fn decode<T: DeserializeOwned>(record: &Record) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(record.clone()))
}

/// Encodes a typed value as a record payload.
pub fn encode<T: Serialize>(value: &T) -> Result<Record, serde_json::Error> {
    serde_json::to_value(value).map(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_ids_normalize() {
        let a = record(json!({ "id": 7, "label": "Jet A-1" }));
        let b = record(json!({ "id": "7" }));
        assert_eq!(RecordId::of(&a), RecordId::of(&b));
        assert_eq!(RecordId::of(&a).unwrap().to_string(), "7");
    }

    #[test]
    fn ids_deserialize_from_numbers_and_strings() {
        let a: RecordId = serde_json::from_value(json!(3)).unwrap();
        let b: RecordId = serde_json::from_value(json!("3")).unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_value::<RecordId>(json!(null)).is_err());
    }

    #[test]
    fn missing_or_odd_ids_are_none() {
        assert!(RecordId::of(&record(json!({ "label": "x" }))).is_none());
        assert!(RecordId::of(&record(json!({ "id": [1] }))).is_none());
        assert!(record(json!("not an object")).is_empty());
    }
}
