//! Field values stored in a record's hash.

use serde::{Deserialize, Serialize};

/// The value of a single record field.
///
/// Values are stored in the record hash as compact JSON so that typed
/// values round-trip exactly through the string-typed store. Variant order
/// matters for untagged deserialization: integers must be tried before
/// floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Returns the string content if this is a Str variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value if this is an Int variant.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float value if this is a Float variant.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Bool variant.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns true if this is the Null variant.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used in error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    /// Serialize for storage in the record hash.
    pub(crate) fn encode(&self) -> String {
        // Infallible for this enum: no map keys, and serde_json writes
        // non-finite floats as null.
        serde_json::to_string(self).expect("value serialization")
    }

    /// Parse a hash entry back into a value.
    ///
    /// Entries that are not valid JSON are treated as plain strings, so
    /// data written by other clients of the same keys stays readable.
    pub(crate) fn decode(raw: &str) -> Value {
        serde_json::from_str(raw).unwrap_or_else(|_| Value::Str(raw.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let values = [
            Value::Null,
            Value::Bool(true),
            Value::Int(30),
            Value::Float(2.5),
            Value::Str("alice".to_string()),
        ];
        for v in values {
            assert_eq!(Value::decode(&v.encode()), v);
        }
    }

    #[test]
    fn test_numeric_string_stays_distinct_from_number() {
        let s = Value::Str("30".to_string());
        assert_eq!(Value::decode(&s.encode()), s);
        assert_eq!(Value::decode(&Value::Int(30).encode()), Value::Int(30));
    }

    #[test]
    fn test_foreign_plain_string_decodes_as_str() {
        assert_eq!(
            Value::decode("not json at all"),
            Value::Str("not json at all".to_string())
        );
    }
}
