//! Typed field access over generic JSON objects.
//!
//! Every accessor carries a static context string so decode errors name the
//! wire structure they came from.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A JSON object being decoded.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    object: &'a Map<String, Value>,
    context: &'static str,
}

impl<'a> Fields<'a> {
    /// Wraps a JSON value that must be an object.
    pub fn new(value: &'a Value, context: &'static str) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Self { object, context }),
            _ => Err(Error::WrongFieldType {
                context,
                field: "(root)",
                expected: "an object",
            }),
        }
    }

    /// Wraps an already-borrowed object.
    pub fn from_map(object: &'a Map<String, Value>, context: &'static str) -> Self {
        Self { object, context }
    }

    /// Returns the underlying object.
    pub fn map(&self) -> &'a Map<String, Value> {
        self.object
    }

    /// Returns a field, treating an explicit `null` as absent.
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        match self.object.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Returns true if the field is present and not null.
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    fn require(&self, field: &'static str) -> Result<&'a Value> {
        self.get(field).ok_or(Error::MissingField {
            context: self.context,
            field,
        })
    }

    fn wrong(&self, field: &'static str, expected: &'static str) -> Error {
        Error::WrongFieldType {
            context: self.context,
            field,
            expected,
        }
    }

    /// Reads a required string field.
    pub fn str(&self, field: &'static str) -> Result<&'a str> {
        self.require(field)?
            .as_str()
            .ok_or_else(|| self.wrong(field, "a string"))
    }

    /// Reads an optional string field.
    pub fn opt_str(&self, field: &'static str) -> Result<Option<&'a str>> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or_else(|| self.wrong(field, "a string")),
        }
    }

    /// Reads a required signed integer field.
    pub fn i64(&self, field: &'static str) -> Result<i64> {
        self.require(field)?
            .as_i64()
            .ok_or_else(|| self.wrong(field, "an integer"))
    }

    /// Reads a required unsigned integer field.
    pub fn u64(&self, field: &'static str) -> Result<u64> {
        self.require(field)?
            .as_u64()
            .ok_or_else(|| self.wrong(field, "a non-negative integer"))
    }

    /// Reads an optional unsigned integer field.
    pub fn opt_u64(&self, field: &'static str) -> Result<Option<u64>> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.wrong(field, "a non-negative integer")),
        }
    }

    /// Reads a required number field (integers are widened).
    pub fn f64(&self, field: &'static str) -> Result<f64> {
        self.require(field)?
            .as_f64()
            .ok_or_else(|| self.wrong(field, "a number"))
    }

    /// Reads an optional number field.
    pub fn opt_f64(&self, field: &'static str) -> Result<Option<f64>> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value.as_f64().map(Some).ok_or_else(|| self.wrong(field, "a number")),
        }
    }

    /// Reads a required object field.
    pub fn object(&self, field: &'static str) -> Result<&'a Map<String, Value>> {
        self.require(field)?
            .as_object()
            .ok_or_else(|| self.wrong(field, "an object"))
    }

    /// Reads an optional object field.
    pub fn opt_object(&self, field: &'static str) -> Result<Option<&'a Map<String, Value>>> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value.as_object().map(Some).ok_or_else(|| self.wrong(field, "an object")),
        }
    }

    /// Reads an optional array field.
    pub fn opt_array(&self, field: &'static str) -> Result<Option<&'a Vec<Value>>> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value.as_array().map(Some).ok_or_else(|| self.wrong(field, "an array")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_fields() {
        let value = json!({"s": "x", "i": -3, "u": 7, "f": 1.5, "o": {}, "n": null});
        let fields = Fields::new(&value, "test").unwrap();
        assert_eq!(fields.str("s").unwrap(), "x");
        assert_eq!(fields.i64("i").unwrap(), -3);
        assert_eq!(fields.u64("u").unwrap(), 7);
        assert_eq!(fields.f64("f").unwrap(), 1.5);
        assert_eq!(fields.f64("u").unwrap(), 7.0);
        assert!(fields.object("o").unwrap().is_empty());
        assert!(!fields.has("n"));
    }

    #[test]
    fn test_missing_and_mistyped() {
        let value = json!({"s": 1});
        let fields = Fields::new(&value, "test").unwrap();
        assert_eq!(
            fields.str("missing").unwrap_err(),
            Error::MissingField { context: "test", field: "missing" }
        );
        assert!(matches!(fields.str("s"), Err(Error::WrongFieldType { .. })));
        assert_eq!(fields.opt_str("missing").unwrap(), None);
    }

    #[test]
    fn test_non_object_root() {
        assert!(Fields::new(&json!([1, 2]), "test").is_err());
    }
}
