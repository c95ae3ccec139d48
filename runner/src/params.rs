//! Read-only access to the caller's parameter tree.

use crate::{Error, Result};
use serde_json::{Map, Value};

/// Read-only view over a validated parameter tree.
///
/// Handlers read exactly the keys declared in
/// [`parameter_schema`](crate::parameter_schema); absent keys fall
/// back to the documented defaults.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    root: &'a Map<String, Value>,
}

impl<'a> Params<'a> {
    /// Wrap a parameter tree, which must be a mapping at the top.
    pub fn new(tree: &'a Value) -> Result<Self> {
        match tree.as_object() {
            Some(root) => Ok(Self { root }),
            None => Err(Error::Schema {
                path: "parameters".to_string(),
                expected: "a mapping".to_string(),
                actual: value_kind(tree).to_string(),
            }),
        }
    }

    /// Raw value of a top-level key.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.root.get(key)
    }

    /// String value of a top-level key.
    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    /// String value of a key with a fallback.
    pub fn str_or(&self, key: &str, default: &'a str) -> &'a str {
        self.str(key).unwrap_or(default)
    }

    /// Boolean value of a key with a fallback.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Integer value of a key with a fallback.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::as_i64).unwrap_or(default)
    }

    /// Mapping value of a top-level key.
    pub fn object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    /// The mandatory geometry path.
    pub fn geometry(&self) -> Result<&'a str> {
        self.str("geometry")
            .ok_or_else(|| Error::MissingKey("geometry".to_string()))
    }
}

/// Name of a JSON value's runtime shape, for error reports.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "an integer",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
