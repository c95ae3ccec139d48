//! Declarative validation of the parameter tree.
//!
//! Validation runs once, before any external program is touched, and
//! fails fast: the first violation is reported with the dotted path
//! of the offending key.

use crate::{params::value_kind, Error, Result};
use serde_json::Value;

/// Shape of one position in the parameter tree.
#[derive(Debug, Clone)]
pub enum Schema {
    /// A string value.
    Str,
    /// An integer value.
    Int,
    /// A boolean value.
    Bool,
    /// A homogeneous list.
    List(Box<Schema>),
    /// Any one of the listed shapes.
    OneOf(Vec<Schema>),
    /// A nested mapping.
    Map(MapSchema),
}

impl Schema {
    fn describe(&self) -> String {
        match self {
            Schema::Str => "a string".to_string(),
            Schema::Int => "an integer".to_string(),
            Schema::Bool => "a boolean".to_string(),
            Schema::List(item) => format!("a list of {}s", item.noun()),
            Schema::OneOf(options) => options
                .iter()
                .map(|option| option.describe())
                .collect::<Vec<_>>()
                .join(" or "),
            Schema::Map(_) => "a mapping".to_string(),
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            Schema::Str => "string",
            Schema::Int => "integer",
            Schema::Bool => "boolean",
            Schema::List(_) => "list",
            Schema::OneOf(_) => "value",
            Schema::Map(_) => "mapping",
        }
    }

    /// Shallow check whether a value has this shape's runtime type.
    fn admits(&self, value: &Value) -> bool {
        match self {
            Schema::Str => value.is_string(),
            Schema::Int => value.as_i64().is_some(),
            Schema::Bool => value.is_boolean(),
            Schema::List(_) => value.is_array(),
            Schema::OneOf(options) => {
                options.iter().any(|option| option.admits(value))
            }
            Schema::Map(_) => value.is_object(),
        }
    }
}

/// Shape of a mapping: declared keys plus an optional wildcard shape
/// for keys that are not declared.
#[derive(Debug, Clone)]
pub struct MapSchema {
    keys: Vec<(&'static str, Schema)>,
    other: Option<Box<Schema>>,
    allow_empty: bool,
}

impl MapSchema {
    /// A mapping with no declared keys, which may be empty.
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            other: None,
            allow_empty: true,
        }
    }

    /// Declare a key.
    pub fn key(mut self, name: &'static str, schema: Schema) -> Self {
        self.keys.push((name, schema));
        self
    }

    /// Accept undeclared keys with the given shape.
    pub fn other(mut self, schema: Schema) -> Self {
        self.other = Some(Box::new(schema));
        self
    }

    /// Reject the mapping when it carries no entries at all.
    pub fn non_empty(mut self) -> Self {
        self.allow_empty = false;
        self
    }

    fn lookup(&self, key: &str) -> Option<&Schema> {
        self.keys
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, schema)| schema)
            .or(self.other.as_deref())
    }
}

/// Validate a value against a schema.
pub fn validate(value: &Value, schema: &Schema) -> Result<()> {
    check(value, schema, &mut Vec::new())
}

fn check(value: &Value, schema: &Schema, path: &mut Vec<String>) -> Result<()> {
    match schema {
        Schema::Str if value.is_string() => Ok(()),
        Schema::Int if value.as_i64().is_some() => Ok(()),
        Schema::Bool if value.is_boolean() => Ok(()),
        Schema::List(item) => match value {
            Value::Array(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    path.push(index.to_string());
                    check(entry, item, path)?;
                    path.pop();
                }
                Ok(())
            }
            _ => Err(mismatch(value, schema, path)),
        },
        Schema::OneOf(options) => {
            let mut inner: Option<Error> = None;
            for option in options {
                let mut branch = path.clone();
                match check(value, option, &mut branch) {
                    Ok(()) => return Ok(()),
                    Err(err) => {
                        // keep the error from the shape the value
                        // resembles, it names the real problem
                        if inner.is_none() && option.admits(value) {
                            inner = Some(err);
                        }
                    }
                }
            }
            Err(inner.unwrap_or_else(|| mismatch(value, schema, path)))
        }
        Schema::Map(map) => match value {
            Value::Object(entries) => {
                if entries.is_empty() && !map.allow_empty {
                    return Err(Error::EmptyGroup(join(path)));
                }
                for (key, entry) in entries {
                    path.push(key.clone());
                    match map.lookup(key) {
                        Some(schema) => check(entry, schema, path)?,
                        None => return Err(Error::UnknownKey(join(path))),
                    }
                    path.pop();
                }
                Ok(())
            }
            _ => Err(mismatch(value, schema, path)),
        },
        _ => Err(mismatch(value, schema, path)),
    }
}

fn mismatch(value: &Value, schema: &Schema, path: &[String]) -> Error {
    Error::Schema {
        path: join(path),
        expected: schema.describe(),
        actual: value_kind(value).to_string(),
    }
}

fn join(path: &[String]) -> String {
    if path.is_empty() {
        "parameters".to_string()
    } else {
        path.join(".")
    }
}

/// The declared shape of the caller's parameter tree.
///
/// Everything is optional except `geometry`, whose presence is
/// enforced separately so that the error names the missing key.
pub fn parameter_schema() -> Schema {
    let dft = Schema::OneOf(vec![
        Schema::Str,
        Schema::Map(
            MapSchema::new()
                .key("functional", Schema::Str)
                .key("grid", Schema::Str)
                .non_empty(),
        ),
    ]);
    let ri = Schema::OneOf(vec![
        Schema::Str,
        Schema::Bool,
        Schema::Map(
            MapSchema::new()
                .key("type", Schema::Str)
                .key("multipole_acceleration", Schema::Bool)
                .non_empty(),
        ),
    ]);
    let calculation = MapSchema::new()
        .key("dft", dft)
        .key("ri", ri)
        .key(
            "dispersion_correction",
            Schema::OneOf(vec![Schema::Str, Schema::Bool]),
        )
        .key("max_scf_iterations", Schema::Int)
        .key("x2c", Schema::Bool)
        .key("generic", Schema::List(Box::new(Schema::Str)))
        .non_empty();
    let basis_set = Schema::OneOf(vec![
        Schema::Str,
        Schema::Map(MapSchema::new().other(Schema::Str).non_empty()),
    ]);

    Schema::Map(
        MapSchema::new()
            .key("title", Schema::Str)
            .key("geometry", Schema::Str)
            .key("detect_symmetry", Schema::Bool)
            .key("use_internal_coords", Schema::Bool)
            .key("use_ecp", Schema::Bool)
            .key("write_natural_orbitals", Schema::Bool)
            .key("charge", Schema::Int)
            .key("basis_set", basis_set)
            .key("calculation", Schema::Map(calculation)),
    )
}
