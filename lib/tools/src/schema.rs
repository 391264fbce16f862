//! Argument validation against a tool's input schema.
//!
//! Supports the subset of JSON Schema the catalog uses: top-level
//! `properties`, `required`, `type`, `enum`, `default`, array `items` and
//! nested object `properties`.

use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// An argument that does not match the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Path to the offending value, e.g. `rings[2]`.
    pub path: String,
    /// What is wrong with it.
    pub reason: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

impl std::error::Error for SchemaViolation {}

/// Validates arguments and returns them normalized.
///
/// Declared properties are type-checked, missing or null ones receive
/// their schema default, and undeclared properties are dropped.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate(
    schema: &JsonValue,
    mut args: Map<String, JsonValue>,
) -> Result<Map<String, JsonValue>, SchemaViolation> {
    let mut validated = Map::new();

    if let Some(properties) = schema.get("properties").and_then(JsonValue::as_object) {
        for (key, property) in properties {
            match args.remove(key) {
                None | Some(JsonValue::Null) => {
                    if let Some(default) = property.get("default") {
                        validated.insert(key.clone(), default.clone());
                    }
                }
                Some(value) => {
                    check(key, property, &value)?;
                    validated.insert(key.clone(), value);
                }
            }
        }
    }

    let required = schema
        .get("required")
        .and_then(JsonValue::as_array)
        .into_iter()
        .flatten()
        .filter_map(JsonValue::as_str);
    for key in required {
        if !validated.contains_key(key) {
            return Err(SchemaViolation {
                path: key.to_string(),
                reason: "is required".to_string(),
            });
        }
    }

    Ok(validated)
}

fn check(path: &str, schema: &JsonValue, value: &JsonValue) -> Result<(), SchemaViolation> {
    if let Some(expected) = schema.get("type").and_then(JsonValue::as_str) {
        if !has_type(value, expected) {
            return Err(SchemaViolation {
                path: path.to_string(),
                reason: format!("expected {expected}, got {}", type_name(value)),
            });
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(JsonValue::as_array) {
        if !allowed.contains(value) {
            let options: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            return Err(SchemaViolation {
                path: path.to_string(),
                reason: format!("must be one of {}", options.join(", ")),
            });
        }
    }

    match value {
        JsonValue::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for (position, item) in items.iter().enumerate() {
                    check(&format!("{path}[{position}]"), item_schema, item)?;
                }
            }
        }
        JsonValue::Object(fields) => {
            if let Some(properties) = schema.get("properties").and_then(JsonValue::as_object) {
                for (key, property) in properties {
                    if let Some(field) = fields.get(key).filter(|field| !field.is_null()) {
                        check(&format!("{path}.{key}"), property, field)?;
                    }
                }
            }
        }
        _ => {}
    }

    Ok(())
}

fn has_type(value: &JsonValue, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => {
            value.is_i64()
                || value.is_u64()
                || value.as_f64().is_some_and(|n| n.fract() == 0.0)
        }
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
