//! Adapter common field extraction
//!
//! `null` is treated the same as an absent field.

use contracts::AdapterParseError;
use serde_json::{Map, Value};

/// JSON type name used in error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[inline]
pub fn as_object(entry: &Value) -> Result<&Map<String, Value>, AdapterParseError> {
    entry.as_object().ok_or(AdapterParseError::NotAnObject {
        found: json_type_name(entry),
    })
}

#[inline]
pub fn required<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Value, AdapterParseError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(AdapterParseError::missing(field)),
        Some(value) => Ok(value),
    }
}

pub fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, AdapterParseError> {
    let value = required(obj, field)?;
    value
        .as_str()
        .ok_or_else(|| AdapterParseError::wrong_type(field, "string", json_type_name(value)))
}

pub fn required_number(obj: &Map<String, Value>, field: &str) -> Result<f64, AdapterParseError> {
    let value = required(obj, field)?;
    value
        .as_f64()
        .ok_or_else(|| AdapterParseError::wrong_type(field, "number", json_type_name(value)))
}

/// Optional string field; `None` when no field name is configured or the entry lacks it
pub fn optional_str(
    obj: &Map<String, Value>,
    field: Option<&str>,
) -> Result<Option<String>, AdapterParseError> {
    let Some(field) = field else {
        return Ok(None);
    };
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(AdapterParseError::wrong_type(
            field,
            "string",
            json_type_name(other),
        )),
    }
}
