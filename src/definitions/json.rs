//! Checked accessors over `serde_json` values.
//!
//! Every getter reports the key and a caller-supplied context so a failed load
//! points at the definition that broke it.

use crate::{DelveError, DelveResult};
use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

fn invalid(message: String) -> DelveError {
    DelveError::Validation(message)
}

/// The message of a validation error without the error-kind prefix.
pub(crate) fn reason(error: &DelveError) -> String {
    match error {
        DelveError::Validation(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Requires `value` to be a JSON object.
pub fn as_object<'a>(value: &'a Value, context: &str) -> DelveResult<&'a JsonObject> {
    value
        .as_object()
        .ok_or_else(|| invalid(format!("Invalid data for {}: expected a JSON object.", context)))
}

/// Reads an integer key that must fit in a byte.
pub fn get_u8(obj: &JsonObject, key: &str, context: &str) -> DelveResult<u8> {
    let value = obj.get(key).and_then(Value::as_i64).ok_or_else(|| {
        invalid(format!(
            "Key '{}' is missing or not an integer. Context: {}",
            key, context
        ))
    })?;

    u8::try_from(value).map_err(|_| {
        invalid(format!(
            "Value for key '{}' ({}) is out of range (0-255). Context: {}",
            key, value, context
        ))
    })
}

pub fn get_string(obj: &JsonObject, key: &str, context: &str) -> DelveResult<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            invalid(format!(
                "Key '{}' is missing or not a string. Context: {}",
                key, context
            ))
        })
}

pub fn get_bool(obj: &JsonObject, key: &str, context: &str) -> DelveResult<bool> {
    obj.get(key).and_then(Value::as_bool).ok_or_else(|| {
        invalid(format!(
            "Key '{}' is missing or not a boolean. Context: {}",
            key, context
        ))
    })
}

/// Parses a `visualization` matrix. Rows may differ in length.
pub fn parse_bool_grid(value: &Value) -> DelveResult<Vec<Vec<bool>>> {
    let rows = value.as_array().ok_or_else(|| {
        invalid("'visualization' field is not an array.".to_string())
    })?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let cells = row.as_array().ok_or_else(|| {
                invalid(format!("Row {} is not a valid array in 'visualization'.", i))
            })?;
            cells
                .iter()
                .enumerate()
                .map(|(j, cell)| {
                    cell.as_bool().ok_or_else(|| {
                        invalid(format!(
                            "Value at ({}, {}) is not a valid boolean in 'visualization'.",
                            i, j
                        ))
                    })
                })
                .collect::<DelveResult<Vec<bool>>>()
        })
        .collect()
}

/// Parses every element of `items`, stopping at the first failure.
pub fn load_array<T, F>(items: &[Value], parse: F, context: &str) -> DelveResult<Vec<T>>
where
    F: Fn(&Value) -> DelveResult<T>,
{
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            parse(item).map_err(|error| {
                invalid(format!(
                    "{}: Item at index {} failed to parse. Error: {}",
                    context,
                    i,
                    reason(&error)
                ))
            })
        })
        .collect()
}

/// Reads an optional array key. `null` counts as absent.
pub fn get_optional_array<'a>(
    obj: &'a JsonObject,
    key: &str,
    context: &str,
) -> DelveResult<Option<&'a Vec<Value>>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(invalid(format!(
            "'{}' field is not an array in {}.",
            key, context
        ))),
    }
}
