//! Accessors for legacy positional payloads.

use serde_json::{Map, Value};

use super::Handler;
use crate::error::NormalizeError;

pub(super) fn get<'a>(
    handler: Handler,
    args: &'a [Value],
    index: usize,
    name: &'static str,
) -> Result<&'a Value, NormalizeError> {
    args.get(index).ok_or(NormalizeError::MissingArgument {
        handler: handler.name(),
        index,
        name,
    })
}

/// Reads a string argument; numbers are accepted and rendered.
pub(super) fn string(
    handler: Handler,
    args: &[Value],
    index: usize,
    name: &'static str,
) -> Result<String, NormalizeError> {
    match get(handler, args, index, name)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(invalid(handler, name, "a string")),
    }
}

/// Reads an optional number; a missing argument or `null` yields `None`.
pub(super) fn optional_f64(
    handler: Handler,
    args: &[Value],
    index: usize,
    name: &'static str,
) -> Result<Option<f64>, NormalizeError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(_) => Err(invalid(handler, name, "a number")),
    }
}

/// Reads an array argument; a missing argument or `null` yields an empty list.
pub(super) fn list(
    handler: Handler,
    args: &[Value],
    index: usize,
    name: &'static str,
) -> Result<Vec<Value>, NormalizeError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(invalid(handler, name, "an array")),
    }
}

/// Returns the object behind `value`, or an empty map for anything else.
pub(super) fn object_or_empty(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

fn invalid(handler: Handler, name: &'static str, expected: &'static str) -> NormalizeError {
    NormalizeError::InvalidArgument {
        handler: handler.name(),
        name,
        expected,
    }
}
