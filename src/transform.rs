//! Record transformation
//!
//! Shapes a prepared row into the output record of its stream: only the
//! properties declared by the schema are kept, and each value is coerced to
//! one of its declared types. Values that fit none of them become `null`.

use crate::bookmark::to_rfc3339_utc;
use crate::schema::{JsonSchema, JsonType, SchemaProperty};
use crate::types::{JsonObject, JsonValue, Row};
use std::collections::BTreeMap;

/// Transform a row against the schema of its stream
pub fn transform_row(row: &Row, schema: &JsonSchema) -> JsonObject {
    transform_object(row, schema.properties())
}

/// Transform a single value against a property
pub fn transform_value(value: &JsonValue, property: &SchemaProperty) -> JsonValue {
    let Some(declared) = property.json_type.as_ref() else {
        return value.clone();
    };
    if value.is_null() {
        return JsonValue::Null;
    }

    let types = declared.types();
    let native = types.iter().copied().filter(|t| is_native(value, *t));
    let others = types.iter().copied().filter(|t| !is_native(value, *t));
    native
        .chain(others)
        .find_map(|t| coerce(value, t, property))
        .unwrap_or(JsonValue::Null)
}

fn transform_object(
    object: &JsonObject,
    properties: Option<&BTreeMap<String, SchemaProperty>>,
) -> JsonObject {
    let Some(properties) = properties else {
        return object.clone();
    };

    let mut out = JsonObject::new();
    for (name, property) in properties {
        if let Some(value) = object.get(name) {
            out.insert(name.clone(), transform_value(value, property));
        }
    }
    out
}

/// Whether a value already is of the given type without conversion
fn is_native(value: &JsonValue, t: JsonType) -> bool {
    match (value, t) {
        (JsonValue::Null, JsonType::Null)
        | (JsonValue::Bool(_), JsonType::Boolean)
        | (JsonValue::Number(_), JsonType::Number)
        | (JsonValue::String(_), JsonType::String)
        | (JsonValue::Array(_), JsonType::Array)
        | (JsonValue::Object(_), JsonType::Object) => true,
        (JsonValue::Number(n), JsonType::Integer) => n.is_i64() || n.is_u64(),
        _ => false,
    }
}

fn coerce(value: &JsonValue, t: JsonType, property: &SchemaProperty) -> Option<JsonValue> {
    match t {
        JsonType::Null => value.is_null().then_some(JsonValue::Null),
        JsonType::String => coerce_string(value, property),
        JsonType::Integer => coerce_integer(value),
        JsonType::Number => coerce_number(value),
        JsonType::Boolean => coerce_boolean(value),
        JsonType::Object => match value {
            JsonValue::Object(map) => Some(JsonValue::Object(transform_object(
                map,
                property.properties.as_ref(),
            ))),
            _ => None,
        },
        JsonType::Array => match value {
            JsonValue::Array(items) => Some(JsonValue::Array(
                items
                    .iter()
                    .map(|item| match property.items.as_deref() {
                        Some(item_property) => transform_value(item, item_property),
                        None => item.clone(),
                    })
                    .collect(),
            )),
            _ => None,
        },
    }
}

fn coerce_string(value: &JsonValue, property: &SchemaProperty) -> Option<JsonValue> {
    let text = match value {
        JsonValue::String(s) if property.is_date_time() => {
            to_rfc3339_utc(s).unwrap_or_else(|| s.clone())
        }
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
        JsonValue::Null => return None,
    };
    Some(JsonValue::String(text))
}

fn coerce_integer(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
        JsonValue::Number(n) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
            .map(|f| JsonValue::from(f as i64)),
        JsonValue::String(s) => s.trim().parse::<i64>().ok().map(JsonValue::from),
        _ => None,
    }
}

fn coerce_number(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Number(_) => Some(value.clone()),
        JsonValue::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(JsonValue::from(i));
            }
            s.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(JsonValue::Number)
        }
        _ => None,
    }
}

fn coerce_boolean(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Bool(_) => Some(value.clone()),
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(JsonValue::Bool(true)),
            "false" => Some(JsonValue::Bool(false)),
            _ => None,
        },
        JsonValue::Number(n) => match n.as_i64() {
            Some(0) => Some(JsonValue::Bool(false)),
            Some(1) => Some(JsonValue::Bool(true)),
            _ => None,
        },
        _ => None,
    }
}
