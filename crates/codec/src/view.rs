//! `serde_json` interop view.
//!
//! Converts decoded values to and from `serde_json::Value` for callers that
//! want to inspect or build models without driving the token stream. The
//! crate pins serde_json's `preserve_order` feature, so object key order
//! survives both directions.

use serde_json::{Map, Number, Value};

use crate::value::{FieldValue, ModelValue};

/// Renders a model as a JSON value: known fields in declared order, absent
/// optionals omitted (or null when always-emitted), then the overflow bag.
pub fn to_json(value: &ModelValue) -> Value {
    let mut object = Map::new();
    for (idx, desc) in value.schema().fields().iter().enumerate() {
        match value.slot(idx) {
            Some(field_value) => {
                object.insert(desc.name.clone(), field_to_json(field_value));
            }
            None => {
                if desc.always_emitted {
                    object.insert(desc.name.clone(), Value::Null);
                }
            }
        }
    }
    if let Some(bag) = value.overflow() {
        for (key, field_value) in bag.iter() {
            object.insert(key.to_string(), field_to_json(field_value));
        }
    }
    Value::Object(object)
}

/// Converts one field value to a JSON value.
pub fn field_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::Integer(i) => Value::Number(Number::from(*i)),
        // Non-finite floats have no JSON form; they degrade to null, the
        // same choice the token writer makes.
        FieldValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        FieldValue::Str(s) => Value::String(s.clone()),
        FieldValue::Model(model) => to_json(model),
        FieldValue::Seq(items) => Value::Array(items.iter().map(field_to_json).collect()),
        FieldValue::Map(entries) => {
            let mut object = Map::new();
            for (key, entry) in entries {
                object.insert(key.clone(), field_to_json(entry));
            }
            Value::Object(object)
        }
    }
}

/// Converts a JSON value to an untyped field value, the shape an `Any`
/// decode would have produced from the same wire bytes.
pub fn field_from_json(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Float(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => FieldValue::Str(s.clone()),
        Value::Array(items) => FieldValue::Seq(items.iter().map(field_from_json).collect()),
        Value::Object(object) => FieldValue::Map(
            object
                .iter()
                .map(|(key, entry)| (key.clone(), field_from_json(entry)))
                .collect(),
        ),
    }
}
