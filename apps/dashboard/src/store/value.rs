//! Conversion between plain JSON and Firestore's typed value encoding
//! (`{"stringValue": "x"}`, `{"arrayValue": {"values": [...]}}`, ...).

use anyhow::anyhow;
use serde_json::{json, Map, Value};

use crate::errors::DashboardError;

/// Decodes a document's `fields` object into plain JSON.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, DashboardError> {
    fields
        .iter()
        .map(|(name, typed)| Ok((name.clone(), decode_value(typed)?)))
        .collect()
}

pub fn decode_value(typed: &Value) -> Result<Value, DashboardError> {
    let obj = typed
        .as_object()
        .filter(|o| o.len() == 1)
        .ok_or_else(|| unsupported(typed))?;
    let (kind, inner) = obj.iter().next().ok_or_else(|| unsupported(typed))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| unsupported(typed)),
        // Firestore sends int64 as a decimal string.
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| unsupported(typed)),
            Value::Number(n) if n.is_i64() => Ok(inner.clone()),
            _ => Err(unsupported(typed)),
        },
        "doubleValue" => match inner {
            Value::Number(_) => Ok(inner.clone()),
            _ => Err(unsupported(typed)),
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| unsupported(typed)),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                None => return Ok(Value::Array(Vec::new())),
                Some(Value::Array(values)) => values,
                Some(_) => return Err(unsupported(typed)),
            };
            values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "mapValue" => match inner.get("fields") {
            None => Ok(Value::Object(Map::new())),
            Some(Value::Object(fields)) => decode_fields(fields).map(Value::Object),
            Some(_) => Err(unsupported(typed)),
        },
        _ => Err(unsupported(typed)),
    }
}

/// Encodes plain JSON fields into Firestore's typed representation.
pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect()
}

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

fn unsupported(typed: &Value) -> DashboardError {
    DashboardError::Internal(anyhow!("unsupported Firestore value: {typed}"))
}
