// Conversion between plain JSON and the typed value JSON of the Firestore REST API.
//
// Timestamps, references and bytes come back as strings; they are never produced on the way in.

use crate::shared::core::primitives::Document;
use crate::shared::infrastructure::document_store::DocumentStoreError;
use serde_json::{Map, Number, Value, json};

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(document: &Document) -> Value {
    let fields: Map<String, Value> = document
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect();
    Value::Object(fields)
}

pub fn decode_value(value: &Value) -> Result<Value, DocumentStoreError> {
    let typed = value
        .as_object()
        .ok_or_else(|| malformed("typed value is not an object", value))?;
    let (kind, inner) = typed
        .iter()
        .next()
        .ok_or_else(|| malformed("typed value is empty", value))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| malformed("booleanValue", inner)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| malformed("integerValue", inner))
        }
        "doubleValue" => {
            let parsed = match inner {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };
            let double = parsed.ok_or_else(|| malformed("doubleValue", inner))?;
            // NaN and infinities have no JSON form.
            Ok(Number::from_f64(double).map(Value::Number).unwrap_or(Value::Null))
        }
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| malformed(kind, inner)),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                None => Vec::new(),
                Some(Value::Array(values)) => values
                    .iter()
                    .map(decode_value)
                    .collect::<Result<Vec<Value>, _>>()?,
                Some(other) => return Err(malformed("arrayValue.values", other)),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = match inner.get("fields") {
                None => Document::new(),
                Some(Value::Object(fields)) => decode_fields(fields)?,
                Some(other) => return Err(malformed("mapValue.fields", other)),
            };
            Ok(Value::Object(fields))
        }
        other => Err(DocumentStoreError::Decode(format!(
            "unsupported value type `{other}`"
        ))),
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Result<Document, DocumentStoreError> {
    fields
        .iter()
        .map(|(key, value)| Ok::<_, DocumentStoreError>((key.clone(), decode_value(value)?)))
        .collect()
}

fn malformed(what: &str, value: &Value) -> DocumentStoreError {
    DocumentStoreError::Decode(format!("{what}: {value}"))
}
