// Firestore typed value codec
//
// Firestore's REST surface wraps every value in a single-key object naming
// its type (`{"stringValue": "x"}`, `{"mapValue": {"fields": {...}}}`).
// The rest of the workspace works on plain JSON, so this module converts
// between the two at the wire boundary.

use serde_json::{Map, Value, json};

use crate::error::Error;
use crate::store::Fields;

/// Encode plain JSON fields into Firestore's typed representation.
pub fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// Encode one plain JSON value.
///
/// Integers that fit in `i64` become `integerValue` (sent as a string, as
/// the API expects); every other number becomes `doubleValue`.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Decode Firestore typed fields into plain JSON.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Fields, Error> {
    fields
        .iter()
        .map(|(key, value)| decode_value(value).map(|v| (key.clone(), v)))
        .collect()
}

/// Decode one typed value.
///
/// Timestamps, bytes, and references decode to their string form;
/// geo points to `{latitude, longitude}`; non-finite doubles to `null`.
pub fn decode_value(value: &Value) -> Result<Value, Error> {
    let Some((kind, inner)) = value.as_object().and_then(|obj| obj.iter().next()) else {
        return Err(malformed("expected a single-key typed value", value));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| malformed("booleanValue is not a boolean", value)),
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| malformed("integerValue is not an integer", value)),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n.clone())),
            _ => Err(malformed("integerValue is not an integer", value)),
        },
        "doubleValue" => match inner {
            Value::Number(n) => Ok(Value::Number(n.clone())),
            // "NaN", "Infinity", "-Infinity" have no JSON representation.
            Value::String(_) => Ok(Value::Null),
            _ => Err(malformed("doubleValue is not a number", value)),
        },
        "stringValue" | "timestampValue" | "bytesValue" | "referenceValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_owned()))
            .ok_or_else(|| malformed("expected a string payload", value)),
        "geoPointValue" => match inner {
            Value::Object(point) => Ok(Value::Object(point.clone())),
            _ => Err(malformed("geoPointValue is not an object", value)),
        },
        "arrayValue" => {
            let items = match inner.get("values") {
                None => Vec::new(),
                Some(Value::Array(values)) => {
                    values.iter().map(decode_value).collect::<Result<_, _>>()?
                }
                Some(_) => return Err(malformed("arrayValue.values is not an array", value)),
            };
            Ok(Value::Array(items))
        }
        "mapValue" => match inner.get("fields") {
            None => Ok(Value::Object(Map::new())),
            Some(Value::Object(fields)) => decode_fields(fields).map(Value::Object),
            Some(_) => Err(malformed("mapValue.fields is not an object", value)),
        },
        other => Err(malformed(&format!("unknown value type `{other}`"), value)),
    }
}

fn malformed(message: &str, value: &Value) -> Error {
    Error::Deserialization {
        message: message.to_owned(),
        body: value.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_sent_as_strings() {
        assert_eq!(encode_value(&json!(42)), json!({ "integerValue": "42" }));
        assert_eq!(encode_value(&json!(1.5)), json!({ "doubleValue": 1.5 }));
    }

    #[test]
    fn nested_maps_and_arrays_encode_recursively() {
        let encoded = encode_value(&json!({ "tags": ["a"], "hero": {} }));
        assert_eq!(
            encoded,
            json!({
                "mapValue": { "fields": {
                    "tags": { "arrayValue": { "values": [{ "stringValue": "a" }] } },
                    "hero": { "mapValue": { "fields": {} } }
                }}
            })
        );
    }

    #[test]
    fn decode_handles_every_scalar_kind() {
        let fields = json!({
            "n": { "nullValue": null },
            "b": { "booleanValue": true },
            "i": { "integerValue": "-7" },
            "d": { "doubleValue": 2.5 },
            "nan": { "doubleValue": "NaN" },
            "s": { "stringValue": "hi" },
            "t": { "timestampValue": "2024-05-01T12:00:00Z" },
            "g": { "geoPointValue": { "latitude": 30.5, "longitude": 47.8 } },
        });
        let decoded = decode_fields(fields.as_object().unwrap()).unwrap();
        assert_eq!(
            Value::Object(decoded),
            json!({
                "n": null, "b": true, "i": -7, "d": 2.5, "nan": null, "s": "hi",
                "t": "2024-05-01T12:00:00Z",
                "g": { "latitude": 30.5, "longitude": 47.8 },
            })
        );
    }

    #[test]
    fn empty_containers_may_omit_their_payload() {
        assert_eq!(decode_value(&json!({ "arrayValue": {} })).unwrap(), json!([]));
        assert_eq!(decode_value(&json!({ "mapValue": {} })).unwrap(), json!({}));
    }

    #[test]
    fn decode_rejects_unknown_and_malformed_values() {
        assert!(decode_value(&json!({ "mysteryValue": 1 })).is_err());
        assert!(decode_value(&json!({ "integerValue": "abc" })).is_err());
        assert!(decode_value(&json!("bare")).is_err());
    }

    #[test]
    fn encode_then_decode_preserves_document_shape() {
        let original = json!({
            "title": "Talk",
            "seats": 30,
            "tags": ["design", "history"],
            "weeklyWorkshop": { "weekTitle": "", "lecturerName": "Dr. A" },
            "featuredArticleId": null,
        });
        let encoded = encode_fields(original.as_object().unwrap());
        let decoded = decode_fields(&encoded).unwrap();
        assert_eq!(Value::Object(decoded), original);
    }
}
