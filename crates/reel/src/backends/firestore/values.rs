//! 🔤 Firestore's typed value envelope, flattened to plain JSON and back.
//!
//! Firestore never sends `"Heat"`. It sends `{"stringValue": "Heat"}`. Integers arrive as
//! strings (`{"integerValue": "1995"}`) because 64 bits don't fit in a JavaScript number.
//! This module peels those envelopes off on the way in and puts them back on the way out.
//!
//! 🧠 A value shape we don't recognise is kept as its raw envelope object. If it sits in one of
//! the four movie fields, record decoding rejects it and the document is skipped. If it sits
//! anywhere else, nobody looks at it.

use serde_json::{Map, Number, Value};

/// 📥 Flatten a document's `fields` object.
pub(crate) fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

/// 📥 Flatten one typed value.
pub(crate) fn decode_value(value: &Value) -> Value {
    let Some(envelope) = value.as_object() else {
        return value.clone();
    };
    let Some((kind, inner)) = envelope.iter().next().filter(|_| envelope.len() == 1) else {
        return value.clone();
    };

    match (kind.as_str(), inner) {
        ("stringValue", Value::String(_)) => inner.clone(),
        ("booleanValue", Value::Bool(_)) => inner.clone(),
        ("nullValue", _) => Value::Null,
        ("integerValue", Value::String(raw)) => raw
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or_else(|_| value.clone()),
        ("integerValue", Value::Number(_)) => inner.clone(),
        ("doubleValue", Value::Number(_)) => inner.clone(),
        // -- NaN and friends travel as strings. JSON can't hold them, so they stay strings.
        ("doubleValue", Value::String(_)) => inner.clone(),
        ("timestampValue" | "referenceValue" | "bytesValue", Value::String(_)) => inner.clone(),
        ("geoPointValue", Value::Object(_)) => inner.clone(),
        ("arrayValue", Value::Object(array)) => Value::Array(
            array
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        ("mapValue", Value::Object(map)) => Value::Object(
            map.get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        _ => value.clone(),
    }
}

/// 📤 Wrap a plain JSON object as Firestore `fields`.
pub(crate) fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// 📤 Wrap one plain JSON value in its typed envelope.
pub(crate) fn encode_value(value: &Value) -> Value {
    let mut envelope = Map::with_capacity(1);
    match value {
        Value::Null => {
            envelope.insert("nullValue".into(), Value::Null);
        }
        Value::Bool(b) => {
            envelope.insert("booleanValue".into(), Value::Bool(*b));
        }
        Value::Number(n) => encode_number(n, &mut envelope),
        Value::String(s) => {
            envelope.insert("stringValue".into(), Value::String(s.clone()));
        }
        Value::Array(values) => {
            let mut array = Map::with_capacity(1);
            array.insert(
                "values".into(),
                Value::Array(values.iter().map(encode_value).collect()),
            );
            envelope.insert("arrayValue".into(), Value::Object(array));
        }
        Value::Object(map) => {
            let mut inner = Map::with_capacity(1);
            inner.insert("fields".into(), Value::Object(encode_fields(map)));
            envelope.insert("mapValue".into(), Value::Object(inner));
        }
    }
    Value::Object(envelope)
}

fn encode_number(n: &Number, envelope: &mut Map<String, Value>) {
    if let Some(i) = n.as_i64() {
        envelope.insert("integerValue".into(), Value::String(i.to_string()));
    } else if let Some(u) = n.as_u64() {
        // -- bigger than i64::MAX. Firestore integers are signed 64-bit, so it goes as a double.
        envelope.insert("doubleValue".into(), Value::from(u as f64));
    } else {
        envelope.insert("doubleValue".into(), Value::Number(n.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn the_one_where_envelopes_come_off() {
        let wire = json!({
            "name": {"stringValue": "Heat"},
            "year": {"integerValue": "1995"},
            "rating": {"doubleValue": 8.3},
            "seen": {"booleanValue": true},
            "notes": {"nullValue": null},
            "released": {"timestampValue": "1995-12-15T00:00:00Z"},
            "cast": {"arrayValue": {"values": [{"stringValue": "Pacino"}, {"stringValue": "De Niro"}]}},
            "box_office": {"mapValue": {"fields": {"usd": {"integerValue": "187436818"}}}},
            "empty_list": {"arrayValue": {}},
        });
        let decoded = decode_fields(wire.as_object().expect("💀 fixture is an object"));
        assert_eq!(
            Value::Object(decoded),
            json!({
                "name": "Heat",
                "year": 1995,
                "rating": 8.3,
                "seen": true,
                "notes": null,
                "released": "1995-12-15T00:00:00Z",
                "cast": ["Pacino", "De Niro"],
                "box_office": {"usd": 187436818},
                "empty_list": [],
            })
        );
    }

    #[test]
    fn the_one_where_a_strange_envelope_is_left_alone() {
        let weird = json!({"vectorValue": {"values": [1, 2]}});
        assert_eq!(decode_value(&weird), weird);
    }

    #[test]
    fn the_one_where_envelopes_go_back_on() {
        let plain = json!({"name": "Dune", "year": 2021, "tags": ["sand"], "meta": {"ok": false}});
        let encoded = encode_fields(plain.as_object().expect("💀 fixture is an object"));
        assert_eq!(
            Value::Object(encoded.clone()),
            json!({
                "name": {"stringValue": "Dune"},
                "year": {"integerValue": "2021"},
                "tags": {"arrayValue": {"values": [{"stringValue": "sand"}]}},
                "meta": {"mapValue": {"fields": {"ok": {"booleanValue": false}}}},
            })
        );
        assert_eq!(Value::Object(decode_fields(&encoded)), plain);
    }
}
