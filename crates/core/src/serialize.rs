//! Encoding [`Value`] graphs into JSON documents.
//!
//! Encoding is total: every constructible value has a wire form. Extension
//! values carry their original literal text, so a decode/encode round trip
//! reproduces the document.

use serde_json::json;

use crate::extension::extension_node;
use crate::value::{EntityUid, Value};

/// Encode a [`Value`] into its JSON wire form.
pub fn encode_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Bool(b) => json!(b),
        Value::Long(n) => json!(n),
        Value::String(s) => json!(s),
        Value::Entity(uid) => json!({ "__entity": uid_node(uid) }),
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(encode_value).collect())
        }
        Value::Record(fields) => {
            let mut obj = serde_json::Map::with_capacity(fields.len());
            for (key, val) in fields {
                obj.insert(key.clone(), encode_value(val));
            }
            serde_json::Value::Object(obj)
        }
        Value::Ip(text) => extension_node("ip", text),
        Value::Decimal(text) => extension_node("decimal", text),
        Value::DateTime(dt) => extension_node("datetime", dt.as_str()),
        Value::Duration(d) => extension_node("duration", d.as_str()),
        Value::Unknown(tag) => extension_node("unknown", tag),
        Value::Offset { datetime, duration } => json!({
            "__extn": {
                "fn": "offset",
                "args": [
                    extension_node("datetime", datetime.as_str()),
                    extension_node("duration", duration.as_str()),
                ],
            }
        }),
    }
}

/// Encode an entity reference as a bare `{"type", "id"}` object.
pub(crate) fn uid_node(uid: &EntityUid) -> serde_json::Value {
    json!({ "type": uid.type_name().to_string(), "id": uid.id() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::DateTime;
    use crate::deserialize::decode_value;
    use crate::duration::Duration;
    use crate::value::EntityTypeName;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn encodes_primitives() {
        assert_eq!(encode_value(&Value::Bool(false)), json!(false));
        assert_eq!(encode_value(&Value::Long(7)), json!(7));
        assert_eq!(encode_value(&Value::String("s".into())), json!("s"));
    }

    #[test]
    fn encodes_entity_escape() {
        let uid = EntityUid::new(EntityTypeName::parse("NS::User").unwrap(), "alice");
        assert_eq!(
            encode_value(&Value::Entity(uid)),
            json!({"__entity": {"type": "NS::User", "id": "alice"}})
        );
    }

    #[test]
    fn encodes_extensions_with_original_text() {
        let d = Duration::parse("60s").unwrap();
        assert_eq!(
            encode_value(&Value::Duration(d)),
            json!({"__extn": {"fn": "duration", "arg": "60s"}})
        );

        let dt = DateTime::parse("2023-12-25T07:00:00-0500").unwrap();
        assert_eq!(
            encode_value(&Value::DateTime(dt)),
            json!({"__extn": {"fn": "datetime", "arg": "2023-12-25T07:00:00-0500"}})
        );
    }

    #[test]
    fn offset_uses_args_array() {
        let v = Value::Offset {
            datetime: DateTime::parse("2023-01-01T00:00:00Z").unwrap(),
            duration: Duration::parse("1d5h").unwrap(),
        };
        assert_eq!(
            encode_value(&v),
            json!({"__extn": {"fn": "offset", "args": [
                {"__extn": {"fn": "datetime", "arg": "2023-01-01T00:00:00Z"}},
                {"__extn": {"fn": "duration", "arg": "1d5h"}}
            ]}})
        );
    }

    #[test]
    fn round_trips_a_mixed_document() {
        let doc = json!({
            "user": {"__entity": {"type": "App::User", "id": "alice"}},
            "scores": [1, 2, 3],
            "active": true,
            "tags": {"a": "x", "b": {"__extn": {"fn": "decimal", "arg": "1.5"}}},
            "window": {"__extn": {"fn": "duration", "arg": "1h30m"}},
            "ip": {"__extn": {"fn": "ip", "arg": "10.0.0.0/8"}},
            "when": {"__extn": {"fn": "datetime", "arg": "2024-02-29T12:00:00.500+0230"}},
            "pending": {"__extn": {"fn": "unknown", "arg": "ctx"}}
        });
        let value = decode_value(&doc).unwrap();
        let encoded = encode_value(&value);
        assert_eq!(encoded, doc);
        // And the re-decoded graph equals the first.
        assert_eq!(decode_value(&encoded).unwrap(), value);
    }

    #[test]
    fn round_trips_offset_identically() {
        let doc = json!({"__extn": {"fn": "offset", "args": [
            {"__extn": {"fn": "datetime", "arg": "2023-01-01T00:00:00Z"}},
            {"__extn": {"fn": "duration", "arg": "1d5h"}}
        ]}});
        let value = decode_value(&doc).unwrap();
        assert_eq!(encode_value(&value), doc);
        assert_eq!(
            serde_json::to_string(&encode_value(&value)).unwrap(),
            serde_json::to_string(&doc).unwrap()
        );
    }

    #[test]
    fn round_trip_preserves_temporal_semantics() {
        // "60s" and "1m" encode differently but decode to equal values.
        let a = decode_value(&json!({"__extn": {"fn": "duration", "arg": "60s"}})).unwrap();
        let b = decode_value(&json!({"__extn": {"fn": "duration", "arg": "1m"}})).unwrap();
        assert_eq!(a, b);
        assert_ne!(encode_value(&a), encode_value(&b));
    }

    #[test]
    fn empty_record_and_list_round_trip() {
        assert_eq!(
            encode_value(&Value::Record(BTreeMap::new())),
            json!({})
        );
        assert_eq!(encode_value(&Value::List(vec![])), json!([]));
    }
}
