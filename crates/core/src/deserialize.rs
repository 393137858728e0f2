//! Decoding JSON documents into [`Value`] graphs.
//!
//! The entry point is [`decode_value`]. Decoding is structurally recursive
//! over the JSON tree with an explicit depth counter: the wire format
//! accepts caller-controlled nesting, and exhausting it must surface as a
//! typed [`DecodeError::RecursionDepthExceeded`], not a stack fault.

use std::collections::BTreeMap;

use crate::error::DecodeError;
use crate::extension::decode_extension;
use crate::value::{EntityTypeName, EntityUid, Value};

/// Reserved object key marking an entity-reference escape.
pub const ENTITY_ESCAPE: &str = "__entity";
/// Reserved object key marking an extension-value escape.
pub const EXTENSION_ESCAPE: &str = "__extn";

/// Maximum nesting depth the decoder will walk.
pub const MAX_DEPTH: usize = 1024;

/// Decode a JSON node into a [`Value`].
pub fn decode_value(node: &serde_json::Value) -> Result<Value, DecodeError> {
    decode_at(node, 0)
}

pub(crate) fn decode_at(node: &serde_json::Value, depth: usize) -> Result<Value, DecodeError> {
    if depth >= MAX_DEPTH {
        return Err(DecodeError::RecursionDepthExceeded { max: MAX_DEPTH });
    }

    match node {
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            let long = n.as_i64().ok_or_else(|| DecodeError::MalformedShape {
                message: format!("number {} is not a 64-bit integer", n),
            })?;
            Ok(Value::Long(long))
        }
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.push(decode_at(item, depth + 1)?);
            }
            Ok(Value::List(list))
        }
        serde_json::Value::Object(obj) => decode_object(obj, depth),
        serde_json::Value::Null => Err(DecodeError::MalformedShape {
            message: "null is not a value".to_string(),
        }),
    }
}

/// One pass over the object's entries: count occurrences of the two
/// reserved keys, then branch. Exactly one reserved key as the sole key
/// dispatches to the escape; a reserved key with any sibling is ambiguous;
/// no reserved key means a plain record.
fn decode_object(
    obj: &serde_json::Map<String, serde_json::Value>,
    depth: usize,
) -> Result<Value, DecodeError> {
    let mut reserved = 0usize;
    for key in obj.keys() {
        if key == ENTITY_ESCAPE || key == EXTENSION_ESCAPE {
            reserved += 1;
        }
    }

    match reserved {
        0 => {
            let mut fields = BTreeMap::new();
            for (key, val) in obj {
                fields.insert(key.clone(), decode_at(val, depth + 1)?);
            }
            Ok(Value::Record(fields))
        }
        1 if obj.len() == 1 => {
            if let Some(payload) = obj.get(ENTITY_ESCAPE) {
                decode_entity_ref(payload)
            } else {
                decode_extension(&obj[EXTENSION_ESCAPE], depth)
            }
        }
        1 => Err(DecodeError::AmbiguousEscape {
            message: "reserved escape key with sibling keys".to_string(),
        }),
        _ => Err(DecodeError::AmbiguousEscape {
            message: "more than one reserved escape key".to_string(),
        }),
    }
}

fn decode_entity_ref(payload: &serde_json::Value) -> Result<Value, DecodeError> {
    Ok(Value::Entity(decode_uid(payload)?))
}

/// Decode a bare `{"type": …, "id": …}` object into an [`EntityUid`].
/// Exactly those two keys, both strings, type name well-formed.
pub(crate) fn decode_uid(node: &serde_json::Value) -> Result<EntityUid, DecodeError> {
    let obj = node.as_object().ok_or_else(|| DecodeError::MalformedShape {
        message: "entity reference must be a {\"type\", \"id\"} object".to_string(),
    })?;
    if obj.len() != 2 || !obj.contains_key("type") || !obj.contains_key("id") {
        return Err(DecodeError::MalformedShape {
            message: "entity reference must have exactly the keys 'type' and 'id'".to_string(),
        });
    }
    let type_text = obj
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| DecodeError::MalformedShape {
            message: "entity 'type' must be a string".to_string(),
        })?;
    let id = obj
        .get("id")
        .and_then(|i| i.as_str())
        .ok_or_else(|| DecodeError::MalformedShape {
            message: "entity 'id' must be a string".to_string(),
        })?;
    let type_name = EntityTypeName::parse(type_text)?;
    Ok(EntityUid::new(type_name, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_primitives() {
        assert_eq!(decode_value(&json!(true)).unwrap(), Value::Bool(true));
        assert_eq!(decode_value(&json!(42)).unwrap(), Value::Long(42));
        assert_eq!(decode_value(&json!(-1)).unwrap(), Value::Long(-1));
        assert_eq!(
            decode_value(&json!("hello")).unwrap(),
            Value::String("hello".to_string())
        );
    }

    #[test]
    fn rejects_null_and_non_integer_numbers() {
        assert!(matches!(
            decode_value(&json!(null)),
            Err(DecodeError::MalformedShape { .. })
        ));
        assert!(decode_value(&json!(1.5)).is_err());
        assert!(decode_value(&json!(u64::MAX)).is_err());
    }

    #[test]
    fn decodes_lists_recursively() {
        let v = decode_value(&json!([1, "a", [true]])).unwrap();
        assert_eq!(
            v,
            Value::List(vec![
                Value::Long(1),
                Value::String("a".to_string()),
                Value::List(vec![Value::Bool(true)]),
            ])
        );
    }

    #[test]
    fn decodes_records() {
        let v = decode_value(&json!({"name": "alice", "age": 30})).unwrap();
        match v {
            Value::Record(fields) => {
                assert_eq!(fields["name"], Value::String("alice".to_string()));
                assert_eq!(fields["age"], Value::Long(30));
            }
            other => panic!("expected Record, got {:?}", other),
        }
    }

    #[test]
    fn empty_object_is_empty_record() {
        assert_eq!(decode_value(&json!({})).unwrap(), Value::Record(BTreeMap::new()));
    }

    #[test]
    fn decodes_entity_escape() {
        let v = decode_value(&json!({"__entity": {"type": "NS::User", "id": "alice"}})).unwrap();
        match v {
            Value::Entity(uid) => {
                assert_eq!(uid.type_name().to_string(), "NS::User");
                assert_eq!(uid.id(), "alice");
            }
            other => panic!("expected Entity, got {:?}", other),
        }
    }

    #[test]
    fn entity_escape_rejects_bad_payloads() {
        // Not an object.
        assert!(decode_value(&json!({"__entity": "User::\"alice\""})).is_err());
        // Missing id.
        assert!(decode_value(&json!({"__entity": {"type": "User"}})).is_err());
        // Extra key in the payload.
        assert!(
            decode_value(&json!({"__entity": {"type": "User", "id": "a", "extra": 1}})).is_err()
        );
        // Non-string fields.
        assert!(decode_value(&json!({"__entity": {"type": "User", "id": 7}})).is_err());
        // Invalid type name.
        assert!(decode_value(&json!({"__entity": {"type": "Bad Name", "id": "a"}})).is_err());
        assert!(decode_value(&json!({"__entity": {"type": "", "id": "a"}})).is_err());
    }

    #[test]
    fn ambiguous_escapes_are_rejected() {
        let sibling = json!({"__entity": {"type": "User", "id": "a"}, "extra": 1});
        assert!(matches!(
            decode_value(&sibling),
            Err(DecodeError::AmbiguousEscape { .. })
        ));

        let both = json!({
            "__entity": {"type": "User", "id": "a"},
            "__extn": {"fn": "ip", "arg": "127.0.0.1"}
        });
        assert!(matches!(
            decode_value(&both),
            Err(DecodeError::AmbiguousEscape { .. })
        ));

        let extn_sibling = json!({"__extn": {"fn": "ip", "arg": "127.0.0.1"}, "x": 1});
        assert!(matches!(
            decode_value(&extn_sibling),
            Err(DecodeError::AmbiguousEscape { .. })
        ));
    }

    #[test]
    fn reserved_looking_keys_in_plain_records() {
        // Keys that merely resemble the reserved ones decode as a record.
        let v = decode_value(&json!({"__entityy": 1, "_extn": 2})).unwrap();
        assert!(matches!(v, Value::Record(_)));
    }

    #[test]
    fn decodes_extension_values() {
        let ip = decode_value(&json!({"__extn": {"fn": "ip", "arg": "192.168.1.0/24"}})).unwrap();
        assert_eq!(ip, Value::Ip("192.168.1.0/24".to_string()));

        let dec = decode_value(&json!({"__extn": {"fn": "decimal", "arg": "3.14"}})).unwrap();
        assert_eq!(dec, Value::Decimal("3.14".to_string()));

        let dt =
            decode_value(&json!({"__extn": {"fn": "datetime", "arg": "2023-01-01T00:00:00Z"}}))
                .unwrap();
        match dt {
            Value::DateTime(d) => assert_eq!(d.as_str(), "2023-01-01T00:00:00Z"),
            other => panic!("expected DateTime, got {:?}", other),
        }

        let dur = decode_value(&json!({"__extn": {"fn": "duration", "arg": "1h30m"}})).unwrap();
        match dur {
            Value::Duration(d) => assert_eq!(d.total_milliseconds(), 5_400_000),
            other => panic!("expected Duration, got {:?}", other),
        }

        let unk = decode_value(&json!({"__extn": {"fn": "unknown", "arg": "anything goes"}}))
            .unwrap();
        assert_eq!(unk, Value::Unknown("anything goes".to_string()));
    }

    #[test]
    fn unknown_function_is_named_in_the_error() {
        let err =
            decode_value(&json!({"__extn": {"fn": "sqrt", "arg": "2"}})).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownFunction {
                function: "sqrt".to_string()
            }
        );
    }

    #[test]
    fn extension_shape_errors() {
        assert!(decode_value(&json!({"__extn": "ip"})).is_err());
        assert!(decode_value(&json!({"__extn": {"arg": "127.0.0.1"}})).is_err());
        assert!(decode_value(&json!({"__extn": {"fn": 7, "arg": "x"}})).is_err());
        assert!(decode_value(&json!({"__extn": {"fn": "ip"}})).is_err());
        assert!(decode_value(&json!({"__extn": {"fn": "ip", "arg": 9}})).is_err());
    }

    #[test]
    fn grammar_rejections_surface_from_extensions() {
        assert!(matches!(
            decode_value(&json!({"__extn": {"fn": "duration", "arg": "2h1d"}})),
            Err(DecodeError::GrammarRejection { .. })
        ));
        assert!(matches!(
            decode_value(&json!({"__extn": {"fn": "datetime", "arg": "2023-02-29"}})),
            Err(DecodeError::GrammarRejection { .. })
        ));
        assert!(matches!(
            decode_value(
                &json!({"__extn": {"fn": "duration", "arg": "9223372036854775808ms"}})
            ),
            Err(DecodeError::Overflow { .. })
        ));
    }

    #[test]
    fn decodes_offset() {
        let node = json!({"__extn": {"fn": "offset", "args": [
            {"__extn": {"fn": "datetime", "arg": "2023-01-01T00:00:00Z"}},
            {"__extn": {"fn": "duration", "arg": "1d5h"}}
        ]}});
        match decode_value(&node).unwrap() {
            Value::Offset { datetime, duration } => {
                assert_eq!(datetime.as_str(), "2023-01-01T00:00:00Z");
                assert_eq!(duration.as_str(), "1d5h");
            }
            other => panic!("expected Offset, got {:?}", other),
        }
    }

    #[test]
    fn offset_arity_and_type_errors() {
        let missing = json!({"__extn": {"fn": "offset"}});
        assert!(matches!(
            decode_value(&missing),
            Err(DecodeError::MalformedShape { .. })
        ));

        let not_array = json!({"__extn": {"fn": "offset", "args": "nope"}});
        assert!(matches!(
            decode_value(&not_array),
            Err(DecodeError::MalformedShape { .. })
        ));

        let one_arg = json!({"__extn": {"fn": "offset", "args": [
            {"__extn": {"fn": "datetime", "arg": "2023-01-01"}}
        ]}});
        assert_eq!(
            decode_value(&one_arg).unwrap_err(),
            DecodeError::ArityMismatch {
                function: "offset".to_string(),
                expected: 2,
                got: 1,
            }
        );

        let swapped = json!({"__extn": {"fn": "offset", "args": [
            {"__extn": {"fn": "duration", "arg": "1d"}},
            {"__extn": {"fn": "datetime", "arg": "2023-01-01"}}
        ]}});
        assert_eq!(
            decode_value(&swapped).unwrap_err(),
            DecodeError::ArgumentType {
                function: "offset".to_string(),
                index: 0,
                expected: "DateTime".to_string(),
                got: "Duration".to_string(),
            }
        );

        let second_bad = json!({"__extn": {"fn": "offset", "args": [
            {"__extn": {"fn": "datetime", "arg": "2023-01-01"}},
            42
        ]}});
        assert_eq!(
            decode_value(&second_bad).unwrap_err(),
            DecodeError::ArgumentType {
                function: "offset".to_string(),
                index: 1,
                expected: "Duration".to_string(),
                got: "Long".to_string(),
            }
        );
    }

    #[test]
    fn depth_guard_trips_before_the_stack_does() {
        // An object whose sole value is MAX_DEPTH nested empty arrays.
        let mut node = json!([]);
        for _ in 0..MAX_DEPTH {
            node = serde_json::Value::Array(vec![node]);
        }
        let doc = json!({ "deep": node });
        assert_eq!(
            decode_value(&doc).unwrap_err(),
            DecodeError::RecursionDepthExceeded { max: MAX_DEPTH }
        );
    }

    #[test]
    fn nesting_below_the_limit_decodes() {
        let mut node = json!(true);
        for _ in 0..100 {
            node = serde_json::Value::Array(vec![node]);
        }
        assert!(decode_value(&node).is_ok());
    }
}
