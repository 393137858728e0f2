//! Entity container documents.
//!
//! The engine consumes entities as `{"uid", "attrs", "parents", "tags"}`
//! containers; a full entities document is a JSON array of them. At this
//! position `uid` and each parent are bare `{"type", "id"}` objects — the
//! `__entity` wrapper only applies at value positions inside `attrs` and
//! `tags`.

use std::collections::BTreeMap;

use serde_json::json;

use crate::deserialize::{decode_at, decode_uid};
use crate::error::DecodeError;
use crate::serialize::{encode_value, uid_node};
use crate::value::{EntityUid, Value};

/// One entity: identity, attributes, parent references, and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub uid: EntityUid,
    pub attrs: BTreeMap<String, Value>,
    pub parents: Vec<EntityUid>,
    pub tags: BTreeMap<String, Value>,
}

impl Entity {
    pub fn new(uid: EntityUid) -> Entity {
        Entity {
            uid,
            attrs: BTreeMap::new(),
            parents: Vec::new(),
            tags: BTreeMap::new(),
        }
    }
}

/// Decode one entity container object.
///
/// `uid`, `attrs` and `parents` are required; `tags` is optional and
/// defaults to empty.
pub fn decode_entity(node: &serde_json::Value) -> Result<Entity, DecodeError> {
    let obj = node.as_object().ok_or_else(|| DecodeError::MalformedShape {
        message: "entity must be a JSON object".to_string(),
    })?;

    let uid = decode_uid(obj.get("uid").ok_or_else(|| DecodeError::MalformedShape {
        message: "entity missing 'uid'".to_string(),
    })?)?;

    let attrs = decode_value_map(obj.get("attrs"), "attrs")?.ok_or_else(|| {
        DecodeError::MalformedShape {
            message: "entity missing 'attrs'".to_string(),
        }
    })?;

    let parents_node = obj
        .get("parents")
        .ok_or_else(|| DecodeError::MalformedShape {
            message: "entity missing 'parents'".to_string(),
        })?
        .as_array()
        .ok_or_else(|| DecodeError::MalformedShape {
            message: "entity 'parents' must be a JSON array".to_string(),
        })?;
    let mut parents = Vec::with_capacity(parents_node.len());
    for parent in parents_node {
        parents.push(decode_uid(parent)?);
    }

    let tags = decode_value_map(obj.get("tags"), "tags")?.unwrap_or_default();

    Ok(Entity {
        uid,
        attrs,
        parents,
        tags,
    })
}

fn decode_value_map(
    node: Option<&serde_json::Value>,
    field: &str,
) -> Result<Option<BTreeMap<String, Value>>, DecodeError> {
    let node = match node {
        Some(n) => n,
        None => return Ok(None),
    };
    let obj = node.as_object().ok_or_else(|| DecodeError::MalformedShape {
        message: format!("entity '{}' must be a JSON object", field),
    })?;
    let mut map = BTreeMap::new();
    for (key, val) in obj {
        // The container itself is one level; values start below it.
        map.insert(key.clone(), decode_at(val, 1)?);
    }
    Ok(Some(map))
}

/// Encode one entity container object. `tags` is always emitted, even when
/// empty, so the output shape is uniform.
pub fn encode_entity(entity: &Entity) -> serde_json::Value {
    let attrs: serde_json::Map<String, serde_json::Value> = entity
        .attrs
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect();
    let tags: serde_json::Map<String, serde_json::Value> = entity
        .tags
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect();
    let parents: Vec<serde_json::Value> = entity.parents.iter().map(uid_node).collect();
    json!({
        "uid": uid_node(&entity.uid),
        "attrs": attrs,
        "parents": parents,
        "tags": tags,
    })
}

/// Decode an entities document: a JSON array of entity containers.
pub fn decode_entities(node: &serde_json::Value) -> Result<Vec<Entity>, DecodeError> {
    let arr = node.as_array().ok_or_else(|| DecodeError::MalformedShape {
        message: "entities document must be a JSON array".to_string(),
    })?;
    arr.iter().map(decode_entity).collect()
}

/// Encode an entities document.
pub fn encode_entities(entities: &[Entity]) -> serde_json::Value {
    serde_json::Value::Array(entities.iter().map(encode_entity).collect())
}
