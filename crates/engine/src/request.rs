//! Request envelopes handed to the external engine.
//!
//! These carry already-decoded, already-validated value data; the engine
//! wire JSON is produced through the core codec so context values and
//! entity attributes use the escaped value encoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use warrant_core::{encode_entities, encode_value, Entity, EntityUid, Value};

/// An authorization request: who (principal) wants to do what (action) on
/// which resource, under which context, against which policies/entities.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub principal: EntityUid,
    pub action: EntityUid,
    pub resource: EntityUid,
    /// Context record; values use the escaped value encoding on the wire.
    pub context: BTreeMap<String, Value>,
    /// Policy set text, passed through verbatim.
    pub policies: String,
    /// The entity slice relevant to this request.
    pub entities: Vec<Entity>,
    /// Optional schema text, passed through verbatim.
    pub schema: Option<String>,
}

impl AuthorizationRequest {
    /// Encode to the engine wire JSON.
    pub fn to_json(&self) -> serde_json::Value {
        let context: serde_json::Map<String, serde_json::Value> = self
            .context
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect();
        let mut doc = json!({
            "principal": uid_json(&self.principal),
            "action": uid_json(&self.action),
            "resource": uid_json(&self.resource),
            "context": context,
            "policies": self.policies,
            "entities": encode_entities(&self.entities),
        });
        if let Some(schema) = &self.schema {
            doc["schema"] = json!(schema);
        }
        doc
    }
}

fn uid_json(uid: &EntityUid) -> serde_json::Value {
    json!({ "type": uid.type_name().to_string(), "id": uid.id() })
}

/// A validation request: policies checked against a schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationRequest {
    pub schema: String,
    pub policies: String,
}
