//! Response envelopes received from the external engine.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The engine's authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
}

/// Why the engine decided the way it did: the ids of determining policies
/// and any evaluation errors encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    #[serde(default)]
    pub reason: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Reply to an authorization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    pub decision: Decision,
    #[serde(default)]
    pub diagnostics: Diagnostics,
}

impl AuthorizationResponse {
    /// Parse an engine reply, reporting contract mismatches as
    /// [`EngineError::Protocol`].
    pub fn from_json(node: serde_json::Value) -> Result<AuthorizationResponse, EngineError> {
        serde_json::from_value(node).map_err(|e| EngineError::Protocol {
            message: e.to_string(),
        })
    }

    pub fn is_allowed(&self) -> bool {
        self.decision == Decision::Allow
    }
}

/// Severity of a validation note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One finding from validating policies against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationNote {
    pub policy_id: String,
    pub severity: Severity,
    pub note: String,
}

/// Reply to a validation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    pub notes: Vec<ValidationNote>,
}

impl ValidationResponse {
    /// Parse an engine reply, reporting contract mismatches as
    /// [`EngineError::Protocol`].
    pub fn from_json(node: serde_json::Value) -> Result<ValidationResponse, EngineError> {
        serde_json::from_value(node).map_err(|e| EngineError::Protocol {
            message: e.to_string(),
        })
    }

    /// Whether the policy set validated without errors (warnings allowed).
    pub fn passed(&self) -> bool {
        self.notes.iter().all(|n| n.severity != Severity::Error)
    }
}
