use crate::error::EngineError;
use crate::request::{AuthorizationRequest, ValidationRequest};
use crate::response::{AuthorizationResponse, ValidationResponse};

/// The seam to the external authorization/validation engine.
///
/// Implementations receive already-decoded, already-validated value data;
/// the internal algorithm is not specified here. Malformed policy or
/// schema text is the engine's to report, as
/// [`EngineError::BadRequest`] — the codec never pre-validates it.
///
/// Both operations are bounded, synchronous computations over the request;
/// implementations must be safe to share across threads.
pub trait AuthorizationEngine: Send + Sync {
    /// Decide an authorization request.
    fn is_authorized(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<AuthorizationResponse, EngineError>;

    /// Validate a policy set against a schema.
    fn validate(&self, request: &ValidationRequest) -> Result<ValidationResponse, EngineError>;
}
