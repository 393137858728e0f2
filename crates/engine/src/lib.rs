//! warrant-engine: request/response contract for the external
//! authorization engine.
//!
//! The engine itself (policy evaluation, schema validation) lives outside
//! this workspace and is reached through [`AuthorizationEngine`]; this
//! crate defines the envelopes it exchanges, encoded through the
//! `warrant-core` value codec.

mod error;
mod request;
mod response;
mod traits;

pub use error::EngineError;
pub use request::{AuthorizationRequest, ValidationRequest};
pub use response::{
    AuthorizationResponse, Decision, Diagnostics, Severity, ValidationNote, ValidationResponse,
};
pub use traits::AuthorizationEngine;
