/// All errors that can be returned by an AuthorizationEngine implementation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine rejected the request — malformed policy or schema text.
    /// The codec does not pre-validate those; the engine is authoritative.
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// The engine's reply did not match the response contract.
    #[error("malformed engine reply: {message}")]
    Protocol { message: String },

    /// An engine-internal failure.
    #[error("engine internal error: {message}")]
    Internal { message: String },
}
