use std::fmt;

/// Errors raised while decoding a value or entity document.
///
/// Every decode entry point returns one of these kinds as data; callers
/// pattern-match instead of catching by type. No error is recovered inside
/// the codec — a single malformed leaf fails the whole decode of its
/// containing document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The JSON node does not match any recognized value shape
    /// (e.g. null at a value position, non-object `__entity` payload).
    MalformedShape { message: String },
    /// An object carries a reserved escape key alongside other keys,
    /// or more than one reserved key.
    AmbiguousEscape { message: String },
    /// `__extn.fn` names a function outside the recognized set.
    UnknownFunction { function: String },
    /// Wrong argument count for an extension function.
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },
    /// Wrong argument kind for an extension function argument.
    ArgumentType {
        function: String,
        index: usize,
        expected: String,
        got: String,
    },
    /// A duration or datetime (or ip/decimal) literal fails its grammar.
    GrammarRejection {
        function: String,
        literal: String,
        message: String,
    },
    /// Duration millisecond accumulation exceeds the 64-bit signed range.
    Overflow { literal: String },
    /// Input nesting defeated the bounded-depth guard.
    RecursionDepthExceeded { max: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MalformedShape { message } => {
                write!(f, "malformed value: {}", message)
            }
            DecodeError::AmbiguousEscape { message } => {
                write!(f, "ambiguous escape: {}", message)
            }
            DecodeError::UnknownFunction { function } => {
                write!(f, "unknown extension function: '{}'", function)
            }
            DecodeError::ArityMismatch {
                function,
                expected,
                got,
            } => {
                write!(
                    f,
                    "extension function '{}' takes {} argument(s), got {}",
                    function, expected, got
                )
            }
            DecodeError::ArgumentType {
                function,
                index,
                expected,
                got,
            } => {
                write!(
                    f,
                    "extension function '{}' argument {} must be {}, got {}",
                    function, index, expected, got
                )
            }
            DecodeError::GrammarRejection {
                function,
                literal,
                message,
            } => {
                write!(f, "invalid {} literal '{}': {}", function, literal, message)
            }
            DecodeError::Overflow { literal } => {
                write!(f, "duration '{}' overflows the millisecond range", literal)
            }
            DecodeError::RecursionDepthExceeded { max } => {
                write!(f, "value nesting exceeds the maximum depth of {}", max)
            }
        }
    }
}

impl std::error::Error for DecodeError {}
