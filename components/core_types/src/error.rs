//! JavaScript error types and host-level VM errors.
//!
//! [`JsError`] is a language-level exception: it becomes the pending
//! exception of a thread and surfaces to callers as
//! [`TaggedValue::EXCEPTION`](crate::TaggedValue::EXCEPTION). [`VmError`]
//! covers failures of the host itself, such as a bad configuration.

use std::fmt;

use thiserror::Error;

/// The kind of JavaScript error.
///
/// These correspond to JavaScript's built-in error constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Syntax error in JavaScript code
    SyntaxError,
    /// Type error (e.g., converting a Symbol to a number)
    TypeError,
    /// Reference to an undefined variable
    ReferenceError,
    /// Value out of allowed range
    RangeError,
    /// Internal engine error
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

/// A JavaScript error with kind and message.
///
/// # Examples
///
/// ```
/// use core_types::{JsError, ErrorKind};
///
/// let error = JsError::type_error("Cannot convert a Symbol value to a number");
/// assert_eq!(error.kind, ErrorKind::TypeError);
/// assert_eq!(
///     error.to_string(),
///     "TypeError: Cannot convert a Symbol value to a number"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl JsError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a `TypeError`.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    /// Creates a `RangeError`.
    pub fn range_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeError, message)
    }
}

/// Result of an operation that may throw a JavaScript exception.
pub type JsResult<T> = Result<T, JsError>;

/// Host-level failures of the VM.
#[derive(Debug, Error)]
pub enum VmError {
    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration document could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// An allocation would grow the heap past its limit
    #[error("heap exhausted: requested {requested} bytes, limit is {limit} bytes")]
    HeapExhausted {
        /// Bytes needed after collection
        requested: usize,
        /// Configured maximum
        limit: usize,
    },
}
