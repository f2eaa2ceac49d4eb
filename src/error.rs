//! Error types
//!
//! Every fallible operation returns [`JsResult`]. Errors raised by the engine
//! itself are carried as [`JsError::Native`] until some code needs them as a
//! language value (see `Context::error_to_value`); values thrown by host or
//! user callbacks travel as [`JsError::Thrown`] and are never wrapped.

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Native error constructors known to the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Error,
    TypeError,
    RangeError,
    ReferenceError,
    SyntaxError,
}

impl ErrorKind {
    /// The `name` property of the matching prototype
    pub const fn name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An abrupt completion
#[derive(Debug, Clone, Error)]
pub enum JsError {
    /// Error raised by the engine, not yet materialized as an object
    #[error("{kind}: {message}")]
    Native { kind: ErrorKind, message: String },
    /// Arbitrary thrown value
    #[error("uncaught exception: {0:?}")]
    Thrown(Value),
}

impl JsError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        JsError::Native {
            kind,
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeError, message)
    }

    pub fn reference_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReferenceError, message)
    }

    /// Throw an arbitrary value
    pub fn thrown(value: impl Into<Value>) -> Self {
        JsError::Thrown(value.into())
    }

    /// Kind of an engine-raised error
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            JsError::Native { kind, .. } => Some(*kind),
            JsError::Thrown(_) => None,
        }
    }
}

/// Result type for runtime operations
pub type JsResult<T> = Result<T, JsError>;
