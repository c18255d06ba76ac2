//! Error types for the object engine

use thiserror::Error;

/// Main error type for property and object operations.
///
/// `TypeError` and `RangeError` are script-visible and recoverable through
/// exception handling. `MemoryError` aborts the current operation; the
/// embedder decides whether the whole script dies. `Internal` marks a broken
/// engine invariant and should never be observable in a correct build.
#[derive(Debug, Error)]
pub enum JsError {
    #[error("TypeError: {message}")]
    TypeError { message: String },

    #[error("RangeError: {message}")]
    RangeError { message: String },

    #[error("MemoryError: {message}")]
    MemoryError { message: String },

    #[error("InternalError: {message}")]
    Internal { message: String },
}

impl JsError {
    pub fn type_error(message: impl Into<String>) -> Self {
        JsError::TypeError {
            message: message.into(),
        }
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        JsError::RangeError {
            message: message.into(),
        }
    }

    pub fn memory_error(message: impl Into<String>) -> Self {
        JsError::MemoryError {
            message: message.into(),
        }
    }

    /// Create an internal error for unexpected engine states.
    /// These should never happen in correctly-written code.
    pub fn internal_error(message: impl Into<String>) -> Self {
        JsError::Internal {
            message: message.into(),
        }
    }

    /// Script-visible constructor name of the error
    pub fn name(&self) -> &'static str {
        match self {
            JsError::TypeError { .. } => "TypeError",
            JsError::RangeError { .. } => "RangeError",
            JsError::MemoryError { .. } => "MemoryError",
            JsError::Internal { .. } => "InternalError",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            JsError::TypeError { message }
            | JsError::RangeError { message }
            | JsError::MemoryError { message }
            | JsError::Internal { message } => message,
        }
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, JsError::TypeError { .. })
    }
}
