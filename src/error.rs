//! Error types for doppelganger.
//!
//! All errors are strongly typed using thiserror so tests can match on the
//! exact failure (an unknown attribute, a non-callable value, a failed
//! construction) instead of comparing strings.

use thiserror::Error;

/// Errors raised while resolving or writing an attribute.
#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("'{class}' object has no attribute '{name}'")]
    NoSuchAttribute {
        class: String,
        name: String,
    },

    #[error("attribute '{name}' of '{class}' objects is not writable")]
    ReadOnly {
        class: String,
        name: String,
    },
}

/// Errors raised while invoking a value.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("'{type_name}' value is not callable")]
    NotCallable {
        type_name: &'static str,
    },

    #[error("receiver of bound method '{method}' no longer exists")]
    ReceiverDropped {
        method: String,
    },

    #[error("unbound function '{function}' requires an object receiver as its first argument")]
    MissingReceiver {
        function: String,
    },

    #[error("call to '{function}' failed: {reason}")]
    Failed {
        function: String,
        reason: String,
    },
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum DoubleError {
    #[error("Attribute error: {0}")]
    Attribute(#[from] AttributeError),

    #[error("Call error: {0}")]
    Call(#[from] CallError),

    #[error("Failed to construct '{class}': {reason}")]
    Construction {
        class: String,
        reason: String,
    },

    #[error("Invalid double configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl DoubleError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a construction error for `class`.
    #[must_use]
    pub fn construction(class: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Construction {
            class: class.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is an attribute error.
    #[must_use]
    pub const fn is_attribute(&self) -> bool {
        matches!(self, Self::Attribute(_))
    }

    /// Returns true if this is an unknown-attribute error.
    #[must_use]
    pub const fn is_no_such_attribute(&self) -> bool {
        matches!(self, Self::Attribute(AttributeError::NoSuchAttribute { .. }))
    }

    /// Returns true if this is a call error.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::Call(_))
    }

    /// Returns true if this is a construction error.
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        matches!(self, Self::Construction { .. })
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for doppelganger operations.
pub type DoubleResult<T> = Result<T, DoubleError>;
