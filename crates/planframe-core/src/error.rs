//! Error types for planning frames.

use thiserror::Error;

/// Main error type for frame operations.
#[derive(Error, Debug, Clone)]
pub enum FrameError {
    /// Input does not fit the typed frame shape.
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// A frame was refused because its references do not resolve.
    #[error("Validation errors: {errors:?}")]
    ValidationFailed { errors: Vec<String> },

    /// Resource not found.
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    /// Durable store error.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A capability (e.g. optimization) is not available.
    #[error("{capability} not supported: {message}")]
    NotSupported { capability: String, message: String },
}

impl FrameError {
    /// Shorthand for a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        FrameError::Schema {
            message: message.into(),
        }
    }

    /// Shorthand for a missing frame.
    pub fn frame_not_found(id: impl Into<String>) -> Self {
        FrameError::NotFound {
            resource_type: "frame".to_string(),
            id: id.into(),
        }
    }

    /// Returns true if the caller supplied bad input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FrameError::Schema { .. } | FrameError::ValidationFailed { .. }
        )
    }
}

/// Convenience Result type for frame operations.
pub type Result<T> = std::result::Result<T, FrameError>;

impl From<serde_json::Error> for FrameError {
    fn from(err: serde_json::Error) -> Self {
        FrameError::SerializationError(err.to_string())
    }
}
