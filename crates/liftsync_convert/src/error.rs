//! Error types for document conversion.

use liftsync_core::EntityType;
use thiserror::Error;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors raised while turning a remote document into a local record.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A required identifier is absent or empty.
    #[error("{entity} document is missing required field `{field}`")]
    MissingField {
        /// Entity type being converted.
        entity: EntityType,
        /// Remote field name.
        field: &'static str,
    },

    /// A field holds a value that cannot be represented locally.
    #[error("{entity} document has invalid `{field}`: {message}")]
    InvalidValue {
        /// Entity type being converted.
        entity: EntityType,
        /// Remote field name.
        field: &'static str,
        /// What was wrong.
        message: String,
    },

    /// The document body is not valid for its shape.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Creates a missing-field error.
    pub fn missing(entity: EntityType, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }

    /// Creates an invalid-value error.
    pub fn invalid(entity: EntityType, field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            entity,
            field,
            message: message.into(),
        }
    }
}
