//! Error types for local store operations.

use std::io;
use thiserror::Error;

/// Result type for local store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing local state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A value could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A row points at a row that does not exist.
    #[error("{table}/{id} references missing {referenced_table}/{referenced_id}")]
    MissingReference {
        /// Table of the rejected row.
        table: &'static str,
        /// Id of the rejected row.
        id: String,
        /// Table of the missing row.
        referenced_table: &'static str,
        /// Id of the missing row.
        referenced_id: String,
    },

    /// Persisted state could not be read back.
    #[error("store corrupted: {0}")]
    Corrupted(String),
}
