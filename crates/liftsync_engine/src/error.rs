//! Error types for the sync engine.

use liftsync_convert::ConvertError;
use liftsync_store::StoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can abort a pipeline or a coordinator run.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Network or remote store error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// A remote call did not complete within the request timeout.
    #[error("remote call timed out")]
    Timeout,

    /// A downloaded document could not be converted.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConvertError),

    /// Local persistence failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The pipeline registry is inconsistent.
    #[error("registry error: {0}")]
    Registry(String),

    /// User data was requested without a signed-in user.
    #[error("no user is signed in")]
    NotSignedIn,
}

impl SyncError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if a later run may succeed without intervention.
    ///
    /// The engine never retries within a run; callers use this to decide
    /// whether to schedule another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport { retryable, .. } => *retryable,
            SyncError::Timeout => true,
            SyncError::Store(StoreError::Io(_)) => true,
            _ => false,
        }
    }
}
