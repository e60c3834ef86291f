//! Configuration for the sync engine.

use std::time::Duration;

/// Default minimum interval between two full syncs.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// Default deadline for a single remote call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of documents per upload request.
pub const DEFAULT_UPLOAD_BATCH_SIZE: usize = 500;

/// Configuration for sync operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Minimum time between two full syncs.
    pub cooldown: Duration,
    /// Deadline for each remote call.
    pub request_timeout: Duration,
    /// Maximum documents per upload request.
    pub upload_batch_size: usize,
}

impl SyncConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_batch_size: DEFAULT_UPLOAD_BATCH_SIZE,
        }
    }

    /// Sets the cooldown window.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the upload batch size. Zero is treated as one.
    pub fn with_upload_batch_size(mut self, size: usize) -> Self {
        self.upload_batch_size = size.max(1);
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
