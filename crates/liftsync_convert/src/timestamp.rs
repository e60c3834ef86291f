//! Remote timestamp representation.

use liftsync_core::Timestamp;
use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MILLI: i64 = 1_000_000;

/// A document-store timestamp: whole seconds plus a nanosecond fraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RemoteTimestamp {
    /// Seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second part, `0..1_000_000_000`.
    pub nanos: i32,
}

impl RemoteTimestamp {
    /// Creates a remote timestamp.
    #[must_use]
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Returns true if `nanos` is in range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (0..NANOS_PER_SECOND).contains(&i64::from(self.nanos))
    }

    /// Converts to a local timestamp, truncating below millisecond precision.
    ///
    /// Returns `None` if `nanos` is out of range.
    #[must_use]
    pub fn to_timestamp(self) -> Option<Timestamp> {
        if !self.is_valid() {
            return None;
        }
        let millis = self
            .seconds
            .saturating_mul(1_000)
            .saturating_add(i64::from(self.nanos) / NANOS_PER_MILLI);
        Some(Timestamp::from_millis(millis))
    }
}

impl From<Timestamp> for RemoteTimestamp {
    fn from(timestamp: Timestamp) -> Self {
        let millis = timestamp.as_millis();
        let nanos = millis.rem_euclid(1_000) * NANOS_PER_MILLI;
        Self {
            seconds: millis.div_euclid(1_000),
            // Always below one second, so it fits.
            nanos: i32::try_from(nanos).unwrap_or(0),
        }
    }
}
