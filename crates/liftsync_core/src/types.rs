//! Core value types for LiftSync.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Scope id used for entities shared by every user (the exercise catalog).
pub const SYSTEM_SCOPE_ID: &str = "__system__";

/// A wall-clock instant in milliseconds since the Unix epoch.
///
/// Local records, bookmarks and the cooldown gate all use this
/// representation. Remote documents carry a `{seconds, nanos}` pair instead;
/// conversion lives in `liftsync_convert`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The Unix epoch. Used as the lower bound of a first (full) sync.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Creates a timestamp from epoch milliseconds.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the current system time.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(i64::try_from(millis).unwrap_or(i64::MAX))
    }

    /// Returns epoch milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns true if this is the epoch (never synced).
    #[must_use]
    pub const fn is_epoch(self) -> bool {
        self.0 == 0
    }

    /// Returns this timestamp shifted forward by `duration`.
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Returns the elapsed time from `earlier` to `self`, or zero if `earlier`
    /// is in the future.
    #[must_use]
    pub fn duration_since(self, earlier: Timestamp) -> Duration {
        let delta = self.0.saturating_sub(earlier.0);
        Duration::from_millis(u64::try_from(delta).unwrap_or(0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

/// The data partition a pipeline run operates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyncScope {
    /// Shared read-only catalog data.
    System,
    /// Data owned by one user account.
    User(String),
}

impl SyncScope {
    /// Creates a user scope.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::User(user_id.into())
    }

    /// Returns the scope id stored in sync metadata and sent to the remote
    /// store: the user id, or [`SYSTEM_SCOPE_ID`].
    #[must_use]
    pub fn scope_id(&self) -> &str {
        match self {
            SyncScope::System => SYSTEM_SCOPE_ID,
            SyncScope::User(user_id) => user_id,
        }
    }

    /// Returns true for the system scope.
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, SyncScope::System)
    }
}

impl fmt::Display for SyncScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncScope::System => write!(f, "system"),
            SyncScope::User(user_id) => write!(f, "user:{user_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_ordering_and_arithmetic() {
        let t0 = Timestamp::from_millis(1_000);
        let t1 = t0.saturating_add(Duration::from_secs(2));

        assert!(t1 > t0);
        assert_eq!(t1.as_millis(), 3_000);
        assert_eq!(t1.duration_since(t0), Duration::from_secs(2));
        assert_eq!(t0.duration_since(t1), Duration::ZERO);
    }

    #[test]
    fn epoch_detection() {
        assert!(Timestamp::EPOCH.is_epoch());
        assert!(Timestamp::default().is_epoch());
        assert!(!Timestamp::now().is_epoch());
    }

    #[test]
    fn scope_ids() {
        assert_eq!(SyncScope::System.scope_id(), SYSTEM_SCOPE_ID);
        assert_eq!(SyncScope::user("user-1").scope_id(), "user-1");
        assert!(SyncScope::System.is_system());
        assert_eq!(SyncScope::user("u").to_string(), "user:u");
    }
}
