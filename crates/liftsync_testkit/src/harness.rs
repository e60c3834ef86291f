//! Multi-device harness.
//!
//! A [`SyncWorld`] is one backend: a shared [`MemoryRemoteStore`] and a
//! shared [`ManualClock`] that both the store and the devices read. Each [`Device`] it creates has its own local
//! database, preferences and bookmarks, like separate installations of the
//! app signed in to the same account.

use liftsync_core::Timestamp;
use liftsync_engine::{
    Clock, ManualClock, MemoryRemoteStore, RemoteStore, SessionIdentity, SyncConfig,
    SyncCoordinator, SyncRegistry,
};
use liftsync_store::{LocalCollections, MemoryDatabase, MemoryKeyValueStore, MemoryMetadataStore};
use std::sync::Arc;
use std::time::Duration;

/// Clock reading every world starts at.
pub const WORLD_START: Timestamp = Timestamp::from_millis(1_700_000_000_000);

/// A shared backend and clock.
pub struct SyncWorld {
    /// The remote store every device talks to.
    pub remote: Arc<MemoryRemoteStore>,
    /// The clock every device reads.
    pub clock: Arc<ManualClock>,
    config: SyncConfig,
}

impl Default for SyncWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncWorld {
    /// Creates an empty backend with the default configuration.
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(WORLD_START));
        Self {
            remote: Arc::new(MemoryRemoteStore::with_clock(clock.clone())),
            clock,
            config: SyncConfig::default(),
        }
    }

    /// Uses `config` for devices created afterwards.
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Creates a device with empty local state.
    pub fn device(&self) -> Device {
        self.device_with_clock(self.clock.clone())
    }

    /// Creates a device reading its own clock instead of the world's.
    pub fn device_with_clock(&self, clock: Arc<ManualClock>) -> Device {
        let db = MemoryDatabase::new();
        let local = db.collections();
        let remote: Arc<dyn RemoteStore> = self.remote.clone();
        let registry =
            SyncRegistry::standard(remote, &local).expect("standard registry is acyclic");
        let prefs = Arc::new(MemoryKeyValueStore::new());
        let metadata = Arc::new(MemoryMetadataStore::new());
        let identity = Arc::new(SessionIdentity::new());
        let coordinator =
            SyncCoordinator::new(registry, prefs.clone(), metadata.clone(), identity.clone())
                .with_config(self.config.clone())
                .with_clock(clock);
        Device {
            db,
            local,
            prefs,
            metadata,
            identity,
            coordinator,
        }
    }

    /// Current clock reading.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Moves the shared clock forward.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

/// One installation of the app.
pub struct Device {
    /// Local database, for foreign-key lookups.
    pub db: MemoryDatabase,
    /// Local table accessors.
    pub local: LocalCollections,
    /// Preferences (installation id, last sync time).
    pub prefs: Arc<MemoryKeyValueStore>,
    /// Sync bookmarks.
    pub metadata: Arc<MemoryMetadataStore>,
    /// Signed-in user.
    pub identity: Arc<SessionIdentity>,
    /// The device's coordinator.
    pub coordinator: SyncCoordinator,
}
