//! Key-value preferences.

use crate::error::{StoreError, StoreResult};
use crate::json_file;
use liftsync_core::Timestamp;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Key holding the installation id.
pub const INSTALLATION_ID_KEY: &str = "installation_id";

/// Key holding the last successful full sync time, in epoch milliseconds.
pub const LAST_SYNC_TIME_KEY: &str = "last_sync_time";

/// A small persistent string map, the equivalent of platform preferences.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// [`KeyValueStore`] persisted as a JSON object.
///
/// The file is read once at open; every write rewrites it atomically.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// Opens the store at `path`, creating it on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            values: RwLock::new(json_file::load(path)?),
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut values = self.values.write();
        let previous = values.insert(key.to_string(), value.to_string());
        if let Err(err) = json_file::save(&self.path, &*values) {
            // Keep memory in step with disk.
            match previous {
                Some(previous) => values.insert(key.to_string(), previous),
                None => values.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut values = self.values.write();
        if let Some(previous) = values.remove(key) {
            if let Err(err) = json_file::save(&self.path, &*values) {
                values.insert(key.to_string(), previous);
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Typed access to the coordinator's persisted bookkeeping.
#[derive(Clone)]
pub struct SyncBookkeeping {
    store: Arc<dyn KeyValueStore>,
}

impl SyncBookkeeping {
    /// Wraps a key-value store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Returns the last successful full sync time, or the epoch if none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupted`] if the stored value is not a number.
    pub fn last_sync_time(&self) -> StoreResult<Timestamp> {
        match self.store.get(LAST_SYNC_TIME_KEY)? {
            None => Ok(Timestamp::EPOCH),
            Some(raw) => raw.trim().parse::<i64>().map(Timestamp::from_millis).map_err(|_| {
                StoreError::Corrupted(format!("{LAST_SYNC_TIME_KEY} is not a timestamp: {raw:?}"))
            }),
        }
    }

    /// Records a successful full sync.
    pub fn set_last_sync_time(&self, at: Timestamp) -> StoreResult<()> {
        self.store.set(LAST_SYNC_TIME_KEY, &at.as_millis().to_string())
    }

    /// Forgets the last sync time.
    pub fn clear(&self) -> StoreResult<()> {
        self.store.remove(LAST_SYNC_TIME_KEY)
    }
}
