//! Installation identity.

use liftsync_core::id::new_local_id;
use liftsync_store::{KeyValueStore, StoreResult, INSTALLATION_ID_KEY};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::info;

/// Hands out the identifier of this app installation.
///
/// The id is created on first use, persisted in the key-value store and
/// cached for the life of the provider. Concurrent first calls agree on a
/// single id.
pub struct InstallationIdProvider {
    store: Arc<dyn KeyValueStore>,
    cached: RwLock<Option<String>>,
    init: Mutex<()>,
}

impl InstallationIdProvider {
    /// Creates a provider backed by `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            cached: RwLock::new(None),
            init: Mutex::new(()),
        }
    }

    /// Returns the installation id, creating and persisting it on first use.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the id cannot be read or persisted. A
    /// failed call caches nothing, so a later call tries again.
    pub fn get_id(&self) -> StoreResult<String> {
        if let Some(id) = self.cached.read().as_ref() {
            return Ok(id.clone());
        }

        let _init = self.init.lock();
        if let Some(id) = self.cached.read().as_ref() {
            return Ok(id.clone());
        }

        let id = match self.store.get(INSTALLATION_ID_KEY)? {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                let id = new_local_id();
                self.store.set(INSTALLATION_ID_KEY, &id)?;
                info!(installation_id = %id, "created installation id");
                id
            }
        };

        *self.cached.write() = Some(id.clone());
        Ok(id)
    }
}
