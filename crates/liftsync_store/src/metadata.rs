//! Per-entity sync bookmarks.

use crate::error::{StoreError, StoreResult};
use crate::json_file;
use async_trait::async_trait;
use liftsync_core::{EntityType, Timestamp};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Identifies one bookmark.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetadataKey {
    /// Installation the bookmark belongs to.
    pub installation_id: String,
    /// Entity type it tracks.
    pub entity_type: EntityType,
    /// User id, or the system scope sentinel.
    pub scope_id: String,
}

impl MetadataKey {
    /// Creates a key.
    pub fn new(
        installation_id: impl Into<String>,
        entity_type: EntityType,
        scope_id: impl Into<String>,
    ) -> Self {
        Self {
            installation_id: installation_id.into(),
            entity_type,
            scope_id: scope_id.into(),
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.installation_id, self.entity_type, self.scope_id)
    }
}

/// A bookmark: the point up to which an entity type is known to be in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetadata {
    /// Newest timestamp observed by a successful pipeline run.
    pub last_sync: Timestamp,
    /// True once any pipeline run for the key has succeeded.
    pub has_ever_synced: bool,
}

/// Persistent storage of bookmarks.
///
/// Bookmarks only move forward: [`SyncMetadataStore::advance`] keeps the
/// larger of the stored and the offered timestamp. Only
/// [`SyncMetadataStore::clear`] removes them.
#[async_trait]
pub trait SyncMetadataStore: Send + Sync {
    /// Returns the bookmark for `key`, if one exists.
    async fn get(&self, key: &MetadataKey) -> StoreResult<Option<SyncMetadata>>;

    /// Moves the bookmark for `key` to `to`, unless it is already later.
    /// Returns the stored bookmark.
    async fn advance(&self, key: &MetadataKey, to: Timestamp) -> StoreResult<SyncMetadata>;

    /// Returns every bookmark, ordered by key.
    async fn list(&self) -> StoreResult<Vec<(MetadataKey, SyncMetadata)>>;

    /// Removes every bookmark.
    async fn clear(&self) -> StoreResult<()>;
}

fn advanced(current: Option<SyncMetadata>, to: Timestamp) -> SyncMetadata {
    SyncMetadata {
        last_sync: current.map_or(to, |current| current.last_sync.max(to)),
        has_ever_synced: true,
    }
}

/// In-memory [`SyncMetadataStore`].
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    entries: RwLock<BTreeMap<MetadataKey, SyncMetadata>>,
}

impl MemoryMetadataStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SyncMetadataStore for MemoryMetadataStore {
    async fn get(&self, key: &MetadataKey) -> StoreResult<Option<SyncMetadata>> {
        Ok(self.entries.read().get(key).copied())
    }

    async fn advance(&self, key: &MetadataKey, to: Timestamp) -> StoreResult<SyncMetadata> {
        let mut entries = self.entries.write();
        let next = advanced(entries.get(key).copied(), to);
        entries.insert(key.clone(), next);
        Ok(next)
    }

    async fn list(&self) -> StoreResult<Vec<(MetadataKey, SyncMetadata)>> {
        Ok(self
            .entries
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), *value))
            .collect())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.entries.write().clear();
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    installation_id: String,
    entity_type: String,
    scope_id: String,
    #[serde(flatten)]
    metadata: SyncMetadata,
}

/// [`SyncMetadataStore`] persisted as a JSON array.
///
/// Writes run on the blocking pool, one at a time, and the in-memory copy
/// changes only after the file does.
#[derive(Debug)]
pub struct FileMetadataStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<MetadataKey, SyncMetadata>>,
    writer: tokio::sync::Mutex<()>,
}

impl FileMetadataStore {
    /// Opens the store at `path`, creating it on first write.
    ///
    /// Entries naming an unknown entity type are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let stored: Vec<StoredEntry> = json_file::load(path)?;
        let mut entries = BTreeMap::new();
        for entry in stored {
            let Some(entity_type) = EntityType::from_name(&entry.entity_type) else {
                warn!(
                    entity = %entry.entity_type,
                    path = %path.display(),
                    "dropping bookmark for unknown entity type"
                );
                continue;
            };
            let key = MetadataKey::new(entry.installation_id, entity_type, entry.scope_id);
            entries.insert(key, entry.metadata);
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
            writer: tokio::sync::Mutex::new(()),
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<MetadataKey, SyncMetadata>) -> StoreResult<()> {
        let stored: Vec<StoredEntry> = entries
            .iter()
            .map(|(key, metadata)| StoredEntry {
                installation_id: key.installation_id.clone(),
                entity_type: key.entity_type.as_str().to_string(),
                scope_id: key.scope_id.clone(),
                metadata: *metadata,
            })
            .collect();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || json_file::save(&path, &stored))
            .await
            .map_err(|err| StoreError::Io(io::Error::other(err)))?
    }
}

#[async_trait]
impl SyncMetadataStore for FileMetadataStore {
    async fn get(&self, key: &MetadataKey) -> StoreResult<Option<SyncMetadata>> {
        Ok(self.entries.read().get(key).copied())
    }

    async fn advance(&self, key: &MetadataKey, to: Timestamp) -> StoreResult<SyncMetadata> {
        let _writer = self.writer.lock().await;
        let mut snapshot = self.entries.read().clone();
        let previous = snapshot.get(key).copied();
        let next = advanced(previous, to);
        if previous == Some(next) {
            return Ok(next);
        }

        snapshot.insert(key.clone(), next);
        self.persist(&snapshot).await?;
        self.entries.write().insert(key.clone(), next);
        Ok(next)
    }

    async fn list(&self) -> StoreResult<Vec<(MetadataKey, SyncMetadata)>> {
        Ok(self
            .entries
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), *value))
            .collect())
    }

    async fn clear(&self) -> StoreResult<()> {
        let _writer = self.writer.lock().await;
        self.persist(&BTreeMap::new()).await?;
        self.entries.write().clear();
        Ok(())
    }
}
