//! Reset command implementation.

use super::bookkeeping_paths;
use liftsync_store::{FileKeyValueStore, FileMetadataStore, SyncBookkeeping, SyncMetadataStore};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Forgets every bookmark and the last sync time under `path`.
///
/// The installation id is kept. The next sync of every entity type is a
/// first sync.
pub async fn run(path: &Path, confirmed: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !confirmed {
        return Err("Reset discards every sync bookmark; pass --yes to confirm".into());
    }

    let (prefs_path, metadata_path) = bookkeeping_paths(path);
    let metadata = FileMetadataStore::open(&metadata_path)?;
    let cleared = metadata.list().await?.len();
    metadata.clear().await?;
    SyncBookkeeping::new(Arc::new(FileKeyValueStore::open(&prefs_path)?)).clear()?;

    info!(path = %path.display(), bookmarks = cleared, "sync bookkeeping reset");
    println!("Cleared {cleared} bookmarks and the last sync time.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftsync_core::{EntityType, Timestamp};
    use liftsync_store::{KeyValueStore, MetadataKey, INSTALLATION_ID_KEY};
    use tempfile::tempdir;

    #[tokio::test]
    async fn requires_confirmation() {
        let dir = tempdir().unwrap();
        assert!(run(dir.path(), false).await.is_err());
    }

    #[tokio::test]
    async fn clears_bookmarks_but_keeps_installation_id() {
        let dir = tempdir().unwrap();
        let (prefs_path, metadata_path) = bookkeeping_paths(dir.path());
        {
            let prefs: Arc<dyn KeyValueStore> =
                Arc::new(FileKeyValueStore::open(&prefs_path).unwrap());
            prefs.set(INSTALLATION_ID_KEY, "install-1").unwrap();
            SyncBookkeeping::new(prefs)
                .set_last_sync_time(Timestamp::from_millis(42))
                .unwrap();
            FileMetadataStore::open(&metadata_path)
                .unwrap()
                .advance(
                    &MetadataKey::new("install-1", EntityType::SetLog, "alice"),
                    Timestamp::from_millis(9),
                )
                .await
                .unwrap();
        }

        run(dir.path(), true).await.unwrap();

        let prefs = FileKeyValueStore::open(&prefs_path).unwrap();
        assert_eq!(prefs.get(INSTALLATION_ID_KEY).unwrap().as_deref(), Some("install-1"));
        let bookkeeping = SyncBookkeeping::new(Arc::new(prefs));
        assert_eq!(bookkeeping.last_sync_time().unwrap(), Timestamp::EPOCH);
        let metadata = FileMetadataStore::open(&metadata_path).unwrap();
        assert!(metadata.list().await.unwrap().is_empty());
    }
}
