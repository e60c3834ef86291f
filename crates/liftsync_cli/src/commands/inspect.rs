//! Inspect command implementation.

use super::bookkeeping_paths;
use liftsync_store::{
    FileKeyValueStore, FileMetadataStore, KeyValueStore, SyncBookkeeping, SyncMetadataStore,
    INSTALLATION_ID_KEY,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Bookkeeping inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Bookkeeping directory.
    pub path: String,
    /// Installation id, if one was ever created.
    pub installation_id: Option<String>,
    /// Last successful full sync, epoch milliseconds. Zero if never.
    pub last_sync_time: i64,
    /// Stored bookmarks, ordered by key.
    pub bookmarks: Vec<BookmarkInfo>,
}

/// One stored bookmark.
#[derive(Debug, Serialize)]
pub struct BookmarkInfo {
    /// Installation the bookmark belongs to.
    pub installation_id: String,
    /// Entity type name.
    pub entity_type: String,
    /// User id or the system scope sentinel.
    pub scope_id: String,
    /// Bookmark, epoch milliseconds.
    pub last_sync: i64,
}

/// Collects the bookkeeping under `path` without modifying it.
pub async fn collect(path: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let (prefs_path, metadata_path) = bookkeeping_paths(path);
    if !prefs_path.exists() && !metadata_path.exists() {
        return Err(format!("No sync bookkeeping found at {:?}", path).into());
    }

    let prefs: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::open(&prefs_path)?);
    let metadata = FileMetadataStore::open(&metadata_path)?;

    let installation_id = prefs.get(INSTALLATION_ID_KEY)?;
    let last_sync_time = SyncBookkeeping::new(prefs).last_sync_time()?;
    let bookmarks = metadata
        .list()
        .await?
        .into_iter()
        .map(|(key, value)| BookmarkInfo {
            installation_id: key.installation_id,
            entity_type: key.entity_type.as_str().to_string(),
            scope_id: key.scope_id,
            last_sync: value.last_sync.as_millis(),
        })
        .collect();

    Ok(InspectResult {
        path: path.display().to_string(),
        installation_id,
        last_sync_time: last_sync_time.as_millis(),
        bookmarks,
    })
}

/// Runs the inspect command.
pub async fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = collect(path).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("LiftSync Bookkeeping: {}", result.path);
    println!("==========================================");
    println!(
        "Installation ID:  {}",
        result.installation_id.as_deref().unwrap_or("(not created)")
    );
    if result.last_sync_time == 0 {
        println!("Last full sync:   never");
    } else {
        println!("Last full sync:   {} ms", result.last_sync_time);
    }
    println!();

    if result.bookmarks.is_empty() {
        println!("No bookmarks.");
        return;
    }

    println!("Bookmarks:");
    println!(
        "  {:<20} {:<24} {:>15}",
        "Entity", "Scope", "Last sync (ms)"
    );
    println!("  {:-<20} {:-<24} {:->15}", "", "", "");
    for bookmark in &result.bookmarks {
        println!(
            "  {:<20} {:<24} {:>15}",
            bookmark.entity_type, bookmark.scope_id, bookmark.last_sync
        );
    }
}
