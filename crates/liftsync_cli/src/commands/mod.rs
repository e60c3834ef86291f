//! CLI command implementations.

pub mod inspect;
pub mod order;
pub mod reset;

use std::path::{Path, PathBuf};

/// Preferences file inside a bookkeeping directory.
pub const PREFS_FILE: &str = "prefs.json";

/// Bookmark file inside a bookkeeping directory.
pub const METADATA_FILE: &str = "sync_metadata.json";

/// Returns the preferences and bookmark paths under `dir`.
pub fn bookkeeping_paths(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join(PREFS_FILE), dir.join(METADATA_FILE))
}
