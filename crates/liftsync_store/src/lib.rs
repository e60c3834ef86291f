//! # LiftSync Store
//!
//! Local-side persistence contracts for the LiftSync engine.
//!
//! This crate provides:
//! - [`KeyValueStore`], a small preferences map, with memory and JSON-file
//!   implementations, plus [`SyncBookkeeping`] for the last sync time
//! - [`SyncMetadataStore`], per-entity bookmarks that only move forward
//! - [`LocalCollection`], the accessor a pipeline uses for one local table,
//!   and [`MemoryDatabase`], an in-memory database that enforces foreign
//!   keys across tables
//!
//! File-backed stores rewrite their whole file through a temp file and a
//! rename, so a crash never leaves a half-written file behind.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod json_file;
mod kv;
mod local;
mod memory;
mod metadata;

pub use error::{StoreError, StoreResult};
pub use kv::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, SyncBookkeeping, INSTALLATION_ID_KEY,
    LAST_SYNC_TIME_KEY,
};
pub use local::{FilteredCollection, LocalCollection, UploadReceipt};
pub use memory::{KeyIndex, LocalCollections, MemoryCollection, MemoryDatabase};
pub use metadata::{
    FileMetadataStore, MemoryMetadataStore, MetadataKey, SyncMetadata, SyncMetadataStore,
};
