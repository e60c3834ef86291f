//! # LiftSync Engine
//!
//! Synchronizes the local workout database with a remote document store.
//!
//! This crate provides:
//! - [`SyncCoordinator`], the public entry point, with a cooldown gate and
//!   independent system and user locks
//! - [`EntityPipeline`], one download-then-upload pass per entity type,
//!   type-erased behind [`EntitySync`]
//! - [`SyncRegistry`], the pipelines sorted by their declared dependencies
//! - [`InstallationIdProvider`], the stable id of this installation
//! - [`RemoteStore`], the remote document store contract, and
//!   [`MemoryRemoteStore`] for tests
//!
//! ## Architecture
//!
//! Every run synchronizes the system scope (the shared exercise catalog)
//! before the user scope. Within a scope, pipelines run one at a time in
//! dependency order, so a row is stored only after the rows it references.
//!
//! ## Key Invariants
//!
//! - A full sync never starts within the cooldown of the last successful one
//! - Lock contention skips a run, it never waits
//! - Bookmarks never move backwards, and only move when their pipeline
//!   succeeds
//! - Bookmarks hold remote store time, and uploads are chosen by a
//!   pending flag on each local row, so device clocks never meet the
//!   download cursor
//! - Top-level operations report failures in the returned [`SyncRun`]

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod config;
mod coordinator;
mod error;
mod installation;
mod pipeline;
mod registry;
mod remote;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    SyncConfig, DEFAULT_COOLDOWN, DEFAULT_REQUEST_TIMEOUT, DEFAULT_UPLOAD_BATCH_SIZE,
};
pub use coordinator::{
    SessionIdentity, SkipReason, SyncCoordinator, SyncOutcome, SyncRun, SyncState, SyncStats,
    SyncTrigger, UserIdentity,
};
pub use error::{SyncError, SyncResult};
pub use installation::InstallationIdProvider;
pub use pipeline::{EntityPipeline, EntitySync, PipelineContext, PipelineReport};
pub use registry::{dependency_order, standard_order, SyncRegistry, SyncRegistryBuilder};
pub use remote::{
    Download, FetchedDocument, InjectedFailure, MemoryRemoteStore, OutgoingRecord, RemoteBatch,
    RemoteCollection, RemoteRecord, RemoteStore,
};
