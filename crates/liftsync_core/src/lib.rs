//! # LiftSync Core
//!
//! Shared vocabulary for the LiftSync synchronization engine.
//!
//! This crate provides:
//! - [`Timestamp`] and [`SyncScope`] value types
//! - [`EntityType`], the catalog of synchronized entity types and their
//!   declared foreign-key dependencies
//! - Local record shapes (the on-device representation) under [`records`]
//! - Domain enumerations with their remote string codes and fallbacks
//! - Identifier helpers (random local ids, deterministic child ids)
//!
//! This crate performs no I/O.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
pub mod enums;
pub mod id;
pub mod records;
mod types;

pub use entity::{EntityType, ScopeKind};
pub use enums::RemoteEnum;
pub use records::{LocalRecord, Reference};
pub use types::{SyncScope, Timestamp, SYSTEM_SCOPE_ID};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
