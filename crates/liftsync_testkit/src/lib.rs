//! # LiftSync Testkit
//!
//! Test utilities for LiftSync.
//!
//! This crate provides:
//! - Record builders for the common local rows
//! - Property-based generators for every synchronized record type
//! - A multi-device harness sharing one in-memory remote store and one
//!   manual clock
//!
//! ## Usage
//!
//! ```rust,ignore
//! use liftsync_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn workouts_reach_the_second_device() {
//!     let world = SyncWorld::new();
//!     let phone = world.device();
//!     let tablet = world.device();
//!     // ... write on `phone`, sync both, read on `tablet`
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod harness;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::harness::*;
}

pub use fixtures::*;
pub use generators::*;
pub use harness::*;
