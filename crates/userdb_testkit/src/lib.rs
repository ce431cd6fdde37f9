//! # UserDB Testkit
//!
//! Test utilities for userdb.
//!
//! This crate provides:
//! - Temporary-file store fixtures and tracing setup
//! - Property-based generators using proptest
//! - A model-checking harness that mirrors the store in memory
//! - Concurrent writer stress helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use userdb_testkit::prelude::*;
//!
//! #[test]
//! fn creates_users() {
//!     with_temp_store(|store| {
//!         let mut user = User::new("susy");
//!         store.create_user(&mut user).unwrap();
//!         assert_eq!(user.id, 1);
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::stress::*;
    pub use userdb_core::{Store, StoreConfig, StoreError, User};
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use stress::*;
