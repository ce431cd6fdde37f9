//! # UserDB Core
//!
//! Embedded, file-backed user store.
//!
//! This crate provides:
//! - [`Store`]: open/close a database file and run user operations
//! - [`Snapshot`]: consistent read-only views across many reads
//! - [`Collection`]: the same operations for any [`Record`] type
//! - [`StoreConfig`]: open-time settings
//!
//! Records are stored as canonical CBOR (see `userdb_codec`) under 8-byte
//! big-endian ids, so listings come back in ascending id order. Ids come
//! from a per-collection sequence that advances inside the creating
//! transaction and starts at 1.
//!
//! ## Example
//!
//! ```rust,no_run
//! use userdb_core::{Store, User};
//!
//! let store = Store::open("users.db")?;
//!
//! let mut susy = User::new("susy");
//! let mut john = User::new("john");
//! store.create_user(&mut susy)?;
//! store.create_user(&mut john)?;
//!
//! for user in store.users()? {
//!     println!("{} {}", user.id, user.username);
//! }
//!
//! store.set_username(john.id, "jimbo")?;
//! store.close()?;
//! # Ok::<(), userdb_core::StoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bucket;
mod collection;
mod config;
mod error;
mod key;
mod record;
mod snapshot;
mod store;
mod tables;
mod user;

pub use collection::Collection;
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use key::{decode_id, encode_id, KEY_LEN, MAX_ID};
pub use record::Record;
pub use snapshot::Snapshot;
pub use store::Store;
pub use user::{User, MAX_USERNAME_LEN};
