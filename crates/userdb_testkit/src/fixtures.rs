//! Test fixtures and store helpers.
//!
//! Every fixture lives in its own temporary directory, which is removed
//! when the fixture is dropped.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use userdb_core::{Store, StoreConfig, User};

/// File name used for fixture databases.
pub const DB_FILE: &str = "users.db";

/// A store in a temporary directory with automatic cleanup.
pub struct TestStore {
    /// The store instance.
    pub store: Store,
    config: StoreConfig,
    path: PathBuf,
    // Declared last so the store is dropped before the directory.
    _temp_dir: TempDir,
}

impl TestStore {
    /// Opens a fresh store with default settings.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Opens a fresh store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(DB_FILE);
        let store = Store::open_with_config(&path, config.clone()).expect("Failed to open store");
        Self {
            store,
            config,
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes the store and opens the same file again.
    pub fn reopen(&mut self) {
        self.store.close().expect("Failed to close store");
        self.store =
            Store::open_with_config(&self.path, self.config.clone()).expect("Failed to reopen store");
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestStore {
    type Target = Store;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test against a fresh temporary store.
///
/// # Example
///
/// ```rust,ignore
/// use userdb_testkit::with_temp_store;
///
/// #[test]
/// fn my_test() {
///     with_temp_store(|store| {
///         assert!(store.users().unwrap().is_empty());
///     });
/// }
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&Store) -> R,
{
    let test_store = TestStore::new();
    f(&test_store.store)
}

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// A store holding `names` in creation order, ids `1..=names.len()`.
    pub fn store_with_users(names: &[&str]) -> TestStore {
        let test_store = TestStore::new();
        for name in names {
            let mut user = User::new(*name);
            test_store
                .create_user(&mut user)
                .expect("Failed to create user");
        }
        test_store
    }

    /// A store with `count` users named `user-0`, `user-1`, ...
    pub fn populated_store(count: usize) -> TestStore {
        let test_store = TestStore::new();
        for i in 0..count {
            let mut user = User::new(format!("user-{i}"));
            test_store
                .create_user(&mut user)
                .expect("Failed to create user");
        }
        test_store
    }
}
