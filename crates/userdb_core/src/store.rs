//! The user store.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use redb::Database;
use tracing::{debug, info, warn};

use crate::bucket::WriteBucket;
use crate::collection::Collection;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use crate::snapshot::Snapshot;
use crate::user::User;

/// A handle to an open database file.
///
/// Every operation runs in its own transaction. Reads see a consistent
/// snapshot; writes are atomic and either commit fully or leave the file
/// untouched. The handle is `Send + Sync` and can be shared across
/// threads; writes are serialized by the engine.
///
/// # Example
///
/// ```rust,ignore
/// use userdb_core::{Store, User};
///
/// let store = Store::open("users.db")?;
///
/// let mut susy = User::new("susy");
/// store.create_user(&mut susy)?;
/// assert_eq!(susy.id, 1);
///
/// store.set_username(susy.id, "jimbo")?;
/// assert_eq!(store.user(1)?.unwrap().username, "jimbo");
///
/// store.close()?;
/// ```
pub struct Store {
    path: PathBuf,
    config: StoreConfig,
    db: RwLock<Option<Database>>,
}

impl Store {
    /// Opens (creating if needed) the store at `path` with default settings.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Opens the store at `path` with the given configuration.
    ///
    /// Fails with [`StoreError::Open`] if the file cannot be created or
    /// opened, is not a database, or is already open elsewhere.
    pub fn open_with_config(path: impl AsRef<Path>, config: StoreConfig) -> StoreResult<Self> {
        let path = path.as_ref();
        let builder = config.builder();
        let opened = if config.create_if_missing {
            builder.create(path)
        } else {
            builder.open(path)
        };
        let db = opened.map_err(|err| StoreError::open(path, err))?;

        Self::prepare(&db).map_err(|err| match err {
            StoreError::Storage(source) => StoreError::open(path, source),
            other => other,
        })?;

        info!(path = %path.display(), "store opened");
        Ok(Self {
            path: path.to_path_buf(),
            config,
            db: RwLock::new(Some(db)),
        })
    }

    /// Creates the `Users` and sequence tables if the file is new.
    fn prepare(db: &Database) -> StoreResult<()> {
        let txn = db.begin_write()?;
        WriteBucket::<User>::open(&txn)?;
        txn.commit()?;
        Ok(())
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether [`close`](Self::close) has not been called yet.
    pub fn is_open(&self) -> bool {
        self.db.read().is_some()
    }

    /// Releases the database file.
    ///
    /// Waits up to [`StoreConfig::close_timeout`] for in-flight operations
    /// and live snapshots to finish. A [`Snapshot`] still held by the calling
    /// thread can never finish, so drop it first; otherwise this fails with
    /// [`StoreError::CloseTimedOut`] and the store stays open. Once closed,
    /// every later call, including a second `close`, fails with
    /// [`StoreError::Closed`].
    pub fn close(&self) -> StoreResult<()> {
        let waited = self.config.close_timeout;
        let mut guard = self
            .db
            .try_write_for(waited)
            .ok_or(StoreError::CloseTimedOut { waited })?;
        let db = guard.take().ok_or(StoreError::Closed)?;
        drop(guard);
        drop(db);
        info!(path = %self.path.display(), "store closed");
        Ok(())
    }

    /// Takes a read-only snapshot of the whole store.
    pub fn snapshot(&self) -> StoreResult<Snapshot<'_>> {
        let guard = self.db.read_recursive();
        let txn = guard.as_ref().ok_or(StoreError::Closed)?.begin_read()?;
        Ok(Snapshot::new(guard, txn))
    }

    /// Returns the collection of records of type `R`.
    pub fn collection<R: Record>(&self) -> Collection<'_, R> {
        Collection::new(self)
    }

    /// Runs `f` in a read-write transaction over collection `R`.
    ///
    /// Commits if `f` returns `Ok`; otherwise aborts, so no partial write
    /// of the operation survives.
    pub(crate) fn write<R, T, F>(&self, f: F) -> StoreResult<T>
    where
        R: Record,
        F: FnOnce(&mut WriteBucket<'_, R>) -> StoreResult<T>,
    {
        let guard = self.db.read_recursive();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        let mut txn = db.begin_write()?;
        txn.set_durability(self.config.durability());

        let result = WriteBucket::<R>::open(&txn).and_then(|mut bucket| f(&mut bucket));
        match result {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(err) => {
                warn!(collection = R::COLLECTION, error = %err, "rolling back transaction");
                if let Err(abort_err) = txn.abort() {
                    warn!(collection = R::COLLECTION, error = %abort_err, "abort failed");
                }
                Err(err)
            }
        }
    }

    /// Stores a new user and assigns it the next id.
    ///
    /// The incoming `id` is ignored. On success `user.id` holds the new id,
    /// which is also returned. On failure the store is unchanged, the id
    /// sequence does not advance, and `user` is left as it was.
    pub fn create_user(&self, user: &mut User) -> StoreResult<u64> {
        self.collection::<User>().create(user)
    }

    /// Gets a user by id; `Ok(None)` if there is none.
    pub fn user(&self, id: u64) -> StoreResult<Option<User>> {
        self.snapshot()?.user(id)
    }

    /// All users in ascending id order.
    pub fn users(&self) -> StoreResult<Vec<User>> {
        self.snapshot()?.users()
    }

    /// All users in descending id order.
    pub fn users_rev(&self) -> StoreResult<Vec<User>> {
        self.snapshot()?.users_rev()
    }

    /// Up to `limit` users with an id greater than `after`, ascending.
    ///
    /// Pass `0` to start from the beginning and the last id of a page to
    /// fetch the next one.
    pub fn users_after(&self, after: u64, limit: usize) -> StoreResult<Vec<User>> {
        self.snapshot()?.users_after(after, limit)
    }

    /// All user ids in ascending order.
    pub fn user_ids(&self) -> StoreResult<Vec<u64>> {
        self.snapshot()?.user_ids()
    }

    /// Number of stored users.
    pub fn count_users(&self) -> StoreResult<u64> {
        self.snapshot()?.count_users()
    }

    /// Renames an existing user.
    ///
    /// Fails with [`StoreError::NotFound`] if `id` does not exist; nothing
    /// is written in that case.
    pub fn set_username(&self, id: u64, username: impl Into<String>) -> StoreResult<()> {
        let username = username.into();
        self.update_user(id, move |user| user.username = username)?;
        Ok(())
    }

    /// Reads, changes and rewrites one user atomically; returns the
    /// stored result.
    pub fn update_user(&self, id: u64, f: impl FnOnce(&mut User)) -> StoreResult<User> {
        self.collection::<User>().update(id, f)
    }

    /// Deletes a user. Deleting an absent id succeeds.
    pub fn delete_user(&self, id: u64) -> StoreResult<()> {
        self.collection::<User>().delete(id)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("config", &self.config)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if self.db.get_mut().take().is_some() {
            debug!(path = %self.path.display(), "store dropped without close");
        }
    }
}
