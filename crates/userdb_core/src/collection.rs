//! Typed collection API.
//!
//! `Collection<R>` runs each operation in its own transaction: reads in a
//! fresh snapshot, writes in a read-write transaction that commits on
//! success and rolls back on any error.

use std::marker::PhantomData;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use crate::store::Store;

/// A handle to the collection holding records of type `R`.
///
/// # Example
///
/// ```rust,ignore
/// let users = store.collection::<User>();
///
/// let mut user = User::new("susy");
/// let id = users.create(&mut user)?;
///
/// users.update(id, |u| u.username = "jimbo".into())?;
/// for user in users.list()? {
///     println!("{} {}", user.id, user.username);
/// }
/// users.delete(id)?;
/// ```
pub struct Collection<'s, R: Record> {
    store: &'s Store,
    _marker: PhantomData<fn() -> R>,
}

impl<'s, R: Record> Collection<'s, R> {
    pub(crate) fn new(store: &'s Store) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Returns the collection name.
    pub fn name(&self) -> &'static str {
        R::COLLECTION
    }

    /// Stores a new record under the next id of the collection's sequence.
    ///
    /// Any id already set on `record` is ignored. On success `record.id()`
    /// is the new id, which is also returned. On failure nothing is
    /// written, the sequence does not advance, and `record` is untouched.
    pub fn create(&self, record: &mut R) -> StoreResult<u64> {
        let id = self.store.write::<R, _, _>(|bucket| {
            let id = bucket.next_sequence()?;
            let mut staged = record.clone();
            staged.set_id(id);
            bucket.put(&staged)?;
            Ok(id)
        })?;

        record.set_id(id);
        debug!(collection = R::COLLECTION, id, "record created");
        Ok(id)
    }

    /// Gets a record by id; `Ok(None)` if it does not exist.
    pub fn get(&self, id: u64) -> StoreResult<Option<R>> {
        self.store.snapshot()?.get(id)
    }

    /// All records in ascending id order.
    pub fn list(&self) -> StoreResult<Vec<R>> {
        self.store.snapshot()?.list()
    }

    /// All records in descending id order.
    pub fn list_rev(&self) -> StoreResult<Vec<R>> {
        self.store.snapshot()?.list_rev()
    }

    /// Up to `limit` records with an id greater than `after`.
    pub fn list_after(&self, after: u64, limit: usize) -> StoreResult<Vec<R>> {
        self.store.snapshot()?.list_after(after, limit)
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> StoreResult<Vec<u64>> {
        self.store.snapshot()?.ids::<R>()
    }

    /// Number of records.
    pub fn count(&self) -> StoreResult<u64> {
        self.store.snapshot()?.count::<R>()
    }

    /// Reads, mutates and rewrites one record atomically.
    ///
    /// Fails with [`StoreError::NotFound`] if `id` does not exist. The id
    /// is restored after `f` runs, so only attributes can change.
    pub fn update(&self, id: u64, f: impl FnOnce(&mut R)) -> StoreResult<R> {
        let record = self.store.write::<R, _, _>(|bucket| {
            let mut record = bucket.get(id)?.ok_or(StoreError::NotFound {
                collection: R::COLLECTION,
                id,
            })?;
            f(&mut record);
            record.set_id(id);
            bucket.put(&record)?;
            Ok(record)
        })?;

        debug!(collection = R::COLLECTION, id, "record updated");
        Ok(record)
    }

    /// Deletes a record. Deleting a missing id is not an error.
    pub fn delete(&self, id: u64) -> StoreResult<()> {
        let existed = self.store.write::<R, _, _>(|bucket| bucket.delete(id))?;
        debug!(collection = R::COLLECTION, id, existed, "record deleted");
        Ok(())
    }
}
