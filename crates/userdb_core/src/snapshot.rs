//! Read-only snapshots.

use parking_lot::RwLockReadGuard;
use redb::{Database, ReadTransaction};

use crate::bucket::ReadBucket;
use crate::error::StoreResult;
use crate::record::Record;
use crate::user::User;

/// A read-only transaction over the whole store.
///
/// Every read through a snapshot sees the data as of the moment it was
/// taken. Writes that commit afterwards, even from the same thread, are
/// invisible to it. Closing the store waits until outstanding snapshots
/// are dropped.
pub struct Snapshot<'s> {
    txn: ReadTransaction,
    _guard: RwLockReadGuard<'s, Option<Database>>,
}

impl<'s> Snapshot<'s> {
    pub(crate) fn new(guard: RwLockReadGuard<'s, Option<Database>>, txn: ReadTransaction) -> Self {
        Self { txn, _guard: guard }
    }

    /// Runs `f` against a collection; a collection never written to reads
    /// as empty.
    fn read<R, T, F>(&self, f: F) -> StoreResult<T>
    where
        R: Record,
        T: Default,
        F: FnOnce(&ReadBucket<R>) -> StoreResult<T>,
    {
        match ReadBucket::open(&self.txn)? {
            Some(bucket) => f(&bucket),
            None => Ok(T::default()),
        }
    }

    /// Gets a record by id; `None` if absent.
    pub fn get<R: Record>(&self, id: u64) -> StoreResult<Option<R>> {
        self.read(|bucket: &ReadBucket<R>| bucket.get(id))
    }

    /// Lists a collection in ascending id order.
    pub fn list<R: Record>(&self) -> StoreResult<Vec<R>> {
        self.read(|bucket: &ReadBucket<R>| bucket.list())
    }

    /// Lists a collection in descending id order.
    pub fn list_rev<R: Record>(&self) -> StoreResult<Vec<R>> {
        self.read(|bucket: &ReadBucket<R>| bucket.list_rev())
    }

    /// Up to `limit` records whose id is greater than `after`.
    pub fn list_after<R: Record>(&self, after: u64, limit: usize) -> StoreResult<Vec<R>> {
        self.read(|bucket: &ReadBucket<R>| bucket.list_after(after, limit))
    }

    /// Ids of a collection in ascending order.
    pub fn ids<R: Record>(&self) -> StoreResult<Vec<u64>> {
        self.read(|bucket: &ReadBucket<R>| bucket.ids())
    }

    /// Number of records in a collection.
    pub fn count<R: Record>(&self) -> StoreResult<u64> {
        self.read(|bucket: &ReadBucket<R>| bucket.count())
    }

    /// Last id handed out by a collection's sequence (`0` if none).
    pub fn sequence<R: Record>(&self) -> StoreResult<u64> {
        self.read(|bucket: &ReadBucket<R>| bucket.sequence())
    }

    /// Gets a user by id.
    pub fn user(&self, id: u64) -> StoreResult<Option<User>> {
        self.get(id)
    }

    /// All users, ascending by id.
    pub fn users(&self) -> StoreResult<Vec<User>> {
        self.list()
    }

    /// All users, descending by id.
    pub fn users_rev(&self) -> StoreResult<Vec<User>> {
        self.list_rev()
    }

    /// A page of users after `after`.
    pub fn users_after(&self, after: u64, limit: usize) -> StoreResult<Vec<User>> {
        self.list_after(after, limit)
    }

    /// All user ids, ascending.
    pub fn user_ids(&self) -> StoreResult<Vec<u64>> {
        self.ids::<User>()
    }

    /// Number of users.
    pub fn count_users(&self) -> StoreResult<u64> {
        self.count::<User>()
    }
}
