//! Collection primitives inside a single transaction.
//!
//! A bucket is the record table of one collection plus its sequence
//! counter, opened against a transaction the caller owns. Buckets never
//! commit or abort; the transaction scope does.

use std::marker::PhantomData;

use redb::{
    ReadOnlyTable, ReadTransaction, ReadableTable, ReadableTableMetadata, Table, TableError,
    WriteTransaction,
};
use userdb_codec::CodecError;

use crate::error::{StoreError, StoreResult};
use crate::key::{decode_id, encode_id, MAX_ID};
use crate::record::Record;
use crate::tables::{self, SEQUENCES};

/// Decodes a stored value; the key's id wins over the id field.
fn decode_record<R: Record>(id: u64, bytes: &[u8]) -> StoreResult<R> {
    let mut record = R::decode(bytes).map_err(|source| StoreError::Decode {
        collection: R::COLLECTION,
        id,
        source,
    })?;
    record.set_id(id);
    Ok(record)
}

fn encode_error<R: Record>(source: CodecError) -> StoreError {
    StoreError::Encode {
        collection: R::COLLECTION,
        source,
    }
}

/// Read-write view of a collection.
pub(crate) struct WriteBucket<'txn, R: Record> {
    records: Table<'txn, &'static [u8], &'static [u8]>,
    sequences: Table<'txn, &'static str, u64>,
    _marker: PhantomData<R>,
}

impl<'txn, R: Record> WriteBucket<'txn, R> {
    /// Opens the collection, creating its table if missing.
    pub(crate) fn open(txn: &'txn WriteTransaction) -> StoreResult<Self> {
        Ok(Self {
            records: txn.open_table(tables::records(R::COLLECTION))?,
            sequences: txn.open_table(SEQUENCES)?,
            _marker: PhantomData,
        })
    }

    /// Advances the collection's sequence and returns the new value.
    ///
    /// The increment is part of the transaction and is undone with it.
    /// Fails with [`StoreError::SequenceExhausted`] once [`MAX_ID`] has been
    /// handed out.
    pub(crate) fn next_sequence(&mut self) -> StoreResult<u64> {
        let current = self
            .sequences
            .get(R::COLLECTION)?
            .map_or(0, |guard| guard.value());
        if current >= MAX_ID {
            return Err(StoreError::SequenceExhausted {
                collection: R::COLLECTION,
            });
        }
        let next = current + 1;
        self.sequences.insert(R::COLLECTION, next)?;
        Ok(next)
    }

    pub(crate) fn get(&self, id: u64) -> StoreResult<Option<R>> {
        let key = encode_id(id);
        match self.records.get(key.as_slice())? {
            Some(bytes) => Ok(Some(decode_record(id, bytes.value())?)),
            None => Ok(None),
        }
    }

    /// Encodes `record` and stores it under its own id.
    pub(crate) fn put(&mut self, record: &R) -> StoreResult<()> {
        let bytes = record.encode().map_err(encode_error::<R>)?;
        let key = encode_id(record.id());
        self.records.insert(key.as_slice(), bytes.as_slice())?;
        Ok(())
    }

    /// Removes the record; returns whether it existed.
    pub(crate) fn delete(&mut self, id: u64) -> StoreResult<bool> {
        let key = encode_id(id);
        Ok(self.records.remove(key.as_slice())?.is_some())
    }
}

/// Read-only view of a collection at a snapshot.
pub(crate) struct ReadBucket<R: Record> {
    records: ReadOnlyTable<&'static [u8], &'static [u8]>,
    sequences: ReadOnlyTable<&'static str, u64>,
    _marker: PhantomData<R>,
}

impl<R: Record> ReadBucket<R> {
    /// Opens the collection; `None` if nothing was ever written to it.
    pub(crate) fn open(txn: &ReadTransaction) -> StoreResult<Option<Self>> {
        let records = match txn.open_table(tables::records(R::COLLECTION)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(Self {
            records,
            sequences: txn.open_table(SEQUENCES)?,
            _marker: PhantomData,
        }))
    }

    pub(crate) fn get(&self, id: u64) -> StoreResult<Option<R>> {
        let key = encode_id(id);
        match self.records.get(key.as_slice())? {
            Some(bytes) => Ok(Some(decode_record(id, bytes.value())?)),
            None => Ok(None),
        }
    }

    /// All records in ascending id order.
    pub(crate) fn list(&self) -> StoreResult<Vec<R>> {
        self.decode_all(self.records.iter()?, usize::MAX)
    }

    /// All records in descending id order.
    pub(crate) fn list_rev(&self) -> StoreResult<Vec<R>> {
        self.decode_all(self.records.iter()?.rev(), usize::MAX)
    }

    /// Up to `limit` records with an id strictly greater than `after`.
    pub(crate) fn list_after(&self, after: u64, limit: usize) -> StoreResult<Vec<R>> {
        let Some(start) = after.checked_add(1) else {
            return Ok(Vec::new());
        };
        let start = encode_id(start);
        self.decode_all(self.records.range(start.as_slice()..)?, limit)
    }

    /// Identifiers in ascending order, without decoding values.
    pub(crate) fn ids(&self) -> StoreResult<Vec<u64>> {
        let mut ids = Vec::new();
        for entry in self.records.iter()? {
            let (key, _) = entry?;
            ids.push(decode_id(key.value())?);
        }
        Ok(ids)
    }

    pub(crate) fn count(&self) -> StoreResult<u64> {
        Ok(self.records.len()?)
    }

    /// Last value handed out by the sequence (`0` if none).
    pub(crate) fn sequence(&self) -> StoreResult<u64> {
        Ok(self
            .sequences
            .get(R::COLLECTION)?
            .map_or(0, |guard| guard.value()))
    }

    fn decode_all<'a, I>(&self, entries: I, limit: usize) -> StoreResult<Vec<R>>
    where
        I: Iterator<
            Item = Result<
                (
                    redb::AccessGuard<'a, &'static [u8]>,
                    redb::AccessGuard<'a, &'static [u8]>,
                ),
                redb::StorageError,
            >,
        >,
    {
        let mut out = Vec::new();
        for entry in entries.take(limit) {
            let (key, value) = entry?;
            let id = decode_id(key.value())?;
            out.push(decode_record(id, value.value())?);
        }
        Ok(out)
    }
}
