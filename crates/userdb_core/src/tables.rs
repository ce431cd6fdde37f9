//! Table definitions for redb storage.
//!
//! Each record collection is a table of `{id:8BE} → canonical CBOR`.
//! Sequence counters for every collection share one table keyed by the
//! collection name.

use redb::TableDefinition;

/// Record table of one collection.
pub(crate) type RecordTable = TableDefinition<'static, &'static [u8], &'static [u8]>;

/// Sequence counters: collection name → last assigned id.
pub(crate) const SEQUENCES: TableDefinition<'static, &'static str, u64> =
    TableDefinition::new("sequences");

/// Returns the record table for a collection.
pub(crate) const fn records(collection: &'static str) -> RecordTable {
    TableDefinition::new(collection)
}
