//! Error types for userdb core.

use std::path::PathBuf;

use thiserror::Error;
use userdb_codec::CodecError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by [`Store`](crate::Store) and its collections.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened, created, locked or initialized.
    #[error("failed to open store at {}: {source}", path.display())]
    Open {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying engine error.
        #[source]
        source: redb::Error,
    },

    /// The referenced record does not exist.
    #[error("{collection} record {id} not found")]
    NotFound {
        /// Collection that was searched.
        collection: &'static str,
        /// Missing identifier.
        id: u64,
    },

    /// Stored bytes could not be decoded.
    #[error("failed to decode {collection} record {id}: {source}")]
    Decode {
        /// Collection holding the record.
        collection: &'static str,
        /// Identifier from the record's key.
        id: u64,
        /// Codec failure.
        #[source]
        source: CodecError,
    },

    /// A record violates the wire format's constraints.
    #[error("failed to encode {collection} record: {source}")]
    Encode {
        /// Collection the record was destined for.
        collection: &'static str,
        /// Codec failure.
        #[source]
        source: CodecError,
    },

    /// The storage engine failed.
    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),

    /// A stored key is not a fixed-width identifier.
    #[error("invalid key: expected 8 bytes, got {len}")]
    InvalidKey {
        /// Actual key length.
        len: usize,
    },

    /// The collection's sequence cannot advance any further.
    #[error("{collection} sequence exhausted")]
    SequenceExhausted {
        /// Collection whose sequence overflowed.
        collection: &'static str,
    },

    /// The store has been closed.
    #[error("store is closed")]
    Closed,

    /// `close` gave up waiting for live snapshots or in-flight operations.
    #[error("store still in use after waiting {waited:?} to close")]
    CloseTimedOut {
        /// How long `close` waited.
        waited: std::time::Duration,
    },
}

impl StoreError {
    /// Returns true for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for [`StoreError::Closed`].
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns true if opening failed because another handle holds the file lock.
    pub fn is_locked(&self) -> bool {
        matches!(
            self,
            Self::Open {
                source: redb::Error::DatabaseAlreadyOpen,
                ..
            }
        )
    }

    pub(crate) fn open(path: impl Into<PathBuf>, source: impl Into<redb::Error>) -> Self {
        Self::Open {
            path: path.into(),
            source: source.into(),
        }
    }
}

macro_rules! storage_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for StoreError {
                fn from(err: $ty) -> Self {
                    Self::Storage(err.into())
                }
            }
        )*
    };
}

storage_from!(
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        let not_found = StoreError::NotFound {
            collection: "Users",
            id: 1,
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_closed());
        assert!(StoreError::Closed.is_closed());
        assert!(StoreError::open("db", redb::DatabaseError::DatabaseAlreadyOpen).is_locked());
    }

    #[test]
    fn messages_name_the_record() {
        let err = StoreError::NotFound {
            collection: "Users",
            id: 42,
        };
        assert_eq!(err.to_string(), "Users record 42 not found");

        let err = StoreError::Encode {
            collection: "Users",
            source: CodecError::FieldTooLong {
                field: 2,
                len: 300,
                max: 256,
            },
        };
        assert_eq!(
            err.to_string(),
            "failed to encode Users record: field 2: length 300 exceeds maximum 256"
        );
    }
}
