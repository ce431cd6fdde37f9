//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A value could not be encoded.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Float values are not part of the canonical form.
    #[error("float values are forbidden in canonical CBOR")]
    FloatForbidden,

    /// Indefinite-length items are not part of the canonical form.
    #[error("indefinite-length items are forbidden")]
    IndefiniteLengthForbidden,

    /// Invalid UTF-8 in a text string.
    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    /// Input ended in the middle of an item.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Bytes remained after the top-level item.
    #[error("{count} trailing bytes after top-level item")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },

    /// Structurally invalid or non-canonical input.
    #[error("invalid CBOR structure: {message}")]
    InvalidStructure {
        /// Description of the structural error.
        message: String,
    },

    /// CBOR construct outside the supported value model.
    #[error("unsupported CBOR type: {type_name}")]
    UnsupportedType {
        /// Name of the unsupported type.
        type_name: String,
    },

    /// Integer does not fit the signed 64-bit value model.
    #[error("integer overflow")]
    IntegerOverflow,

    /// A declared length exceeds the decoder limits.
    #[error("size limit exceeded: claimed {claimed}, max {max_allowed}")]
    SizeLimitExceeded {
        /// Length claimed by the input.
        claimed: u64,
        /// Largest accepted length.
        max_allowed: u64,
    },

    /// Containers nested deeper than the decoder allows.
    #[error("nesting depth exceeds {max}")]
    DepthExceeded {
        /// Maximum nesting depth.
        max: usize,
    },

    /// A record field holds a value of the wrong CBOR type.
    #[error("field {field}: expected {expected}")]
    FieldType {
        /// Field number.
        field: u64,
        /// Expected type name.
        expected: &'static str,
    },

    /// A record field is longer than its schema allows.
    #[error("field {field}: length {len} exceeds maximum {max}")]
    FieldTooLong {
        /// Field number.
        field: u64,
        /// Actual length in bytes.
        len: usize,
        /// Maximum length in bytes.
        max: usize,
    },

    /// A record field number was written twice.
    #[error("field {field} written more than once")]
    DuplicateField {
        /// Field number.
        field: u64,
    },
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Create an unsupported type error.
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }
}
