//! # userdb Codec
//!
//! Canonical CBOR encoding/decoding for stored records.
//!
//! Encoding is deterministic: the same logical record always produces the
//! same bytes, so stored values can be compared and hashed bytewise.
//!
//! ## Canonical CBOR Rules
//!
//! - Maps are sorted by key (length of the encoded key first, then bytewise)
//! - Integers and lengths use the shortest encoding
//! - No floats, tags, or indefinite-length items
//! - Strings must be UTF-8
//!
//! Records are maps keyed by field number; see [`RecordWriter`] and
//! [`RecordReader`] for the schema evolution rules.
//!
//! ## Usage
//!
//! ```
//! use userdb_codec::{RecordReader, RecordWriter};
//!
//! let mut writer = RecordWriter::new();
//! writer.put_uint(1, 7).unwrap();
//! writer.put_text(2, "susy", 256).unwrap();
//! let bytes = writer.finish().unwrap();
//!
//! let reader = RecordReader::from_bytes(&bytes).unwrap();
//! assert_eq!(reader.uint(1).unwrap(), 7);
//! assert_eq!(reader.text(2).unwrap(), "susy");
//! assert_eq!(reader.text(3).unwrap(), "");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod record;
mod value;

pub use decoder::{from_cbor, CanonicalDecoder, MAX_BYTES_LENGTH, MAX_CONTAINER_ELEMENTS, MAX_DEPTH};
pub use encoder::{to_canonical_cbor, CanonicalEncoder};
pub use error::{CodecError, CodecResult};
pub use record::{FieldNumber, RecordReader, RecordWriter};
pub use value::Value;

/// Trait for types that can be encoded to canonical CBOR.
pub trait Encode {
    /// Encode this value to canonical CBOR bytes.
    fn encode(&self) -> CodecResult<Vec<u8>>;
}

/// Trait for types that can be decoded from CBOR.
pub trait Decode: Sized {
    /// Decode this value from CBOR bytes.
    fn decode(bytes: &[u8]) -> CodecResult<Self>;
}

impl Encode for Value {
    fn encode(&self) -> CodecResult<Vec<u8>> {
        to_canonical_cbor(self)
    }
}

impl Decode for Value {
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        from_cbor(bytes)
    }
}
