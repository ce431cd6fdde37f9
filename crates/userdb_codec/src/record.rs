//! Field-numbered record schema.
//!
//! Records are stored as a CBOR map from small non-negative integer field
//! numbers to values. The numbering is the schema contract:
//!
//! - A new field gets a field number that has never been used before.
//! - A removed field's number is retired, never reassigned.
//! - Readers ignore field numbers they do not know.
//! - Readers treat an absent field as its zero value.
//! - A present field holding the wrong CBOR type is a decode error.
//!
//! Together these let old bytes decode under a newer schema and new bytes
//! decode under an older one.
//!
//! Every field, known or not, must hold a [`Value`]: null, bool, integer,
//! bytes, text, array or map. The whole record is validated before any
//! field is read, so a later field holding a float or a tagged item makes
//! the record undecodable here. New fields must stay inside that model.

use std::collections::BTreeMap;

use crate::decoder::from_cbor;
use crate::encoder::to_canonical_cbor;
use crate::error::{CodecError, CodecResult};
use crate::value::Value;

/// Field number inside a record map.
pub type FieldNumber = u64;

/// Builds the canonical byte form of a record one field at a time.
#[derive(Debug, Default)]
pub struct RecordWriter {
    fields: BTreeMap<FieldNumber, Value>,
}

impl RecordWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes an unsigned integer field.
    ///
    /// Fails with [`CodecError::IntegerOverflow`] above `i64::MAX`.
    pub fn put_uint(&mut self, field: FieldNumber, value: u64) -> CodecResult<()> {
        let n = i64::try_from(value).map_err(|_| CodecError::IntegerOverflow)?;
        self.put(field, Value::Integer(n))
    }

    /// Writes a signed integer field.
    pub fn put_int(&mut self, field: FieldNumber, value: i64) -> CodecResult<()> {
        self.put(field, Value::Integer(value))
    }

    /// Writes a boolean field.
    pub fn put_bool(&mut self, field: FieldNumber, value: bool) -> CodecResult<()> {
        self.put(field, Value::Bool(value))
    }

    /// Writes a text field no longer than `max_len` bytes.
    pub fn put_text(&mut self, field: FieldNumber, value: &str, max_len: usize) -> CodecResult<()> {
        check_field_len(field, value.len(), max_len)?;
        self.put(field, Value::Text(value.to_string()))
    }

    /// Writes a byte string field no longer than `max_len` bytes.
    pub fn put_bytes(&mut self, field: FieldNumber, value: &[u8], max_len: usize) -> CodecResult<()> {
        check_field_len(field, value.len(), max_len)?;
        self.put(field, Value::Bytes(value.to_vec()))
    }

    /// Writes an arbitrary value.
    pub fn put(&mut self, field: FieldNumber, value: Value) -> CodecResult<()> {
        i64::try_from(field).map_err(|_| CodecError::IntegerOverflow)?;
        if self.fields.contains_key(&field) {
            return Err(CodecError::DuplicateField { field });
        }
        self.fields.insert(field, value);
        Ok(())
    }

    /// Returns the record as a map value.
    pub fn into_value(self) -> Value {
        // put() already checked every field number fits in i64
        Value::map(
            self.fields
                .into_iter()
                .map(|(field, value)| (Value::Integer(field as i64), value))
                .collect(),
        )
    }

    /// Encodes the record to canonical CBOR.
    pub fn finish(self) -> CodecResult<Vec<u8>> {
        to_canonical_cbor(&self.into_value())
    }
}

/// Reads fields out of a decoded record map.
#[derive(Debug, Clone)]
pub struct RecordReader {
    fields: BTreeMap<FieldNumber, Value>,
}

impl RecordReader {
    /// Decodes `bytes` and checks that the top-level item is a map.
    ///
    /// Entries whose key is not a non-negative integer are skipped along
    /// with unknown field numbers.
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        Self::from_value(from_cbor(bytes)?)
    }

    /// Wraps an already decoded value.
    pub fn from_value(value: Value) -> CodecResult<Self> {
        let found = value.type_name();
        let Value::Map(pairs) = value else {
            return Err(CodecError::invalid_structure(format!(
                "record must be a map, found {found}"
            )));
        };

        let fields = pairs
            .into_iter()
            .filter_map(|(key, value)| key.as_u64().map(|field| (field, value)))
            .collect();
        Ok(Self { fields })
    }

    /// Returns true if the field is present.
    pub fn has(&self, field: FieldNumber) -> bool {
        self.fields.contains_key(&field)
    }

    /// Field numbers present in the record, ascending.
    pub fn field_numbers(&self) -> impl Iterator<Item = FieldNumber> + '_ {
        self.fields.keys().copied()
    }

    /// Reads an unsigned integer field, `0` if absent.
    pub fn uint(&self, field: FieldNumber) -> CodecResult<u64> {
        match self.fields.get(&field) {
            None => Ok(0),
            Some(value) => value.as_u64().ok_or(CodecError::FieldType {
                field,
                expected: "unsigned integer",
            }),
        }
    }

    /// Reads a signed integer field, `0` if absent.
    pub fn int(&self, field: FieldNumber) -> CodecResult<i64> {
        match self.fields.get(&field) {
            None => Ok(0),
            Some(value) => value.as_integer().ok_or(CodecError::FieldType {
                field,
                expected: "integer",
            }),
        }
    }

    /// Reads a boolean field, `false` if absent.
    pub fn bool(&self, field: FieldNumber) -> CodecResult<bool> {
        match self.fields.get(&field) {
            None => Ok(false),
            Some(value) => value.as_bool().ok_or(CodecError::FieldType {
                field,
                expected: "bool",
            }),
        }
    }

    /// Reads a text field, empty if absent.
    pub fn text(&self, field: FieldNumber) -> CodecResult<String> {
        match self.fields.get(&field) {
            None => Ok(String::new()),
            Some(value) => value
                .as_text()
                .map(str::to_string)
                .ok_or(CodecError::FieldType {
                    field,
                    expected: "text",
                }),
        }
    }

    /// Reads a byte string field, empty if absent.
    pub fn bytes(&self, field: FieldNumber) -> CodecResult<Vec<u8>> {
        match self.fields.get(&field) {
            None => Ok(Vec::new()),
            Some(value) => value
                .as_bytes()
                .map(<[u8]>::to_vec)
                .ok_or(CodecError::FieldType {
                    field,
                    expected: "bytes",
                }),
        }
    }
}

fn check_field_len(field: FieldNumber, len: usize, max: usize) -> CodecResult<()> {
    if len > max {
        return Err(CodecError::FieldTooLong { field, len, max });
    }
    Ok(())
}
