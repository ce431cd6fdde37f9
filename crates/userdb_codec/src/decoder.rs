//! Canonical CBOR decoder.

use std::cmp::Ordering;

use crate::error::{CodecError, CodecResult};
use crate::value::Value;

/// Maximum element count for arrays and maps.
pub const MAX_CONTAINER_ELEMENTS: u64 = 1024 * 1024;

/// Maximum byte or text string length.
pub const MAX_BYTES_LENGTH: u64 = 64 * 1024 * 1024;

/// Maximum container nesting depth.
pub const MAX_DEPTH: usize = 64;

/// Decode exactly one value from CBOR bytes.
///
/// # Errors
///
/// Fails if the bytes are not canonical CBOR, use constructs outside the
/// [`Value`] model (floats, tags, other simple values), exceed the size or
/// depth limits, or have bytes left over after the first item.
pub fn from_cbor(bytes: &[u8]) -> CodecResult<Value> {
    let mut decoder = CanonicalDecoder::new(bytes);
    let value = decoder.decode()?;
    if !decoder.is_empty() {
        return Err(CodecError::TrailingBytes {
            count: decoder.remaining().len(),
        });
    }
    Ok(value)
}

/// A canonical CBOR decoder over a borrowed buffer.
///
/// Accepts only the canonical encoding produced by
/// [`CanonicalEncoder`](crate::CanonicalEncoder), so every accepted input
/// re-encodes to the same bytes.
pub struct CanonicalDecoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> CanonicalDecoder<'a> {
    /// Create a new decoder for the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Decode the next value.
    pub fn decode(&mut self) -> CodecResult<Value> {
        self.decode_at(0)
    }

    /// Check if all bytes have been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Get remaining bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    fn decode_at(&mut self, depth: usize) -> CodecResult<Value> {
        if depth > MAX_DEPTH {
            return Err(CodecError::DepthExceeded { max: MAX_DEPTH });
        }

        let initial = self.read_byte()?;
        let major = initial >> 5;
        let info = initial & 0x1f;

        match major {
            0 => {
                let n = self.read_argument(info)?;
                i64::try_from(n)
                    .map(Value::Integer)
                    .map_err(|_| CodecError::IntegerOverflow)
            }
            1 => {
                let n = self.read_argument(info)?;
                i64::try_from(n)
                    .map(|n| Value::Integer(-1 - n))
                    .map_err(|_| CodecError::IntegerOverflow)
            }
            2 => {
                let len = self.read_length(info, MAX_BYTES_LENGTH)?;
                Ok(Value::Bytes(self.read_slice(len)?.to_vec()))
            }
            3 => {
                let len = self.read_length(info, MAX_BYTES_LENGTH)?;
                let raw = self.read_slice(len)?;
                let text = std::str::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8)?;
                Ok(Value::Text(text.to_string()))
            }
            4 => {
                let len = self.read_length(info, MAX_CONTAINER_ELEMENTS)?;
                // Every item takes at least one byte.
                let mut items = Vec::with_capacity(len.min(self.remaining().len()));
                for _ in 0..len {
                    items.push(self.decode_at(depth + 1)?);
                }
                Ok(Value::Array(items))
            }
            5 => self.decode_map(info, depth),
            6 => Err(CodecError::unsupported_type("tag")),
            _ => self.decode_simple(info),
        }
    }

    fn decode_map(&mut self, info: u8, depth: usize) -> CodecResult<Value> {
        let len = self.read_length(info, MAX_CONTAINER_ELEMENTS)?;
        let mut pairs = Vec::with_capacity(len.min(self.remaining().len() / 2));
        let data = self.data;
        let mut prev_key: Option<&'a [u8]> = None;

        for _ in 0..len {
            let start = self.pos;
            let key = self.decode_at(depth + 1)?;
            let key_bytes = &data[start..self.pos];

            if let Some(prev) = prev_key {
                match cmp_encoded(prev, key_bytes) {
                    Ordering::Less => {}
                    Ordering::Equal => {
                        return Err(CodecError::invalid_structure("duplicate map key"))
                    }
                    Ordering::Greater => {
                        return Err(CodecError::invalid_structure(
                            "non-canonical: map keys not in sorted order",
                        ))
                    }
                }
            }
            prev_key = Some(key_bytes);

            let value = self.decode_at(depth + 1)?;
            pairs.push((key, value));
        }

        Ok(Value::Map(pairs))
    }

    fn decode_simple(&mut self, info: u8) -> CodecResult<Value> {
        match info {
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            22 => Ok(Value::Null),
            25..=27 => Err(CodecError::FloatForbidden),
            31 => Err(CodecError::invalid_structure("break outside indefinite item")),
            other => Err(CodecError::unsupported_type(format!("simple value {other}"))),
        }
    }

    fn read_byte(&mut self) -> CodecResult<u8> {
        let byte = *self.data.get(self.pos).ok_or(CodecError::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_slice(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(CodecError::UnexpectedEof)?;
        let slice = self.data.get(self.pos..end).ok_or(CodecError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_slice(N)?);
        Ok(buf)
    }

    fn read_length(&mut self, info: u8, max: u64) -> CodecResult<usize> {
        let len = self.read_argument(info)?;
        if len > max {
            return Err(CodecError::SizeLimitExceeded {
                claimed: len,
                max_allowed: max,
            });
        }
        usize::try_from(len).map_err(|_| CodecError::SizeLimitExceeded {
            claimed: len,
            max_allowed: max,
        })
    }

    /// Reads the head argument and rejects anything not in shortest form.
    fn read_argument(&mut self, info: u8) -> CodecResult<u64> {
        let (value, min) = match info {
            0..=23 => return Ok(u64::from(info)),
            24 => (u64::from(self.read_byte()?), 24),
            25 => (u64::from(u16::from_be_bytes(self.read_array()?)), 0x100),
            26 => (u64::from(u32::from_be_bytes(self.read_array()?)), 0x1_0000),
            27 => (u64::from_be_bytes(self.read_array()?), 0x1_0000_0000),
            31 => return Err(CodecError::IndefiniteLengthForbidden),
            _ => return Err(CodecError::invalid_structure("reserved additional info")),
        };

        if value < min {
            return Err(CodecError::invalid_structure(
                "non-canonical: value could be encoded in fewer bytes",
            ));
        }
        Ok(value)
    }
}

/// Canonical key order: shorter encodings first, then bytewise.
fn cmp_encoded(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::to_canonical_cbor;

    #[test]
    fn decode_scalars() {
        assert_eq!(from_cbor(&[0xf6]).unwrap(), Value::Null);
        assert_eq!(from_cbor(&[0xf5]).unwrap(), Value::Bool(true));
        assert_eq!(from_cbor(&[0x17]).unwrap(), Value::Integer(23));
        assert_eq!(from_cbor(&[0x19, 0x01, 0x00]).unwrap(), Value::Integer(256));
        assert_eq!(from_cbor(&[0x38, 99]).unwrap(), Value::Integer(-100));
        assert_eq!(
            from_cbor(&[0x62, b'h', b'i']).unwrap(),
            Value::Text("hi".to_string())
        );
    }

    #[test]
    fn decode_record_shaped_map() {
        let bytes = [0xa2, 0x01, 0x01, 0x02, 0x64, b's', b'u', b's', b'y'];
        let value = from_cbor(&bytes).unwrap();
        assert_eq!(value.get_field(1), Some(&Value::Integer(1)));
        assert_eq!(value.get_field(2), Some(&Value::from("susy")));
    }

    #[test]
    fn reencoding_is_identity() {
        let value = Value::map(vec![
            (Value::Integer(1), Value::Integer(300)),
            (Value::Integer(2), Value::from("john")),
            (Value::Integer(3), Value::Array(vec![Value::Bool(false), Value::Null])),
        ]);
        let bytes = to_canonical_cbor(&value).unwrap();
        let decoded = from_cbor(&bytes).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(to_canonical_cbor(&decoded).unwrap(), bytes);
    }

    #[test]
    fn floats_refused() {
        assert_eq!(from_cbor(&[0xf9, 0x00, 0x00]), Err(CodecError::FloatForbidden));
        assert_eq!(
            from_cbor(&[0xfb, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(CodecError::FloatForbidden)
        );
    }

    #[test]
    fn indefinite_containers_refused() {
        assert_eq!(
            from_cbor(&[0x9f, 0x01, 0xff]),
            Err(CodecError::IndefiniteLengthForbidden)
        );
        assert_eq!(
            from_cbor(&[0xbf, 0x01, 0x01, 0xff]),
            Err(CodecError::IndefiniteLengthForbidden)
        );
    }

    #[test]
    fn padded_heads_refused() {
        assert!(matches!(
            from_cbor(&[0x18, 23]),
            Err(CodecError::InvalidStructure { .. })
        ));
        assert!(matches!(
            from_cbor(&[0x19, 0x00, 0xff]),
            Err(CodecError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn reject_unsorted_and_duplicate_keys() {
        assert!(matches!(
            from_cbor(&[0xa2, 0x02, 0xf6, 0x01, 0xf6]),
            Err(CodecError::InvalidStructure { .. })
        ));
        assert!(matches!(
            from_cbor(&[0xa2, 0x01, 0xf6, 0x01, 0xf6]),
            Err(CodecError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn reject_trailing_bytes() {
        assert_eq!(
            from_cbor(&[0x01, 0x02]),
            Err(CodecError::TrailingBytes { count: 1 })
        );
    }

    #[test]
    fn reject_tags_and_unsigned_overflow() {
        assert!(matches!(
            from_cbor(&[0xc1, 0x01]),
            Err(CodecError::UnsupportedType { .. })
        ));
        assert_eq!(
            from_cbor(&[0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            Err(CodecError::IntegerOverflow)
        );
    }

    #[test]
    fn oversized_length_claims_fail_before_allocating() {
        assert!(matches!(
            from_cbor(&[0x5b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            Err(CodecError::SizeLimitExceeded { .. })
        ));
        // Plausible array length with no items behind it.
        assert_eq!(
            from_cbor(&[0x9a, 0x00, 0x01, 0x00, 0x00]),
            Err(CodecError::UnexpectedEof)
        );
    }

    #[test]
    fn unexpected_eof() {
        assert_eq!(from_cbor(&[]), Err(CodecError::UnexpectedEof));
        assert_eq!(from_cbor(&[0x19, 0x01]), Err(CodecError::UnexpectedEof));
        assert_eq!(from_cbor(&[0x63, b'a']), Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert_eq!(from_cbor(&[0x62, 0xff, 0xfe]), Err(CodecError::InvalidUtf8));
    }
}
