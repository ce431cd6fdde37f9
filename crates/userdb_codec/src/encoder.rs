//! Canonical CBOR encoder.

use crate::decoder::{MAX_BYTES_LENGTH, MAX_CONTAINER_ELEMENTS, MAX_DEPTH};
use crate::error::{CodecError, CodecResult};
use crate::value::Value;

const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_NEGATIVE: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;

/// Encode a value to canonical CBOR bytes.
///
/// Output follows RFC 8949 Section 4.2.1: shortest-form integers and
/// lengths, map keys sorted by their encoded bytes (length first), and no
/// indefinite-length items.
///
/// # Errors
///
/// Fails if the value is something the decoder would refuse to read back:
/// strings or containers over the size limits, nesting deeper than the
/// depth limit, or a map with duplicate keys.
pub fn to_canonical_cbor(value: &Value) -> CodecResult<Vec<u8>> {
    let mut encoder = CanonicalEncoder::new();
    encoder.encode(value)?;
    Ok(encoder.into_bytes())
}

/// A canonical CBOR encoder writing into an owned buffer.
#[derive(Debug, Default)]
pub struct CanonicalEncoder {
    buffer: Vec<u8>,
}

impl CanonicalEncoder {
    /// Creates an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value to the buffer.
    ///
    /// On error the buffer may hold a partial item; discard the encoder.
    pub fn encode(&mut self, value: &Value) -> CodecResult<()> {
        self.encode_at(value, 0)
    }

    /// Returns everything written so far.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn encode_at(&mut self, value: &Value, depth: usize) -> CodecResult<()> {
        if depth > MAX_DEPTH {
            return Err(CodecError::DepthExceeded { max: MAX_DEPTH });
        }

        match value {
            Value::Null => self.buffer.push(0xf6),
            Value::Bool(false) => self.buffer.push(0xf4),
            Value::Bool(true) => self.buffer.push(0xf5),
            Value::Integer(n) => self.write_integer(*n),
            Value::Bytes(b) => {
                check_len(b.len(), MAX_BYTES_LENGTH)?;
                self.write_head(MAJOR_BYTES, b.len() as u64);
                self.buffer.extend_from_slice(b);
            }
            Value::Text(s) => {
                check_len(s.len(), MAX_BYTES_LENGTH)?;
                self.write_head(MAJOR_TEXT, s.len() as u64);
                self.buffer.extend_from_slice(s.as_bytes());
            }
            Value::Array(items) => {
                check_len(items.len(), MAX_CONTAINER_ELEMENTS)?;
                self.write_head(MAJOR_ARRAY, items.len() as u64);
                for item in items {
                    self.encode_at(item, depth + 1)?;
                }
            }
            Value::Map(pairs) => self.write_map(pairs, depth)?,
        }
        Ok(())
    }

    fn write_integer(&mut self, n: i64) {
        match u64::try_from(n) {
            Ok(unsigned) => self.write_head(MAJOR_UNSIGNED, unsigned),
            // -1 - n is non-negative for every negative i64
            #[allow(clippy::cast_sign_loss)]
            Err(_) => self.write_head(MAJOR_NEGATIVE, (-1 - n) as u64),
        }
    }

    fn write_head(&mut self, major: u8, arg: u64) {
        let mt = major << 5;
        if arg < 24 {
            self.buffer.push(mt | arg as u8);
        } else if let Ok(a) = u8::try_from(arg) {
            self.buffer.push(mt | 24);
            self.buffer.push(a);
        } else if let Ok(a) = u16::try_from(arg) {
            self.buffer.push(mt | 25);
            self.buffer.extend_from_slice(&a.to_be_bytes());
        } else if let Ok(a) = u32::try_from(arg) {
            self.buffer.push(mt | 26);
            self.buffer.extend_from_slice(&a.to_be_bytes());
        } else {
            self.buffer.push(mt | 27);
            self.buffer.extend_from_slice(&arg.to_be_bytes());
        }
    }

    fn write_map(&mut self, pairs: &[(Value, Value)], depth: usize) -> CodecResult<()> {
        check_len(pairs.len(), MAX_CONTAINER_ELEMENTS)?;

        let mut entries = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let mut key_encoder = CanonicalEncoder::new();
            key_encoder.encode_at(key, depth + 1)?;
            entries.push((key_encoder.into_bytes(), value));
        }
        entries.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));

        if entries.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(CodecError::encoding_failed("duplicate map key"));
        }

        self.write_head(MAJOR_MAP, pairs.len() as u64);
        for (key, value) in entries {
            self.buffer.extend_from_slice(&key);
            self.encode_at(value, depth + 1)?;
        }
        Ok(())
    }
}

fn check_len(len: usize, max: u64) -> CodecResult<()> {
    let len = len as u64;
    if len > max {
        return Err(CodecError::SizeLimitExceeded {
            claimed: len,
            max_allowed: max,
        });
    }
    Ok(())
}
