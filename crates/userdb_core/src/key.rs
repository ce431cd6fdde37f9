//! Record key encoding.
//!
//! Identifiers are stored as 8-byte big-endian keys so that the engine's
//! bytewise key order is the numeric id order. Cursor listing and range
//! seeks depend on this.

use crate::error::{StoreError, StoreResult};

/// Width of an encoded identifier.
pub const KEY_LEN: usize = 8;

/// Largest identifier a record can carry.
///
/// The record codec stores integers in the signed 64-bit range, so
/// sequences stop here rather than at `u64::MAX`.
pub const MAX_ID: u64 = i64::MAX as u64;

/// Encodes an identifier as a fixed-width big-endian key.
#[inline]
#[must_use]
pub const fn encode_id(id: u64) -> [u8; KEY_LEN] {
    id.to_be_bytes()
}

/// Decodes a key produced by [`encode_id`].
///
/// # Errors
///
/// Returns [`StoreError::InvalidKey`] unless `key` is exactly
/// [`KEY_LEN`] bytes.
pub fn decode_id(key: &[u8]) -> StoreResult<u64> {
    let bytes: [u8; KEY_LEN] = key
        .try_into()
        .map_err(|_| StoreError::InvalidKey { len: key.len() })?;
    Ok(u64::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn key_order_preserves_id_order(a in any::<u64>(), b in any::<u64>()) {
            prop_assert_eq!(encode_id(a).cmp(&encode_id(b)), a.cmp(&b));
            prop_assert_eq!(decode_id(&encode_id(a)).unwrap(), a);
        }
    }

    #[test]
    fn big_endian_layout() {
        assert_eq!(encode_id(1), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(encode_id(0x0102), [0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(encode_id(u64::MAX), [0xff; 8]);
    }

    #[test]
    fn decode_inverts_encode() {
        for id in [0, 1, 255, 256, 1 << 32, u64::MAX] {
            assert_eq!(decode_id(&encode_id(id)).unwrap(), id);
        }
    }

    #[test]
    fn byte_order_matches_numeric_order() {
        // Little-endian would put 256 before 1.
        assert!(encode_id(1) < encode_id(2));
        assert!(encode_id(255) < encode_id(256));
        assert!(encode_id(u64::from(u32::MAX)) < encode_id(1 << 32));
    }

    #[test]
    fn wrong_width_rejected() {
        assert!(matches!(
            decode_id(&[0; 7]),
            Err(StoreError::InvalidKey { len: 7 })
        ));
        assert!(matches!(
            decode_id(&[0; 9]),
            Err(StoreError::InvalidKey { len: 9 })
        ));
    }
}
