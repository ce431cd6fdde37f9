//! The `User` entity.

use userdb_codec::{CodecResult, Decode, Encode, FieldNumber, RecordReader, RecordWriter};

use crate::record::Record;

/// Longest accepted username, in UTF-8 bytes.
pub const MAX_USERNAME_LEN: usize = 256;

const FIELD_ID: FieldNumber = 1;
const FIELD_USERNAME: FieldNumber = 2;

/// A user in the `Users` collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier; `0` until created.
    pub id: u64,
    /// Display name.
    pub username: String,
}

impl User {
    /// Creates an uncreated user with the given name.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: 0,
            username: username.into(),
        }
    }
}

impl Encode for User {
    fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut w = RecordWriter::new();
        w.put_uint(FIELD_ID, self.id)?;
        w.put_text(FIELD_USERNAME, &self.username, MAX_USERNAME_LEN)?;
        w.finish()
    }
}

impl Decode for User {
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        let r = RecordReader::from_bytes(bytes)?;
        Ok(Self {
            id: r.uint(FIELD_ID)?,
            username: r.text(FIELD_USERNAME)?,
        })
    }
}

impl Record for User {
    const COLLECTION: &'static str = "Users";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdb_codec::{CodecError, Value};

    #[test]
    fn encode_decode_roundtrip() {
        let user = User {
            id: 7,
            username: "susy".to_string(),
        };
        let bytes = user.encode().unwrap();
        assert_eq!(User::decode(&bytes).unwrap(), user);
    }

    #[test]
    fn deterministic_encoding() {
        let a = User {
            id: 3,
            username: "john".to_string(),
        };
        assert_eq!(a.encode().unwrap(), a.clone().encode().unwrap());
    }

    #[test]
    fn wire_layout() {
        let bytes = User {
            id: 1,
            username: "susy".to_string(),
        }
        .encode()
        .unwrap();
        assert_eq!(
            bytes,
            vec![0xa2, 0x01, 0x01, 0x02, 0x64, b's', b'u', b's', b'y']
        );
    }

    #[test]
    fn newer_schema_fields_are_ignored() {
        // A later schema adding field 3 (email) must still decode here.
        let mut w = RecordWriter::new();
        w.put_uint(FIELD_ID, 5).unwrap();
        w.put_text(FIELD_USERNAME, "jimbo", 64).unwrap();
        w.put_text(3, "jimbo@example.com", 64).unwrap();
        let user = User::decode(&w.finish().unwrap()).unwrap();

        assert_eq!(
            user,
            User {
                id: 5,
                username: "jimbo".to_string()
            }
        );
    }

    #[test]
    fn older_schema_missing_fields_decode_to_zero() {
        let mut w = RecordWriter::new();
        w.put_uint(FIELD_ID, 9).unwrap();
        let user = User::decode(&w.finish().unwrap()).unwrap();
        assert_eq!(user, User { id: 9, username: String::new() });

        assert_eq!(User::decode(&[0xa0]).unwrap(), User::default());
    }

    #[test]
    fn username_length_limit() {
        let ok = User::new("a".repeat(MAX_USERNAME_LEN));
        assert!(ok.encode().is_ok());

        let too_long = User::new("a".repeat(MAX_USERNAME_LEN + 1));
        assert_eq!(
            too_long.encode(),
            Err(CodecError::FieldTooLong {
                field: FIELD_USERNAME,
                len: MAX_USERNAME_LEN + 1,
                max: MAX_USERNAME_LEN,
            })
        );
    }

    #[test]
    fn id_beyond_signed_range_fails_to_encode() {
        let user = User {
            id: u64::MAX,
            username: "max".to_string(),
        };
        assert_eq!(user.encode(), Err(CodecError::IntegerOverflow));
    }

    #[test]
    fn malformed_bytes_fail_to_decode() {
        assert!(User::decode(&[0xff, 0x00]).is_err());
        assert!(User::decode(b"not cbor at all").is_err());

        let wrong_type = userdb_codec::to_canonical_cbor(&Value::map(vec![(
            Value::Integer(2),
            Value::Integer(12),
        )]))
        .unwrap();
        assert_eq!(
            User::decode(&wrong_type),
            Err(CodecError::FieldType {
                field: FIELD_USERNAME,
                expected: "text"
            })
        );
    }
}
