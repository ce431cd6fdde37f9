//! Dynamic CBOR value type.

use crate::encoder::to_canonical_cbor;

/// A dynamic CBOR value.
///
/// Only the subset of CBOR used by stored records is modelled. Floats and
/// tags have no representation here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (full i64 range).
    Integer(i64),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Text string (UTF-8).
    Text(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Map of key-value pairs.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Create a map value with its pairs in canonical key order.
    ///
    /// The encoder sorts again on output, so the order here only matters
    /// for comparing decoded and constructed values with `==`.
    pub fn map(mut pairs: Vec<(Value, Value)>) -> Self {
        pairs.sort_by_cached_key(|(key, _)| {
            let bytes = to_canonical_cbor(key).unwrap_or_default();
            (bytes.len(), bytes)
        });
        Value::Map(pairs)
    }

    /// Short name of the CBOR type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// The boolean payload, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    /// The integer payload, if this is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_integer().and_then(|n| u64::try_from(n).ok())
    }

    /// The byte string payload.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if let Value::Bytes(b) = self {
            Some(b)
        } else {
            None
        }
    }

    /// The text payload.
    pub fn as_text(&self) -> Option<&str> {
        if let Value::Text(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Looks up field number `field` when this value is a map.
    pub fn get_field(&self, field: u64) -> Option<&Value> {
        let key = i64::try_from(field).ok()?;
        let Value::Map(pairs) = self else {
            return None;
        };
        pairs
            .iter()
            .find_map(|(k, v)| (k.as_integer() == Some(key)).then_some(v))
    }
}

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $body:expr;)*) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

value_from! {
    bool => |b| Value::Bool(b);
    i64 => |n| Value::Integer(n);
    String => |s| Value::Text(s);
    &str => |s| Value::Text(s.to_owned());
    Vec<u8> => |b| Value::Bytes(b);
    &[u8] => |b| Value::Bytes(b.to_vec());
}
