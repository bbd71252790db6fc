use serde::{de, ser, Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An arbitrary-precision decimal literal, carried as text the way
/// `encoding/json`'s `json.Number` does (e.g. `"3.14159"`, `"-2.5e10"`).
pub type DecimalText = Arc<str>;

/// A number carried by a [`Value`]. Semantically a real number; the
/// variant records which concrete representation the caller handed in.
/// Mixing representations is legal on input (an `Array` may hold an
/// `Int` next to a `Float`) but a decode always produces the single
/// representation the active [`crate::config::NumberKind`] normalizes to.
#[derive(Clone, Debug)]
pub enum Number {
    /// A negative integer, stored as its native width.
    Int(i64),
    /// A non-negative integer, stored as its native width.
    UInt(u64),
    /// An IEEE-754 double.
    Float(f64),
    /// An arbitrary-precision decimal literal.
    Decimal(DecimalText),
}

impl Number {
    pub fn from_decimal(s: impl Into<Arc<str>>) -> Number {
        Number::Decimal(s.into())
    }

    /// Best-effort conversion to `f64`, used by `NumberKind::FloatNumber`.
    pub fn to_f64(&self) -> crate::error::Result<f64> {
        match self {
            Number::Int(v) => Ok(*v as f64),
            Number::UInt(v) => Ok(*v as f64),
            Number::Float(v) => Ok(*v),
            Number::Decimal(s) => s
                .parse::<f64>()
                .map_err(|_| crate::error::Error::Numeric(s.to_string())),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::UInt(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{:e}", v),
            Number::Decimal(s) => f.write_str(s),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        // Sufficient for equality checks in tests; the collation codec
        // in `collate.rs` is the authority on the byte-level order that
        // encoded values carry, not this impl.
        match (self.to_f64(), other.to_f64()) {
            (Ok(a), Ok(b)) => a.partial_cmp(&b),
            _ => None,
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(v: $t) -> Number {
                if v < 0 { Number::Int(v as i64) } else { Number::UInt(v as u64) }
            }
        })*
    };
}
macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(v: $t) -> Number {
                Number::UInt(v as u64)
            }
        })*
    };
}
impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f64> for Number {
    fn from(v: f64) -> Number {
        Number::Float(v)
    }
}

impl From<f32> for Number {
    fn from(v: f32) -> Number {
        Number::Float(v as f64)
    }
}

// Hand-written rather than derived: `Number` isn't a plain product of
// serde-visible fields, it's a tagged real number, so it serializes as
// whichever primitive it currently holds.
impl Serialize for Number {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::Int(v) => serializer.serialize_i64(*v),
            Number::UInt(v) => serializer.serialize_u64(*v),
            Number::Float(v) => serializer.serialize_f64(*v),
            Number::Decimal(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;
        impl<'de> de::Visitor<'de> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(fmt, "a number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
                Ok(Number::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
                Ok(Number::UInt(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
                Ok(Number::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Number, E> {
                Ok(Number::from_decimal(v))
            }
        }
        deserializer.deserialize_any(NumberVisitor)
    }
}

/// The in-memory value tree shared by the JSON, CBOR, and collation
/// codecs. Insertion order of a [`Value::Object`] is irrelevant on
/// encode: the collation codec always reorders keys by their raw UTF-8
/// byte order, which is exactly what `BTreeMap<String, _>` already
/// gives for free, and its derived equality ignores insertion order
/// too.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Binary(Vec<u8>),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    /// A distinguished sentinel, used only when `Config::do_missing` is
    /// enabled. Never produced by the JSON/CBOR adapters on their own;
    /// only `collate::decode` hands one back, and only when the config
    /// that produced the bytes had `do_missing` set.
    Missing,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Missing, Value::Missing) => true,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Number(Number::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Value {
        Value::Number(Number::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Number(Number::from(v))
    }
}
