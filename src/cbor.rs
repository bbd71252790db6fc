//! CBOR <-> Value adapter (RFC 7049 family), built the same way as the
//! JSON adapter: a plain recursive walk over `ciborium`'s generic value
//! type rather than a full `Serializer`/`Deserializer` pair.

use std::collections::BTreeMap;

use ciborium::value::{Integer, Value as Cbor};

use crate::error::{Error, Result};
use crate::value::{Number, Value};

/// Parses a CBOR document into a [`Value`] tree.
pub fn from_bytes(bytes: &[u8]) -> Result<Value> {
    let cbor: Cbor =
        ciborium::de::from_reader(bytes).map_err(|e| Error::Format(e.to_string().into()))?;
    from_cbor(&cbor)
}

/// Serializes a [`Value`] tree as CBOR bytes.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    let cbor = to_cbor(value)?;
    let mut out = Vec::new();
    ciborium::ser::into_writer(&cbor, &mut out).map_err(|e| Error::Format(e.to_string().into()))?;
    Ok(out)
}

/// Converts a parsed `ciborium::value::Value` into this crate's [`Value`].
pub fn from_cbor(cbor: &Cbor) -> Result<Value> {
    match cbor {
        Cbor::Null => Ok(Value::Null),
        Cbor::Bool(b) => Ok(Value::Bool(*b)),
        Cbor::Integer(i) => {
            let magnitude: i128 = (*i).into();
            if let Ok(v) = u64::try_from(magnitude) {
                Ok(Value::Number(Number::UInt(v)))
            } else if let Ok(v) = i64::try_from(magnitude) {
                Ok(Value::Number(Number::Int(v)))
            } else {
                // Outside i64/u64 range (CBOR major type 1 reaches down to
                // -2^64): widen rather than silently wrap via `as`.
                Ok(Value::Number(Number::Float(magnitude as f64)))
            }
        }
        Cbor::Float(f) => Ok(Value::Number(Number::Float(*f))),
        Cbor::Text(s) => Ok(Value::String(s.clone())),
        Cbor::Bytes(b) => Ok(Value::Binary(b.clone())),
        Cbor::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(from_cbor(item)?);
            }
            Ok(Value::Array(out))
        }
        Cbor::Map(pairs) => {
            let mut out = BTreeMap::new();
            for (k, v) in pairs {
                let key = match k {
                    Cbor::Text(s) => s.clone(),
                    _ => return Err(Error::Format("CBOR map key must be a text string".into())),
                };
                out.insert(key, from_cbor(v)?);
            }
            Ok(Value::Object(out))
        }
        Cbor::Tag(_, inner) => from_cbor(inner),
        _ => Err(Error::Type("unsupported CBOR major type")),
    }
}

/// Converts this crate's [`Value`] into a `ciborium::value::Value`.
/// `Missing` has no CBOR counterpart and is rejected with [`Error::Type`].
pub fn to_cbor(value: &Value) -> Result<Cbor> {
    match value {
        Value::Null => Ok(Cbor::Null),
        Value::Bool(b) => Ok(Cbor::Bool(*b)),
        Value::Number(n) => number_to_cbor(n),
        Value::String(s) => Ok(Cbor::Text(s.clone())),
        Value::Binary(bytes) => Ok(Cbor::Bytes(bytes.clone())),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(to_cbor(item)?);
            }
            Ok(Cbor::Array(out))
        }
        Value::Object(map) => {
            let mut out = Vec::with_capacity(map.len());
            for (k, v) in map {
                out.push((Cbor::Text(k.clone()), to_cbor(v)?));
            }
            Ok(Cbor::Map(out))
        }
        Value::Missing => Err(Error::Type("CBOR has no representation for Missing")),
    }
}

fn number_to_cbor(n: &Number) -> Result<Cbor> {
    match n {
        Number::Int(v) => Ok(Cbor::Integer(Integer::from(*v))),
        Number::UInt(v) => Ok(Cbor::Integer(Integer::from(*v))),
        Number::Float(v) => Ok(Cbor::Float(*v)),
        Number::Decimal(s) => s
            .parse::<f64>()
            .map(Cbor::Float)
            .map_err(|_| Error::Numeric(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s5_hello_world_matches_the_published_cbor_prefix() {
        // 0x6b is a 3-bit major type (3, text string) with an 11-byte length.
        let mut bytes = vec![0x6b];
        bytes.extend_from_slice(b"hello world");
        let value = from_bytes(&bytes).unwrap();
        assert_eq!(value, Value::String("hello world".to_string()));
    }

    #[test]
    fn round_trips_nested_structures() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), Value::Number(Number::Int(-7)));
        map.insert("b".to_string(), Value::Array(vec![Value::Bool(true), Value::Null]));
        let value = Value::Object(map);
        let bytes = to_bytes(&value).unwrap();
        let back = from_bytes(&bytes).unwrap();
        assert_eq!(value, back);
    }

    #[test]
    fn missing_has_no_cbor_form() {
        let err = to_cbor(&Value::Missing).unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }

    #[test]
    fn integers_outside_i64_u64_range_widen_to_float_instead_of_wrapping() {
        // CBOR major type 1 (negative integer) reaches down to -2^64,
        // past i64::MIN; widening to Float must not silently wrap.
        let magnitude = i128::from(i64::MIN) * 2;
        let cbor = Cbor::Integer(Integer::try_from(magnitude).unwrap());
        let value = from_cbor(&cbor).unwrap();
        assert_eq!(value, Value::Number(Number::Float(magnitude as f64)));
    }

    #[test]
    fn floats_round_trip() {
        let value = Value::Number(Number::Float(3.5));
        let bytes = to_bytes(&value).unwrap();
        let back = from_bytes(&bytes).unwrap();
        assert_eq!(value, back);
    }
}
