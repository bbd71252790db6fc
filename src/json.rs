//! JSON <-> Value adapter. Shares the in-memory `Value` tree with the
//! collation and CBOR codecs; conversion here is a plain recursive walk
//! rather than a full `serde::Serializer`/`Deserializer` implementation,
//! since `Value` is a fixed tagged union rather than a generic target.

use std::collections::BTreeMap;

use serde_json::Value as Json;

use crate::error::{Error, Result};
use crate::value::{Number, Value};

/// Parses a JSON document into a [`Value`] tree.
pub fn from_str(text: &str) -> Result<Value> {
    let json: Json = serde_json::from_str(text).map_err(|e| Error::Format(e.to_string().into()))?;
    from_json(&json)
}

/// Serializes a [`Value`] tree as compact JSON text.
pub fn to_string(value: &Value) -> Result<String> {
    let json = to_json(value)?;
    serde_json::to_string(&json).map_err(|e| Error::Format(e.to_string().into()))
}

/// Converts a parsed `serde_json::Value` into this crate's [`Value`].
pub fn from_json(json: &Json) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => Ok(Value::Number(json_number_to_number(n))),
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(from_json(item)?);
            }
            Ok(Value::Array(out))
        }
        Json::Object(map) => {
            let mut out = BTreeMap::new();
            for (k, v) in map {
                out.insert(k.clone(), from_json(v)?);
            }
            Ok(Value::Object(out))
        }
    }
}

fn json_number_to_number(n: &serde_json::Number) -> Number {
    if let Some(v) = n.as_u64() {
        Number::UInt(v)
    } else if let Some(v) = n.as_i64() {
        Number::Int(v)
    } else if let Some(v) = n.as_f64() {
        Number::Float(v)
    } else {
        Number::from_decimal(n.to_string())
    }
}

/// Converts this crate's [`Value`] into a `serde_json::Value`. `Binary`
/// has no native JSON representation, so it's carried as an array of
/// byte values; `Missing` has no JSON counterpart at all and is
/// rejected with [`Error::Type`].
pub fn to_json(value: &Value) -> Result<Json> {
    match value {
        Value::Null => Ok(Json::Null),
        Value::Bool(b) => Ok(Json::Bool(*b)),
        Value::Number(n) => number_to_json(n),
        Value::String(s) => Ok(Json::String(s.clone())),
        Value::Binary(bytes) => Ok(Json::Array(
            bytes.iter().map(|&b| Json::Number(b.into())).collect(),
        )),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(to_json(item)?);
            }
            Ok(Json::Array(out))
        }
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), to_json(v)?);
            }
            Ok(Json::Object(out))
        }
        Value::Missing => Err(Error::Type("JSON has no representation for Missing")),
    }
}

fn number_to_json(n: &Number) -> Result<Json> {
    match n {
        Number::Int(v) => Ok(Json::Number((*v).into())),
        Number::UInt(v) => Ok(Json::Number((*v).into())),
        Number::Float(v) => serde_json::Number::from_f64(*v)
            .map(Json::Number)
            .ok_or_else(|| Error::Config("NaN/infinite numbers cannot be represented in JSON")),
        Number::Decimal(s) => s
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Json::Number)
            .ok_or_else(|| Error::Numeric(s.to_string())),
    }
}
