//! Value <-> Collate codec: recursive encode/decode dispatching on value
//! shape, enforcing key ordering, optional length prefixes, and
//! terminators.

use std::collections::BTreeMap;

use crate::config::Config;
use crate::cursor::{self, Writer};
use crate::error::{Error, Result};
use crate::marker::{Tag, TERMINATOR};
use crate::numeric;
use crate::strcodec;
use crate::value::Value;

/// Encodes `value`'s collated bytes into `buf` starting at offset 0,
/// returning the number of bytes written.
pub fn encode(value: &Value, buf: &mut [u8], config: &Config) -> Result<usize> {
    let mut w = Writer::new(buf);
    encode_value(value, &mut w, config)?;
    Ok(w.pos())
}

/// Reads one top-level collated record from `buf`, returning the parsed
/// value and the number of bytes consumed.
pub fn decode(buf: &[u8], config: &Config) -> Result<(Value, usize)> {
    let mut cur = buf;
    let value = decode_value(&mut cur, config)?;
    let consumed = buf.len() - cur.len();
    Ok((value, consumed))
}

fn encode_string_record(s: &str, w: &mut Writer) -> Result<()> {
    w.write_byte(Tag::String.into_u8())?;
    strcodec::encode_stuffed(s, w)?;
    w.write_terminator()
}

fn encode_length_record(len: usize, w: &mut Writer) -> Result<()> {
    w.write_byte(Tag::Length.into_u8())?;
    numeric::encode_length(len, w)?;
    w.write_terminator()
}

fn encode_value(value: &Value, w: &mut Writer, config: &Config) -> Result<()> {
    match value {
        Value::Missing => {
            if !config.do_missing() {
                return Err(Error::Config("Missing requires do_missing to be enabled"));
            }
            w.write_byte(Tag::Missing.into_u8())?;
            w.write_terminator()
        }
        Value::Null => {
            w.write_byte(Tag::Null.into_u8())?;
            w.write_terminator()
        }
        Value::Bool(b) => {
            let tag = if *b { Tag::True } else { Tag::False };
            w.write_byte(tag.into_u8())?;
            w.write_terminator()
        }
        Value::Number(n) => {
            w.write_byte(Tag::Number.into_u8())?;
            numeric::encode_number(n, config.number_kind(), w)?;
            w.write_terminator()
        }
        Value::String(s) => {
            if config.do_missing() && s.as_str() == config.missing_literal() {
                w.write_byte(Tag::Missing.into_u8())?;
                w.write_terminator()
            } else {
                encode_string_record(s, w)
            }
        }
        Value::Binary(bytes) => {
            w.write_byte(Tag::Binary.into_u8())?;
            w.write_bytes(bytes)?;
            w.write_terminator()
        }
        Value::Array(items) => {
            w.write_byte(Tag::Array.into_u8())?;
            if config.array_len_prefix() {
                encode_length_record(items.len(), w)?;
            }
            for item in items {
                encode_value(item, w, config)?;
            }
            w.write_terminator()
        }
        Value::Object(map) => {
            w.write_byte(Tag::Object.into_u8())?;
            if config.property_len_prefix() {
                encode_length_record(map.len(), w)?;
            }
            let mut keys = config.pools().get();
            keys.clear();
            keys.extend(map.keys().cloned());
            keys.sort();
            for key in keys.iter() {
                encode_string_record(key, w)?;
                encode_value(&map[key], w, config)?;
            }
            w.write_terminator()
        }
    }
}

fn decode_value(cur: &mut &[u8], config: &Config) -> Result<Value> {
    let tag_byte = cursor::read_tag(cur)?;
    let tag = Tag::from_u8(tag_byte).ok_or(Error::Format("unknown type tag".into()))?;
    match tag {
        Tag::Missing => {
            cursor::expect_terminator(cur)?;
            Ok(Value::Missing)
        }
        Tag::Null => {
            cursor::expect_terminator(cur)?;
            Ok(Value::Null)
        }
        Tag::False => {
            cursor::expect_terminator(cur)?;
            Ok(Value::Bool(false))
        }
        Tag::True => {
            cursor::expect_terminator(cur)?;
            Ok(Value::Bool(true))
        }
        Tag::Number => {
            let datum = cursor::take_datum(cur)?;
            Ok(Value::Number(numeric::decode_number(datum, config.number_kind())?))
        }
        Tag::String => {
            let s = strcodec::decode_stuffed(cur)?;
            cursor::expect_terminator(cur)?;
            Ok(Value::String(s))
        }
        Tag::Binary => {
            let datum = cursor::take_datum(cur)?;
            Ok(Value::Binary(datum.to_vec()))
        }
        Tag::Array => {
            if config.array_len_prefix() {
                decode_length_record(cur)?;
            }
            let mut items = Vec::new();
            loop {
                if cursor::peek(cur)? == TERMINATOR {
                    cursor::read_tag(cur)?;
                    break;
                }
                items.push(decode_value(cur, config)?);
            }
            Ok(Value::Array(items))
        }
        Tag::Object => {
            if config.property_len_prefix() {
                decode_length_record(cur)?;
            }
            let mut map = BTreeMap::new();
            loop {
                if cursor::peek(cur)? == TERMINATOR {
                    cursor::read_tag(cur)?;
                    break;
                }
                let key_tag_byte = cursor::read_tag(cur)?;
                if Tag::from_u8(key_tag_byte) != Some(Tag::String) {
                    return Err(Error::Format("object key must be a string record".into()));
                }
                let key = strcodec::decode_stuffed(cur)?;
                cursor::expect_terminator(cur)?;
                let value = decode_value(cur, config)?;
                // Last-writer-wins: keys arrive in sorted order, so a
                // collision only happens for genuinely duplicate keys.
                map.insert(key, value);
            }
            Ok(Value::Object(map))
        }
        Tag::Length => Err(Error::Format("length record encountered outside a prefix position".into())),
    }
}

fn decode_length_record(cur: &mut &[u8]) -> Result<usize> {
    let tag_byte = cursor::read_tag(cur)?;
    if Tag::from_u8(tag_byte) != Some(Tag::Length) {
        return Err(Error::Format("expected a length record".into()));
    }
    let datum = cursor::take_datum(cur)?;
    numeric::decode_length(datum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NumberKind;
    use crate::value::Number;

    fn roundtrip(value: &Value, config: &Config) -> (Value, usize) {
        let mut buf = vec![0u8; 4096];
        let n = encode(value, &mut buf, config).unwrap();
        let (decoded, consumed) = decode(&buf[..n], config).unwrap();
        assert_eq!(consumed, n);
        (decoded, n)
    }

    #[test]
    fn s1_hello_world_matches_published_bytes() {
        let config = Config::default();
        let mut buf = vec![0u8; 32];
        let n = encode(&Value::String("hello world".to_string()), &mut buf, &config).unwrap();
        assert_eq!(
            &buf[..n],
            &[
                0x06, b'h', b'e', b'l', b'l', b'o', b' ', b'w', b'o', b'r', b'l', b'd', 0x00, 0x00
            ]
        );
        assert_eq!(n, 14);
        let (v, consumed) = decode(&buf[..n], &config).unwrap();
        assert_eq!(v, Value::String("hello world".to_string()));
        assert_eq!(consumed, 14);
    }

    #[test]
    fn s2_array_of_floats_round_trips() {
        let config = Config::builder().number_kind(NumberKind::FloatNumber).build();
        let value = Value::Array(vec![
            Value::Number(Number::Float(10.0)),
            Value::Number(Number::Float(20.0)),
        ]);
        let (decoded, _) = roundtrip(&value, &config);
        assert_eq!(decoded, value);
    }

    #[test]
    fn s3_object_keys_sort_regardless_of_input_order() {
        let config = Config::default();
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), Value::Number(Number::UInt(1)));
        map.insert("a".to_string(), Value::Number(Number::UInt(2)));
        let value = Value::Object(map);
        let mut buf = vec![0u8; 64];
        let n = encode(&value, &mut buf, &config).unwrap();
        // key "a" (and its value) must appear before key "b"'s bytes.
        let a_pos = buf.windows(1).position(|w| w == [b'a']).unwrap();
        let b_pos = buf.windows(1).position(|w| w == [b'b']).unwrap();
        assert!(a_pos < b_pos);
        let (decoded, _) = decode(&buf[..n], &config).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn s6_missing_requires_config_opt_in() {
        let off = Config::default();
        let mut buf = vec![0u8; 16];
        let err = encode(&Value::Missing, &mut buf, &off).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let on = Config::builder().do_missing(true).build();
        let n = encode(&Value::Missing, &mut buf, &on).unwrap();
        assert_eq!(&buf[..n], &[Tag::Missing.into_u8(), 0x00]);
        let (decoded, _) = decode(&buf[..n], &on).unwrap();
        assert_eq!(decoded, Value::Missing);
    }

    #[test]
    fn missing_literal_string_encodes_as_missing_when_enabled() {
        let config = Config::builder().do_missing(true).build();
        let literal = config.missing_literal().to_string();
        let mut buf = vec![0u8; 64];
        let n = encode(&Value::String(literal), &mut buf, &config).unwrap();
        let (decoded, _) = decode(&buf[..n], &config).unwrap();
        assert_eq!(decoded, Value::Missing);
    }

    #[test]
    fn empty_array_and_object_are_tag_then_terminator() {
        let config = Config::default();
        let mut buf = vec![0u8; 16];
        let n = encode(&Value::Array(vec![]), &mut buf, &config).unwrap();
        assert_eq!(&buf[..n], &[Tag::Array.into_u8(), 0x00]);

        let n = encode(&Value::Object(BTreeMap::new()), &mut buf, &config).unwrap();
        assert_eq!(&buf[..n], &[Tag::Object.into_u8(), 0x00]);
    }

    #[test]
    fn array_len_prefix_makes_shorter_arrays_sort_first() {
        let config = Config::builder().array_len_prefix(true).build();
        let short = Value::Array(vec![Value::Number(Number::UInt(1)), Value::Number(Number::UInt(2))]);
        let long = Value::Array(vec![
            Value::Number(Number::UInt(1)),
            Value::Number(Number::UInt(2)),
            Value::Number(Number::UInt(3)),
        ]);
        let mut short_buf = vec![0u8; 64];
        let mut long_buf = vec![0u8; 64];
        let sn = encode(&short, &mut short_buf, &config).unwrap();
        let ln = encode(&long, &mut long_buf, &config).unwrap();
        assert!(short_buf[..sn] < long_buf[..ln]);
    }

    #[test]
    fn binary_round_trips_without_embedded_zero() {
        let config = Config::default();
        let value = Value::Binary(vec![1, 2, 3, 255, 254]);
        let (decoded, _) = roundtrip(&value, &config);
        assert_eq!(decoded, value);
    }

    #[test]
    fn decode_rejects_non_string_object_key() {
        let config = Config::default();
        // Object tag, then a Number record used as a key, then garbage.
        let bytes = [Tag::Object.into_u8(), Tag::Number.into_u8(), 0x02, 0x00];
        assert!(decode(&bytes, &config).is_err());
    }

    #[test]
    fn decode_rejects_missing_terminator() {
        let config = Config::default();
        let bytes = [Tag::Null.into_u8()];
        assert!(decode(&bytes, &config).is_err());
    }

    #[test]
    fn encode_reports_capacity_shortfall() {
        let config = Config::default();
        let mut buf = [0u8; 1];
        let err = encode(&Value::Null, &mut buf, &config).unwrap_err();
        assert!(matches!(err, Error::Capacity { .. }));
    }

    #[test]
    fn nested_structures_round_trip() {
        let config = Config::default();
        let mut inner = BTreeMap::new();
        inner.insert("x".to_string(), Value::Number(Number::Int(-5)));
        inner.insert("y".to_string(), Value::Array(vec![Value::Bool(true), Value::Null]));
        let value = Value::Object(inner);
        let (decoded, _) = roundtrip(&value, &config);
        assert_eq!(decoded, value);
    }
}
