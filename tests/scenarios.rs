//! End-to-end scenarios exercising the public API across all four
//! formats this crate bridges.

use std::collections::BTreeMap;

use collate::{cbor_format, json_format, Config, Number, NumberKind, Value};

#[test]
fn hello_world_round_trips_through_collate() {
    let config = Config::default();
    let mut buf = [0u8; 32];
    let n = collate::encode(&Value::from("hello world"), &mut buf, &config).unwrap();
    assert_eq!(
        &buf[..n],
        &[0x06, b'h', b'e', b'l', b'l', b'o', b' ', b'w', b'o', b'r', b'l', b'd', 0x00, 0x00]
    );
    let (value, consumed) = collate::decode(&buf[..n], &config).unwrap();
    assert_eq!(consumed, 14);
    assert_eq!(value, Value::from("hello world"));
}

#[test]
fn float_array_round_trips_without_length_prefix() {
    let config = Config::builder().number_kind(NumberKind::FloatNumber).build();
    let value = Value::Array(vec![
        Value::Number(Number::Float(10.0)),
        Value::Number(Number::Float(20.0)),
    ]);
    let mut buf = [0u8; 64];
    let n = collate::encode(&value, &mut buf, &config).unwrap();
    let (decoded, consumed) = collate::decode(&buf[..n], &config).unwrap();
    assert_eq!(consumed, n);
    assert_eq!(decoded, value);
}

#[test]
fn object_keys_are_emitted_in_sorted_order_regardless_of_input_order() {
    let config = Config::default();
    let mut map = BTreeMap::new();
    map.insert("b".to_string(), Value::Number(Number::UInt(1)));
    map.insert("a".to_string(), Value::Number(Number::UInt(2)));
    let value = Value::Object(map);

    let mut buf = [0u8; 64];
    let n = collate::encode(&value, &mut buf, &config).unwrap();
    let a_pos = buf[..n].iter().position(|&b| b == b'a').unwrap();
    let b_pos = buf[..n].iter().position(|&b| b == b'b').unwrap();
    assert!(a_pos < b_pos);
}

#[test]
fn json_and_collate_agree_on_hello_world() {
    let config = Config::default();
    let from_json = json_format::from_str("\"hello world\"").unwrap();

    let mut collate_buf = [0u8; 32];
    let n = collate::encode(&Value::from("hello world"), &mut collate_buf, &config).unwrap();

    let mut json_buf = [0u8; 32];
    let jn = collate::encode(&from_json, &mut json_buf, &config).unwrap();
    assert_eq!(&collate_buf[..n], &json_buf[..jn]);
}

#[test]
fn cbor_and_collate_agree_on_hello_world() {
    let config = Config::default();
    let mut cbor_bytes = vec![0x6b];
    cbor_bytes.extend_from_slice(b"hello world");
    let from_cbor = cbor_format::from_bytes(&cbor_bytes).unwrap();

    let mut collate_buf = [0u8; 32];
    let n = collate::encode(&Value::from("hello world"), &mut collate_buf, &config).unwrap();

    let mut cbor_value_buf = [0u8; 32];
    let cn = collate::encode(&from_cbor, &mut cbor_value_buf, &config).unwrap();
    assert_eq!(&collate_buf[..n], &cbor_value_buf[..cn]);
}

#[test]
fn missing_is_gated_by_config() {
    let off = Config::default();
    let mut buf = [0u8; 16];
    assert!(collate::encode(&Value::Missing, &mut buf, &off).is_err());

    let on = Config::builder().do_missing(true).build();
    let n = collate::encode(&Value::Missing, &mut buf, &on).unwrap();
    assert_eq!(&buf[..n], &[0x01, 0x00]);
    let (decoded, _) = collate::decode(&buf[..n], &on).unwrap();
    assert_eq!(decoded, Value::Missing);
}

#[test]
fn json_round_trip_through_collate_preserves_shape() {
    let config = Config::builder().number_kind(NumberKind::FloatNumber).build();
    let text = r#"{"name":"ferris","tags":["fast","safe"],"active":true,"count":3}"#;
    let value = json_format::from_str(text).unwrap();

    let mut buf = vec![0u8; 256];
    let n = collate::encode(&value, &mut buf, &config).unwrap();
    let (decoded, _) = collate::decode(&buf[..n], &config).unwrap();
    assert_eq!(decoded, value);

    let back = json_format::to_string(&decoded).unwrap();
    let reparsed = json_format::from_str(&back).unwrap();
    assert_eq!(reparsed, value);
}
