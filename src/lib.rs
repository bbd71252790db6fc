//! A multi-format value codec centered on an order-preserving binary
//! collation encoding.
//!
//! Four representations of structured data share one in-memory tree
//! (see [`Value`]): JSON text, CBOR bytes, the `COLLATE` binary
//! encoding, and the tree itself. The collation encoder/decoder is the
//! hard part: encoded byte order (plain `memcmp`) matches the semantic
//! order of the value across numbers, strings, arrays, and objects,
//! under two independent length-prefix policies, streaming into a
//! caller-supplied buffer with no hidden allocation.
//!
//! ```
//! use collate::{Config, Value};
//!
//! let config = Config::default();
//! let mut buf = [0u8; 64];
//! let n = collate::encode(&Value::from("hello world"), &mut buf, &config).unwrap();
//! let (value, consumed) = collate::decode(&buf[..n], &config).unwrap();
//! assert_eq!(consumed, n);
//! assert_eq!(value, Value::from("hello world"));
//! ```

mod cbor;
mod collate;
mod config;
mod cursor;
mod error;
mod json;
mod marker;
mod numeric;
mod pool;
mod strcodec;
mod value;

pub use crate::collate::{decode, encode};
pub use crate::config::{Config, ConfigBuilder, NumberKind, DEFAULT_MISSING_LITERAL};
pub use crate::error::{Error, Result};
pub use crate::pool::Pool;
pub use crate::value::{DecimalText, Number, Value};

/// JSON text <-> [`Value`] conversion.
pub mod json_format {
    pub use crate::json::{from_json, from_str, to_json, to_string};
}

/// CBOR bytes <-> [`Value`] conversion.
pub mod cbor_format {
    pub use crate::cbor::{from_bytes, from_cbor, to_bytes, to_cbor};
}
