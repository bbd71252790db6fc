//! Library error types.
//!
use std::fmt;

/// A `collate` result, normally returning a [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A `collate` error. Encompasses any issue that can happen while encoding
/// or decoding a value in any of the formats this crate supports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The destination buffer was too small to hold the rest of the record.
    Capacity {
        /// Bytes still needed to finish the record.
        needed: usize,
        /// Bytes left in the caller-supplied buffer.
        available: usize,
    },
    /// The collated byte stream was malformed: a missing terminator, an
    /// unrecognized type tag, a bad length prefix, a non-string object key,
    /// or input that ran out before a record finished. Also used by the
    /// JSON/CBOR adapters for a source document they cannot parse.
    Format(std::borrow::Cow<'static, str>),
    /// The `Value` tree contained a shape this codec cannot serialize.
    Type(&'static str),
    /// A feature was used without being enabled in the `Config`, or a
    /// numeric input fell outside the selected `NumberKind`'s domain.
    Config(&'static str),
    /// A decimal or JSON-number string could not be parsed at all.
    Numeric(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Capacity { needed, available } => write!(
                f,
                "buffer too small: needed {} more bytes, {} available",
                needed, available
            ),
            Error::Format(msg) => write!(f, "malformed collated bytes: {}", msg),
            Error::Type(msg) => write!(f, "value cannot be encoded: {}", msg),
            Error::Config(msg) => write!(f, "config error: {}", msg),
            Error::Numeric(msg) => write!(f, "invalid numeric literal: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
