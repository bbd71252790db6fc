//! String suffix codec: escapes the terminator byte `0x00` out of a
//! UTF-8 payload while preserving its byte-lexicographic order, so a
//! `String` record can sit inside a stream whose only notion of "end of
//! leaf" is a literal `0x00`.
//!
//! Every embedded `0x00` in the source becomes the two-byte sequence
//! `0x00 0xFF` ("there's more, this zero was data"); the codec's own
//! end-of-string marker is a lone `0x00` not followed by `0xFF`. Because
//! the escape's continuation byte (`0xFF`) is always greater than the
//! marker's implicit "stop" byte, and greater than any raw non-zero
//! source byte that could follow, comparing two stuffed strings
//! byte-by-byte gives the same answer as comparing the sources
//! byte-by-byte — including when one is a proper prefix of the other.

use crate::cursor::Writer;
use crate::error::{Error, Result};

const ESCAPE_CONTINUE: u8 = 0xFF;

/// Writes the stuffed form of `s`, including its own trailing
/// end-of-string marker. The caller is responsible for the record-level
/// type tag before this call and the record-level `Terminator` after it.
pub fn encode_stuffed(s: &str, w: &mut Writer) -> Result<()> {
    for &b in s.as_bytes() {
        if b == 0 {
            w.write_byte(0)?;
            w.write_byte(ESCAPE_CONTINUE)?;
        } else {
            w.write_byte(b)?;
        }
    }
    w.write_byte(0)
}

/// Reads a stuffed string starting at `buf`'s current position, leaving
/// `buf` positioned just past the codec's own end-of-string marker (the
/// caller still owes one more generic `Terminator` read on top of this).
pub fn decode_stuffed(buf: &mut &[u8]) -> Result<String> {
    let mut out = Vec::new();
    loop {
        let (&b, rest) = buf
            .split_first()
            .ok_or(Error::Format("string ran out of input before its terminator".into()))?;
        *buf = rest;
        if b != 0 {
            out.push(b);
            continue;
        }
        match buf.first() {
            Some(&ESCAPE_CONTINUE) => {
                out.push(0);
                *buf = &buf[1..];
            }
            _ => break,
        }
    }
    String::from_utf8(out).map_err(|_| Error::Format("stuffed string was not valid UTF-8".into()))
}
