//! Numeric normalizer: a single, self-delimited, order-preserving byte
//! form for int64 / uint64 / float64 / arbitrary-precision decimal text.
//!
//! Every mode collapses into the same canonical shape: a one-byte sign
//! class, then (for non-zero values) a signed, variable-length exponent
//! and a digit-string mantissa. Encoding a number as decimal digit text
//! rather than its raw bits is what keeps `0x00` out of the payload —
//! digits never produce it, raw float bits can.

use crate::config::NumberKind;
use crate::cursor::Writer;
use crate::error::{Error, Result};
use crate::value::Number;

// Sign class. Must sort Neg < Zero < Pos so plain byte comparison of the
// leading byte already gets cross-sign order right.
const SIGN_NEG: u8 = 0x01;
const SIGN_ZERO: u8 = 0x02;
const SIGN_POS: u8 = 0x03;

// Exponent sign, nested one level in: negative exponents (value < 1)
// always sort before non-negative ones for a positive-valued number.
const EXP_NEG: u8 = 0x01;
const EXP_NONNEG: u8 = 0x02;

// "elen" unary length prefix for the exponent's digit count: STOP < CONTINUE
// so a shorter digit count sorts before a longer one.
const UNARY_STOP: u8 = b'0';
const UNARY_CONTINUE: u8 = b'1';

// Terminates the mantissa digit run. Must sort below every ASCII digit
// so "fewer digits" sorts below "more digits" (0.12 < 0.125) the same
// way a shorter byte string already sorts below a longer one it's a
// prefix of — the explicit marker exists so that relationship survives
// the bitwise-complement trick used to flip order for negative values.
const MANTISSA_STOP: u8 = b'/'; // 0x2f, one below b'0'

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sign {
    Neg,
    Zero,
    Pos,
}

/// A number decomposed into the canonical sign/exponent/mantissa shape:
/// `value == sign * 0.<mantissa> * 10^exponent`, with `mantissa` holding
/// no leading or trailing zero digits.
struct Decomposed {
    sign: Sign,
    exponent: i64,
    mantissa: String,
}

impl Decomposed {
    fn zero() -> Decomposed {
        Decomposed {
            sign: Sign::Zero,
            exponent: 0,
            mantissa: String::new(),
        }
    }

    /// Canonical decimal text form, e.g. `-0.123e5`. Used both to
    /// reconstruct a `Number::Decimal`/`Number::Float` on decode and as
    /// the single source of truth for what "normalized" text looks like,
    /// so differing leading/trailing zeros on input always collapse to
    /// the same output.
    fn to_canonical_text(&self) -> String {
        match self.sign {
            Sign::Zero => "0".to_string(),
            Sign::Pos => format!("0.{}e{}", self.mantissa, self.exponent),
            Sign::Neg => format!("-0.{}e{}", self.mantissa, self.exponent),
        }
    }
}

/// Parses arbitrary decimal text (optional sign, digits, optional `.`,
/// optional `e`/`E` exponent) into the canonical decomposition. Used for
/// `JSONNumber`/`Decimal` mode and, via `format!("{:e}", ..)`, for
/// `FloatNumber` mode too.
fn parse_decimal(text: &str) -> Result<Decomposed> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::Numeric(text.to_string()));
    }
    let (negative, rest) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if rest.is_empty() {
        return Err(Error::Numeric(text.to_string()));
    }

    let (mantissa_part, explicit_exp) = match rest.find(['e', 'E']) {
        Some(idx) => {
            let exp_text = &rest[idx + 1..];
            let exp: i64 = exp_text
                .parse()
                .map_err(|_| Error::Numeric(text.to_string()))?;
            (&rest[..idx], exp)
        }
        None => (rest, 0),
    };

    let (int_part, frac_part) = match mantissa_part.find('.') {
        Some(idx) => (&mantissa_part[..idx], &mantissa_part[idx + 1..]),
        None => (mantissa_part, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(Error::Numeric(text.to_string()));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(Error::Numeric(text.to_string()));
    }

    let digits = format!("{}{}", int_part, frac_part);
    let point_offset = int_part.len() as i64;
    let stripped = digits.trim_start_matches('0');
    let leading_zeros = (digits.len() - stripped.len()) as i64;
    if stripped.is_empty() {
        return Ok(Decomposed::zero());
    }
    let mantissa = stripped.trim_end_matches('0');
    let mantissa = if mantissa.is_empty() { "0" } else { mantissa };
    let exponent = (point_offset - leading_zeros) + explicit_exp;

    Ok(Decomposed {
        sign: if negative { Sign::Neg } else { Sign::Pos },
        exponent,
        mantissa: mantissa.to_string(),
    })
}

fn decompose_int_magnitude(magnitude: u64) -> (i64, String) {
    let digits = magnitude.to_string();
    let exponent = digits.len() as i64;
    let mantissa = digits.trim_end_matches('0');
    let mantissa = if mantissa.is_empty() { "0" } else { mantissa };
    (exponent, mantissa.to_string())
}

fn decompose_number_for(n: &Number, kind: NumberKind) -> Result<Decomposed> {
    match kind {
        NumberKind::FloatNumber => {
            let f = n.to_f64()?;
            decompose_float(f)
        }
        NumberKind::JSONNumber | NumberKind::Decimal => {
            let text = number_to_decimal_text(n)?;
            let decomposed = parse_decimal(&text)?;
            if matches!(kind, NumberKind::Decimal) {
                check_decimal_domain(&decomposed)?;
            }
            Ok(decomposed)
        }
        NumberKind::SmartNumber => match n {
            Number::Int(v) => {
                if *v == 0 {
                    Ok(Decomposed::zero())
                } else {
                    let (exponent, mantissa) = decompose_int_magnitude(v.unsigned_abs());
                    Ok(Decomposed {
                        sign: Sign::Neg,
                        exponent,
                        mantissa,
                    })
                }
            }
            Number::UInt(v) => {
                if *v == 0 {
                    Ok(Decomposed::zero())
                } else {
                    let (exponent, mantissa) = decompose_int_magnitude(*v);
                    Ok(Decomposed {
                        sign: Sign::Pos,
                        exponent,
                        mantissa,
                    })
                }
            }
            Number::Float(f) => decompose_float(*f),
            Number::Decimal(s) => parse_decimal(s),
        },
    }
}

fn decompose_float(f: f64) -> Result<Decomposed> {
    if f.is_nan() {
        return Err(Error::Config("NaN is not a legal collated number"));
    }
    if !f.is_finite() {
        return Err(Error::Config("infinite values have no finite collated form"));
    }
    if f == 0.0 {
        return Ok(Decomposed::zero());
    }
    let sign = if f.is_sign_negative() { Sign::Neg } else { Sign::Pos };
    // `{:e}` is Rust's shortest round-trip scientific form; reusing the
    // generic decimal parser on it keeps a single source of truth for
    // "text -> (exponent, mantissa)".
    let mut decomposed = parse_decimal(&format!("{:e}", f.abs()))?;
    decomposed.sign = sign;
    Ok(decomposed)
}

fn number_to_decimal_text(n: &Number) -> Result<String> {
    match n {
        Number::Int(v) => Ok(v.to_string()),
        Number::UInt(v) => Ok(v.to_string()),
        Number::Float(f) => {
            if f.is_nan() {
                return Err(Error::Config("NaN is not a legal collated number"));
            }
            if !f.is_finite() {
                return Err(Error::Config("infinite values have no finite collated form"));
            }
            Ok(format!("{:e}", f))
        }
        Number::Decimal(s) => Ok(s.to_string()),
    }
}

fn check_decimal_domain(d: &Decomposed) -> Result<()> {
    if matches!(d.sign, Sign::Zero) {
        return Ok(());
    }
    // `value == 0.mantissa * 10^exponent`; magnitude <= 1 iff exponent <= 0,
    // or exponent == 1 with mantissa exactly "1" (the boundary value 1.0).
    let within = d.exponent < 1 || (d.exponent == 1 && d.mantissa == "1");
    if within {
        Ok(())
    } else {
        Err(Error::Config("Decimal numbers must lie in [-1, 1]"))
    }
}

fn elen_encode(n: u64) -> Vec<u8> {
    let digits = n.to_string();
    let mut out = Vec::with_capacity(digits.len() * 2 + 1);
    out.resize(digits.len(), UNARY_CONTINUE);
    out.push(UNARY_STOP);
    out.extend_from_slice(digits.as_bytes());
    out
}

fn magnitude_bytes(exponent: i64, mantissa: &str) -> Vec<u8> {
    let mut out = Vec::new();
    if exponent < 0 {
        out.push(EXP_NEG);
        let asc = elen_encode((-exponent) as u64);
        out.extend(asc.into_iter().map(|b| !b));
    } else {
        out.push(EXP_NONNEG);
        out.extend(elen_encode(exponent as u64));
    }
    out.extend_from_slice(mantissa.as_bytes());
    out.push(MANTISSA_STOP);
    out
}

fn encode_decomposed(d: &Decomposed, w: &mut Writer) -> Result<()> {
    match d.sign {
        Sign::Zero => w.write_byte(SIGN_ZERO),
        Sign::Pos => {
            w.write_byte(SIGN_POS)?;
            w.write_bytes(&magnitude_bytes(d.exponent, &d.mantissa))
        }
        Sign::Neg => {
            w.write_byte(SIGN_NEG)?;
            let bytes = magnitude_bytes(d.exponent, &d.mantissa);
            let complemented: Vec<u8> = bytes.into_iter().map(|b| !b).collect();
            w.write_bytes(&complemented)
        }
    }
}

fn elen_decode(bytes: &[u8], complemented: bool) -> Result<(u64, usize)> {
    let continue_marker = if complemented { !UNARY_CONTINUE } else { UNARY_CONTINUE };
    let stop_marker = if complemented { !UNARY_STOP } else { UNARY_STOP };
    let mut len = 0usize;
    while *bytes
        .get(len)
        .ok_or(Error::Format("truncated exponent length prefix".into()))?
        == continue_marker
    {
        len += 1;
    }
    if bytes[len] != stop_marker {
        return Err(Error::Format("malformed exponent length prefix".into()));
    }
    let digit_start = len + 1;
    let digit_end = digit_start + len;
    let digit_bytes = bytes
        .get(digit_start..digit_end)
        .ok_or(Error::Format("truncated exponent digits".into()))?;
    let mut text = String::with_capacity(len);
    for &b in digit_bytes {
        let raw = if complemented { !b } else { b };
        if !raw.is_ascii_digit() {
            return Err(Error::Format("non-digit byte in exponent".into()));
        }
        text.push(raw as char);
    }
    let value: u64 = if text.is_empty() {
        0
    } else {
        text.parse().map_err(|_| Error::Format("exponent overflow".into()))?
    };
    Ok((value, digit_end))
}

fn decode_magnitude(bytes: &[u8]) -> Result<(i64, String)> {
    let exp_sign = *bytes.first().ok_or(Error::Format("truncated number".into()))?;
    let (exponent, mantissa_start) = match exp_sign {
        EXP_NONNEG => {
            let (mag, consumed) = elen_decode(&bytes[1..], false)?;
            (mag as i64, 1 + consumed)
        }
        EXP_NEG => {
            let (mag, consumed) = elen_decode(&bytes[1..], true)?;
            (-(mag as i64), 1 + consumed)
        }
        _ => return Err(Error::Format("bad exponent sign byte".into())),
    };
    let mantissa_bytes = &bytes[mantissa_start..];
    let stop = mantissa_bytes
        .iter()
        .position(|&b| b == MANTISSA_STOP)
        .ok_or(Error::Format("mantissa missing stop marker".into()))?;
    let mantissa = std::str::from_utf8(&mantissa_bytes[..stop])
        .map_err(|_| Error::Format("mantissa was not ASCII digits".into()))?;
    if !mantissa.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Format("mantissa was not ASCII digits".into()));
    }
    Ok((exponent, mantissa.to_string()))
}

fn decode_decomposed(datum: &[u8]) -> Result<Decomposed> {
    let sign_byte = *datum.first().ok_or(Error::Format("empty number datum".into()))?;
    match sign_byte {
        SIGN_ZERO => Ok(Decomposed::zero()),
        SIGN_POS => {
            let (exponent, mantissa) = decode_magnitude(&datum[1..])?;
            Ok(Decomposed {
                sign: Sign::Pos,
                exponent,
                mantissa,
            })
        }
        SIGN_NEG => {
            let decomplemented: Vec<u8> = datum[1..].iter().map(|b| !b).collect();
            let (exponent, mantissa) = decode_magnitude(&decomplemented)?;
            Ok(Decomposed {
                sign: Sign::Neg,
                exponent,
                mantissa,
            })
        }
        _ => Err(Error::Format("bad number sign byte".into())),
    }
}

/// Reconstructs the full decimal digit string of a non-negative integer
/// from its canonical decomposition, or `None` if it isn't a whole
/// integer (the mantissa has digits past the exponent's decimal point).
fn integer_digits(d: &Decomposed) -> Option<String> {
    match d.sign {
        Sign::Zero => Some("0".to_string()),
        _ => {
            let exponent = d.exponent;
            if exponent < d.mantissa.len() as i64 || exponent > 20 {
                return None;
            }
            let mut s = d.mantissa.clone();
            for _ in 0..(exponent - d.mantissa.len() as i64) {
                s.push('0');
            }
            Some(s)
        }
    }
}

/// Turns a whole-integer digit string (from [`integer_digits`]) plus its
/// sign into a `Number::Int`/`Number::UInt`, or `None` if the magnitude
/// doesn't fit the target width (e.g. a 20-digit integer larger than
/// `u64::MAX`). Callers fall back to the float path in that case rather
/// than treating valid encoder output as malformed.
fn integer_digits_to_number(digits: &str, sign: Sign) -> Option<Number> {
    match sign {
        Sign::Neg => {
            let magnitude: u64 = digits.parse().ok()?;
            if magnitude == i64::MIN.unsigned_abs() {
                Some(Number::Int(i64::MIN))
            } else {
                i64::try_from(magnitude).ok().map(|signed| Number::Int(-signed))
            }
        }
        _ => digits.parse::<u64>().ok().map(Number::UInt),
    }
}

/// Encodes `n`'s normalized byte form according to `kind`.
pub fn encode_number(n: &Number, kind: NumberKind, w: &mut Writer) -> Result<()> {
    let decomposed = decompose_number_for(n, kind)?;
    encode_decomposed(&decomposed, w)
}

/// Inverse of [`encode_number`]: `datum` is the number's payload with the
/// type tag and terminator already stripped off by the caller.
pub fn decode_number(datum: &[u8], kind: NumberKind) -> Result<Number> {
    let decomposed = decode_decomposed(datum)?;
    match kind {
        NumberKind::FloatNumber => {
            let text = decomposed.to_canonical_text();
            let f: f64 = text
                .parse()
                .map_err(|_| Error::Format("number datum did not parse as a float".into()))?;
            Ok(Number::Float(f))
        }
        NumberKind::JSONNumber | NumberKind::Decimal => {
            Ok(Number::from_decimal(decomposed.to_canonical_text()))
        }
        NumberKind::SmartNumber => {
            let as_integer = integer_digits(&decomposed)
                .and_then(|digits| integer_digits_to_number(&digits, decomposed.sign));
            match as_integer {
                Some(n) => Ok(n),
                // Not a whole integer, or one too wide for i64/u64 (e.g. a
                // 20-digit integer past u64::MAX) — the float path still
                // recovers the value exactly as encoded.
                None => {
                    let text = decomposed.to_canonical_text();
                    let f: f64 = text
                        .parse()
                        .map_err(|_| Error::Format("number datum did not parse as a float".into()))?;
                    Ok(Number::Float(f))
                }
            }
        }
    }
}

/// Encodes a non-negative element/entry count using the same canonical
/// form as an unsigned integer `Number`, independent of the active
/// `NumberKind` (a length is always a plain count).
pub fn encode_length(len: usize, w: &mut Writer) -> Result<()> {
    let decomposed = if len == 0 {
        Decomposed::zero()
    } else {
        let (exponent, mantissa) = decompose_int_magnitude(len as u64);
        Decomposed {
            sign: Sign::Pos,
            exponent,
            mantissa,
        }
    };
    encode_decomposed(&decomposed, w)
}

/// Inverse of [`encode_length`].
pub fn decode_length(datum: &[u8]) -> Result<usize> {
    let decomposed = decode_decomposed(datum)?;
    let digits = integer_digits(&decomposed).ok_or(Error::Format("length was not an integer".into()))?;
    digits
        .parse()
        .map_err(|_| Error::Format("length overflowed usize".into()))
}
