//! Bit-field extraction.
//!
//! ASTERIX numbers bits 1-indexed with bit 1 the least-significant bit of
//! the *last* byte of a field, i.e. the field is a big-endian integer and
//! bit numbers count from its low end. This module extracts a single
//! [`BitsDescriptor`] range from a byte slice and interprets it under one
//! of the six encodings. Numeric extractions never allocate; this is the
//! innermost loop of the decoder.

use crate::error::ErrorKind;
use crate::format::{BitsDescriptor, BitsEncoding};

/// The ICAO six-bit character set: 1-26 are `A`-`Z`, 32 is space, 48-57 are
/// `0`-`9`. Everything else decodes to `?`.
pub const ICAO_ALPHABET: [char; 64] = [
    '?', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '?', '?', '?', '?', '?',
    ' ', '?', '?', '?', '?', '?', '?', '?', '?', '?', '?', '?', '?', '?', '?', '?',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '?', '?', '?', '?', '?', '?',
];

/// A decoded bit field value.
#[derive(Debug, Clone, PartialEq)]
pub enum BitValue {
    Unsigned(u64),
    Signed(i64),
    /// Scale applied; the unit lives on the descriptor.
    Scaled(f64),
    Ascii(String),
    SixBitChar(String),
    Octal(String),
    HexBit(String),
}

impl BitValue {
    /// The decoded integer, for meaning lookup and presence tests. String
    /// encodings have none.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            BitValue::Unsigned(v) => i64::try_from(*v).ok(),
            BitValue::Signed(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for BitValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BitValue::Unsigned(v) => write!(f, "{v}"),
            BitValue::Signed(v) => write!(f, "{v}"),
            BitValue::Scaled(v) => write!(f, "{v}"),
            BitValue::Ascii(s)
            | BitValue::SixBitChar(s)
            | BitValue::Octal(s)
            | BitValue::HexBit(s) => f.write_str(s),
        }
    }
}

/// Extracts the descriptor's bit range from `bytes` and interprets it.
///
/// `bytes` must be exactly the enclosing fixed part. A range outside the
/// slice or a numeric field wider than 64 bits is an error, never a panic.
pub fn extract(bytes: &[u8], descriptor: &BitsDescriptor) -> Result<BitValue, ErrorKind> {
    let (from, to) = (descriptor.from, descriptor.to);
    if from < 1 || to < from || to as usize > bytes.len() * 8 {
        return Err(ErrorKind::BitRange { from, to, len: bytes.len() });
    }
    let width = to - from + 1;

    match descriptor.encoding {
        BitsEncoding::Unsigned => {
            let raw = numeric(bytes, from, to)?;
            match descriptor.scale {
                Some(scale) => Ok(BitValue::Scaled(raw as f64 * scale)),
                None => Ok(BitValue::Unsigned(raw)),
            }
        }
        BitsEncoding::Signed => {
            let raw = sign_extend(numeric(bytes, from, to)?, width);
            match descriptor.scale {
                Some(scale) => Ok(BitValue::Scaled(raw as f64 * scale)),
                None => Ok(BitValue::Signed(raw)),
            }
        }
        BitsEncoding::Octal => Ok(BitValue::Octal(digits(bytes, from, to, 3))),
        BitsEncoding::HexBit => Ok(BitValue::HexBit(digits(bytes, from, to, 4))),
        BitsEncoding::SixBitChar => Ok(BitValue::SixBitChar(six_bit(bytes, from, to))),
        BitsEncoding::Ascii => Ok(BitValue::Ascii(ascii(bytes, from, to))),
    }
}

/// Bit `bit` (1 = LSB of the last byte) of `bytes`. Caller keeps it in
/// range.
#[inline]
fn bit_at(bytes: &[u8], bit: u16) -> u64 {
    let index = bytes.len() - 1 - (bit as usize - 1) / 8;
    u64::from(bytes[index] >> ((bit - 1) % 8) & 1)
}

/// Accumulates `from..=to` MSB-first into a u64. Fails above 64 bits.
fn numeric(bytes: &[u8], from: u16, to: u16) -> Result<u64, ErrorKind> {
    let width = to - from + 1;
    if width > 64 {
        return Err(ErrorKind::NumericWidth { width });
    }
    let mut value = 0u64;
    for bit in (from..=to).rev() {
        value = value << 1 | bit_at(bytes, bit);
    }
    Ok(value)
}

fn sign_extend(raw: u64, width: u16) -> i64 {
    if width >= 64 || raw & (1 << (width - 1)) == 0 {
        raw as i64
    } else {
        (raw | !0u64 << width) as i64
    }
}

/// Fixed-width base-2^k digit string over the range; the most significant
/// digit absorbs the remainder when the width is not a multiple of `k`.
fn digits(bytes: &[u8], from: u16, to: u16, k: u16) -> String {
    let width = to - from + 1;
    let count = width.div_ceil(k);
    let mut out = String::with_capacity(count as usize);
    let mut high = to;
    for digit in 0..count {
        let size = if digit == 0 { width - k * (count - 1) } else { k };
        let mut value = 0u64;
        for bit in (high + 1 - size..=high).rev() {
            value = value << 1 | bit_at(bytes, bit);
        }
        high -= size;
        out.push(char::from_digit(value as u32, 16).unwrap_or('?'));
    }
    out
}

/// ICAO six-bit string, consumed from the high end of the range. Trailing
/// bits short of a full codepoint are ignored.
fn six_bit(bytes: &[u8], from: u16, to: u16) -> String {
    let width = to - from + 1;
    let count = width / 6;
    let mut out = String::with_capacity(count as usize);
    for group in 0..count {
        let high = to - group * 6;
        let mut code = 0u64;
        for bit in (high - 5..=high).rev() {
            code = code << 1 | bit_at(bytes, bit);
        }
        out.push(ICAO_ALPHABET[code as usize]);
    }
    out
}

/// Byte string from the high end of the range, non-printable bytes
/// replaced with `?`.
fn ascii(bytes: &[u8], from: u16, to: u16) -> String {
    let width = to - from + 1;
    let count = width / 8;
    let mut out = String::with_capacity(count as usize);
    for group in 0..count {
        let high = to - group * 8;
        let mut byte = 0u64;
        for bit in (high - 7..=high).rev() {
            byte = byte << 1 | bit_at(bytes, bit);
        }
        let byte = byte as u8;
        out.push(if (0x20..=0x7E).contains(&byte) { byte as char } else { '?' });
    }
    out
}
