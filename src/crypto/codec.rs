//! Canonical hex codec for wire big integers.
//!
//! Every big-integer field that crosses the wire does so as a minimal
//! big-endian hexadecimal digit string: uppercase, no radix prefix, no sign
//! marker, no trailing delimiter. The codec is a pure radix conversion; it
//! knows nothing about group membership or bit width.

use num_bigint::{BigInt, BigUint};
use num_traits::Num;

use crate::{Error, Result};

/// Encodes a non-negative integer as its canonical hex form.
///
/// Round-trips with [`decode`] for every value, including zero (`"0"`).
pub fn encode(n: &BigUint) -> String {
    n.to_str_radix(16).to_uppercase()
}

/// Parses a hex digit string into an arbitrary-precision non-negative integer.
///
/// Accepts upper- and lowercase digits. Fails with [`Error::MalformedHex`]
/// when the text is empty or contains any non-hex character.
pub fn decode(text: &str) -> Result<BigUint> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::MalformedHex(text.to_string()));
    }
    BigUint::from_str_radix(text, 16).map_err(|_| Error::MalformedHex(text.to_string()))
}

/// Encodes a signed integer, prefixing `-` for negative values.
///
/// Only the masked proof value can legitimately be negative (when the
/// challenge phase is given a digest larger than the blinded secret); all
/// other wire fields go through [`encode`].
pub fn encode_signed(n: &BigInt) -> String {
    n.to_str_radix(16).to_uppercase()
}

/// Parses a hex digit string with an optional leading `-` sign.
pub fn decode_signed(text: &str) -> Result<BigInt> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::MalformedHex(text.to_string()));
    }
    BigInt::from_str_radix(text, 16).map_err(|_| Error::MalformedHex(text.to_string()))
}
