//! Utilities used in this crate which can also be generally useful downstream.

use alloc::string::String;
use core::fmt::Write;

use thiserror::Error;

use crate::field::{U256, U256_BYTES};


// CONSTANTS
// ================================================================================================

/// Maximum number of hex digits accepted for a 256-bit value.
const MAX_HEX_DIGITS: usize = 2 * U256_BYTES;

// ERRORS
// ================================================================================================

/// Defines errors which can occur during parsing of hexadecimal and decimal strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HexParseError {
    #[error("expected hex data to have length {expected}, including the 0x prefix, found {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("hex encoded data must start with 0x prefix")]
    MissingPrefix,
    #[error("encoded value must contain at least one digit")]
    Empty,
    #[error("encoded data contains an invalid character")]
    InvalidChar,
    #[error("encoded value does not fit in 256 bits")]
    TooLong,
    #[error("encoded value must be smaller than the field modulus")]
    OutOfRange,
}

// HEX ENCODING
// ================================================================================================

/// Renders an array of bytes as hex into a String.
pub fn bytes_to_hex_string<const N: usize>(data: [u8; N]) -> String {
    let mut s = String::with_capacity(2 * N + 2);

    s.push_str("0x");
    for byte in data.iter() {
        write!(s, "{byte:02x}").expect("formatting hex failed");
    }

    s
}

/// Parses a hex string into an array of bytes of known size.
pub fn hex_to_bytes<const N: usize>(value: &str) -> Result<[u8; N], HexParseError> {
    let expected: usize = (N * 2) + 2;
    if value.len() != expected {
        return Err(HexParseError::InvalidLength { expected, actual: value.len() });
    }

    let digits = strip_hex_prefix(value)?;
    let mut decoded = [0u8; N];
    for (byte, pair) in decoded.iter_mut().zip(digits.as_bytes().chunks_exact(2)) {
        *byte = (hex_digit(pair[0])? << 4) | hex_digit(pair[1])?;
    }

    Ok(decoded)
}

/// Renders a 256-bit integer as a canonical `0x`-prefixed, minimal, lower-case hex string.
///
/// Zero is rendered as `0x0`.
pub fn u256_to_hex(value: &U256) -> String {
    format!("{value:#x}")
}

/// Parses a `0x`-prefixed hex string of at most 64 digits into a 256-bit integer.
///
/// Both prefix cases and both digit cases are accepted, and leading zeros are allowed.
pub fn hex_to_u256(value: &str) -> Result<U256, HexParseError> {
    let digits = strip_hex_prefix(value)?;
    if digits.is_empty() {
        return Err(HexParseError::Empty);
    }
    if digits.len() > MAX_HEX_DIGITS {
        return Err(HexParseError::TooLong);
    }

    let mut words = [0u64; 4];
    for (nibble, &digit) in digits.as_bytes().iter().rev().enumerate() {
        words[nibble / 16] |= (hex_digit(digit)? as u64) << ((nibble % 16) * 4);
    }

    Ok(U256::from_words(words))
}

/// Parses an unsigned decimal string into a 256-bit integer.
pub fn dec_to_u256(value: &str) -> Result<U256, HexParseError> {
    if value.is_empty() {
        return Err(HexParseError::Empty);
    }

    value.bytes().try_fold(U256::ZERO, |acc, digit| {
        if !digit.is_ascii_digit() {
            return Err(HexParseError::InvalidChar);
        }
        acc.checked_mul_small_add(10, (digit - b'0') as u64).ok_or(HexParseError::TooLong)
    })
}

// HELPER FUNCTIONS
// ================================================================================================

fn strip_hex_prefix(value: &str) -> Result<&str, HexParseError> {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or(HexParseError::MissingPrefix)
}

fn hex_digit(digit: u8) -> Result<u8, HexParseError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(HexParseError::InvalidChar),
    }
}
