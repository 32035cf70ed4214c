use alloc::string::String;
use core::fmt;

use super::PublicKey;
use crate::{
    field::{FieldElement, Scalar, U256_BYTES},
    utils::{HexParseError, bytes_to_hex_string, hex_to_bytes},
};

/// Size of an encoded signature in bytes.
pub const SIGNATURE_BYTES: usize = 2 * U256_BYTES;

// SIGNATURE
// ================================================================================================

/// An ECDSA signature `(r, s)` over the STARK curve.
///
/// `r` is the x-coordinate of the nonce point and lies in the base field; `s` is a scalar.
/// Construction does not check the ranges required by verification, so any pair can be
/// represented and verification rejects out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature {
    r: FieldElement,
    s: Scalar,
}

impl Signature {
    pub fn new(r: FieldElement, s: Scalar) -> Self {
        Self { r, s }
    }

    pub fn r(&self) -> FieldElement {
        self.r
    }

    pub fn s(&self) -> Scalar {
        self.s
    }

    /// Verifies this signature over `message` against the provided public key.
    pub fn verify(&self, message: FieldElement, public_key: &PublicKey) -> bool {
        public_key.verify(message, self)
    }

    // ENCODING
    // --------------------------------------------------------------------------------------------

    /// Returns the 64-byte encoding `r || s`, each component as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_BYTES] {
        let mut bytes = [0u8; SIGNATURE_BYTES];
        bytes[..U256_BYTES].copy_from_slice(&self.r.to_bytes());
        bytes[U256_BYTES..].copy_from_slice(&self.s.to_bytes());
        bytes
    }

    /// Decodes a signature from its 64-byte encoding.
    ///
    /// Returns `None` if `r` is not a canonical field element or `s` is not a canonical scalar.
    pub fn from_bytes(bytes: &[u8; SIGNATURE_BYTES]) -> Option<Self> {
        let (r_bytes, s_bytes) = bytes.split_at(U256_BYTES);
        let r = FieldElement::from_bytes_canonical(r_bytes.try_into().ok()?)?;
        let s = Scalar::from_bytes_canonical(s_bytes.try_into().ok()?)?;
        Some(Self { r, s })
    }

    /// Returns the `0x`-prefixed hex encoding of [Signature::to_bytes].
    pub fn to_hex(&self) -> String {
        bytes_to_hex_string(self.to_bytes())
    }

    /// Parses the hex encoding produced by [Signature::to_hex].
    pub fn from_hex(value: &str) -> Result<Self, HexParseError> {
        let bytes = hex_to_bytes::<SIGNATURE_BYTES>(value)?;
        Self::from_bytes(&bytes).ok_or(HexParseError::OutOfRange)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
