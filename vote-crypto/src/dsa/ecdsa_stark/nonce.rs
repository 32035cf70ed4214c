//! Nonce generation for ECDSA signing.

use hmac::{Hmac, Mac};
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{
    field::{FieldElement, Scalar, U256, U256_BYTES},
    rand::draw_non_zero,
};

type HmacSha256 = Hmac<Sha256>;

/// Number of bits in the curve order.
const ORDER_BITS: u32 = Scalar::MODULUS_BITS;

// NONCE SOURCE
// ================================================================================================

/// A source of per-signature secret nonces.
///
/// The signer asks for a candidate nonce for every signing attempt, starting from attempt 0.
/// Candidates which lead to an invalid signature are discarded and the next attempt is
/// requested.
pub trait NonceSource {
    /// Returns the candidate nonce for the given attempt; it must be a non-zero scalar.
    fn nonce(&mut self, message: &FieldElement, secret: &Scalar, attempt: u32) -> Scalar;
}

// RFC 6979
// ================================================================================================

/// Deterministic nonces following RFC 6979 with HMAC-SHA256.
///
/// The derivation is bit-compatible with StarkWare's `generate_k_rfc6979`:
/// - a message whose bit length is at least 248 and whose bit length modulo 8 is in `1..=4` is
///   shifted left by four bits before encoding;
/// - the message is encoded as its minimal big-endian byte string;
/// - the first attempt uses no extra entropy, and attempt `i > 0` uses `i` encoded as a minimal
///   big-endian byte string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rfc6979;

impl NonceSource for Rfc6979 {
    fn nonce(&mut self, message: &FieldElement, secret: &Scalar, attempt: u32) -> Scalar {
        let seed = attempt.to_be_bytes();
        let extra = &seed[(attempt.leading_zeros() / 8) as usize..];
        generate_k(message, secret, extra)
    }
}

/// Computes the RFC 6979 nonce for the given message, secret key and extra entropy.
fn generate_k(message: &FieldElement, secret: &Scalar, extra: &[u8]) -> Scalar {
    let mut value = message.to_u256();
    let bits = value.bits();
    if bits >= 248 && (1..=4).contains(&(bits % 8)) {
        value = value.shl(4);
    }
    let data = value.to_minimal_be_bytes();

    let mut secret_bytes = secret.to_bytes();
    let message_bytes = bits2octets(&data);

    let mut k = [0u8; 32];
    let mut v = [1u8; 32];
    k = hmac_sha256(&k, &[&v, &[0x00], &secret_bytes, &message_bytes, extra]);
    v = hmac_sha256(&k, &[&v]);
    k = hmac_sha256(&k, &[&v, &[0x01], &secret_bytes, &message_bytes, extra]);
    v = hmac_sha256(&k, &[&v]);
    secret_bytes.zeroize();

    let nonce = loop {
        v = hmac_sha256(&k, &[&v]);
        // the order has 252 bits, so a 256-bit block is truncated to its top 252 bits
        let candidate = U256::from_be_bytes(&v).shr(U256::BITS - ORDER_BITS);
        if let Some(nonce) = Scalar::from_canonical(candidate).filter(|n| !n.is_zero()) {
            break nonce;
        }
        k = hmac_sha256(&k, &[&v, &[0x00]]);
        v = hmac_sha256(&k, &[&v]);
    };

    k.zeroize();
    v.zeroize();
    nonce
}

/// Interprets a byte string of at most 32 bytes as an integer of at most `ORDER_BITS` bits, as
/// RFC 6979 `bits2int`.
fn bits2int(data: &[u8]) -> U256 {
    debug_assert!(data.len() <= U256_BYTES);
    let mut padded = [0u8; U256_BYTES];
    padded[U256_BYTES - data.len()..].copy_from_slice(data);
    let value = U256::from_be_bytes(&padded);

    let len_bits = (data.len() * 8) as u32;
    if len_bits > ORDER_BITS {
        value.shr(len_bits - ORDER_BITS)
    } else {
        value
    }
}

/// RFC 6979 `bits2octets`: `bits2int` reduced once modulo the order, as 32 big-endian bytes.
fn bits2octets(data: &[u8]) -> [u8; U256_BYTES] {
    let value = bits2int(data);
    let (reduced, borrow) = value.sbb(&Scalar::MODULUS);
    let octets = if borrow == 0 { reduced } else { value };
    octets.to_be_bytes()
}

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

// RANDOM NONCES
// ================================================================================================

/// Nonces drawn uniformly at random from a cryptographically secure random number generator.
///
/// Signatures produced with this source are not deterministic but verify like any other.
#[derive(Debug)]
pub struct RngNonceSource<R> {
    rng: R,
}

impl<R: RngCore + CryptoRng> RngNonceSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: RngCore + CryptoRng> NonceSource for RngNonceSource<R> {
    fn nonce(&mut self, _message: &FieldElement, _secret: &Scalar, _attempt: u32) -> Scalar {
        draw_non_zero(&mut self.rng)
    }
}

// TESTS
// ================================================================================================
