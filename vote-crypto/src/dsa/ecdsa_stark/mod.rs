//! ECDSA over the STARK curve, compatible with StarkWare's signature scheme.
//!
//! Messages are field elements below `2^251`, typically Pedersen hashes. A signature is a pair
//! `(r, s)` where `r` is the x-coordinate of `k * G` for a secret nonce `k` and
//! `s = (m + r * d) / k mod n`. Both `r` and `w = s^-1` are required to lie in `[1, 2^251)`,
//! so that signatures can be checked inside a STARK field element; nonces which violate these
//! bounds are discarded and signing retries with the next nonce.

use log::trace;
use thiserror::Error;

use crate::{
    curve::{AffinePoint, ProjectivePoint, StarkCurve},
    field::{FieldElement, Fp, PrimeModulus, Scalar, U256},
};

mod keys;
pub use keys::{KeyPair, PublicKey, SecretKey};

mod nonce;
pub use nonce::{NonceSource, RngNonceSource, Rfc6979};

mod signature;
pub use signature::{SIGNATURE_BYTES, Signature};


// CONSTANTS
// ================================================================================================

/// Number of bits allowed in a message hash, in `r` and in `w = s^-1`.
pub const ELEMENT_BITS: u32 = 251;

/// Exclusive upper bound `2^251` on message hashes, `r` and `w`.
const ELEMENT_BOUND: U256 = U256::ONE.shl(ELEMENT_BITS);

/// Maximum number of nonces tried before signing gives up.
pub const MAX_SIGNING_ATTEMPTS: u32 = 64;

// ERRORS
// ================================================================================================

/// Errors raised by signature generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The nonce produced an `r`, `w` or `m + r * d` outside the admissible range.
    #[error("nonce does not produce a valid signature")]
    InvalidNonce,
    /// No admissible nonce was found within the attempt budget.
    #[error("no valid nonce found after {0} attempts")]
    NonceExhausted(u32),
    /// The message hash is not below `2^251`.
    #[error("message hash must be smaller than 2^251")]
    MessageOutOfRange,
}

// SIGNING
// ================================================================================================

/// Signs a message hash with a private scalar, using RFC 6979 deterministic nonces.
///
/// # Errors
/// Returns an error if:
/// - the message hash is not below `2^251`;
/// - no admissible nonce is found within [MAX_SIGNING_ATTEMPTS] attempts, which only happens
///   for degenerate keys such as zero signing a zero message.
pub fn sign(message: FieldElement, private_key: &Scalar) -> Result<Signature, SignatureError> {
    sign_with(message, private_key, &mut Rfc6979)
}

/// Signs a message hash with a private scalar, drawing candidate nonces from `nonces`.
///
/// # Errors
/// Same as [sign].
pub fn sign_with<N: NonceSource + ?Sized>(
    message: FieldElement,
    private_key: &Scalar,
    nonces: &mut N,
) -> Result<Signature, SignatureError> {
    if !is_element(&message) {
        return Err(SignatureError::MessageOutOfRange);
    }

    for attempt in 0..MAX_SIGNING_ATTEMPTS {
        let k = nonces.nonce(&message, private_key, attempt);
        match sign_with_nonce(message, private_key, &k) {
            Err(SignatureError::InvalidNonce) => {
                trace!("signing attempt {attempt} rejected the nonce, retrying");
            },
            result => return result,
        }
    }

    Err(SignatureError::NonceExhausted(MAX_SIGNING_ATTEMPTS))
}

/// Signs a message hash with a caller-supplied nonce.
///
/// This is intended for reproducing known-answer vectors; reusing a nonce across two messages
/// reveals the private key.
///
/// # Errors
/// Returns [SignatureError::MessageOutOfRange] if the message is not below `2^251`, and
/// [SignatureError::InvalidNonce] if `k` is zero or leads to `r` or `w` outside `[1, 2^251)`
/// or to `m + r * d = 0 mod n`.
pub fn sign_with_nonce(
    message: FieldElement,
    private_key: &Scalar,
    k: &Scalar,
) -> Result<Signature, SignatureError> {
    if !is_element(&message) {
        return Err(SignatureError::MessageOutOfRange);
    }

    let r = (ProjectivePoint::<StarkCurve>::GENERATOR * *k)
        .to_affine()
        .x()
        .ok_or(SignatureError::InvalidNonce)?;
    if !is_non_zero_element(&r) {
        return Err(SignatureError::InvalidNonce);
    }

    let denominator = Scalar::from(message) + Scalar::from(r) * *private_key;
    let w = k.checked_div(&denominator).map_err(|_| SignatureError::InvalidNonce)?;
    if !is_non_zero_element(&w) {
        return Err(SignatureError::InvalidNonce);
    }

    let s = w.inverse().map_err(|_| SignatureError::InvalidNonce)?;
    Ok(Signature::new(r, s))
}

// VERIFICATION
// ================================================================================================

/// Verifies a signature over a message hash against a public key.
///
/// Returns `false` for every failure, including out-of-range signature components or message.
pub fn verify(message: FieldElement, signature: &Signature, public_key: &PublicKey) -> bool {
    public_key.verify(message, signature)
}

/// Verifies a signature against a public key given only by its x-coordinate.
///
/// Both curve points with this x-coordinate are tried; returns `false` if neither exists or
/// neither verifies.
pub fn verify_with_x(
    message: FieldElement,
    signature: &Signature,
    public_x: FieldElement,
) -> bool {
    let Some(point) = AffinePoint::<StarkCurve>::from_x(public_x) else {
        return false;
    };
    let point = point.to_projective();
    verify_point(message, signature, &point) || verify_point(message, signature, &-point)
}

/// Checks that `(w * (m * G + r * Q)).x == r` with `w = s^-1`, after range checks on all inputs.
fn verify_point(
    message: FieldElement,
    signature: &Signature,
    public_key: &ProjectivePoint<StarkCurve>,
) -> bool {
    let (r, s) = (signature.r(), signature.s());
    if !is_element(&message) || !is_non_zero_element(&r) {
        return false;
    }
    let Ok(w) = s.inverse() else {
        return false;
    };
    if !is_non_zero_element(&w) {
        return false;
    }

    let generator = ProjectivePoint::<StarkCurve>::GENERATOR;
    let point = (generator * Scalar::from(message) + *public_key * Scalar::from(r)) * w;
    point.to_affine().x() == Some(r)
}

// HELPERS
// ================================================================================================

/// Returns `true` if the canonical value is below `2^251`.
fn is_element<M: PrimeModulus>(value: &Fp<M>) -> bool {
    value.to_u256() < ELEMENT_BOUND
}

/// Returns `true` if the canonical value lies in `[1, 2^251)`.
fn is_non_zero_element<M: PrimeModulus>(value: &Fp<M>) -> bool {
    !value.is_zero() && is_element(value)
}
