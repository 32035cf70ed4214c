use core::fmt;

use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{NonceSource, Signature, SignatureError, sign_with, verify_point};
use crate::{
    curve::{AffinePoint, CurveError, ProjectivePoint, StarkCurve},
    field::{FieldElement, Scalar},
    rand::draw_non_zero,
};

// SECRET KEY
// ================================================================================================

/// A private scalar for ECDSA over the STARK curve.
///
/// The scalar is wiped from memory when the key is dropped, and the key is never printed.
#[derive(Clone)]
pub struct SecretKey {
    scalar: Scalar,
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        self.scalar.zeroize();
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SecretKey {}

#[allow(clippy::new_without_default)]
impl SecretKey {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Generates a secret key from OS-provided randomness.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        let mut rng = rand::rng();
        Self::with_rng(&mut rng)
    }

    /// Generates a uniformly random non-zero secret key using the provided random number
    /// generator.
    ///
    /// The provided RNG must be cryptographically secure.
    pub fn with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self { scalar: draw_non_zero(rng) }
    }

    /// Creates a secret key from a scalar.
    ///
    /// Every scalar is accepted; zero yields a key whose public key is the point at infinity.
    pub fn from_scalar(scalar: Scalar) -> Self {
        Self { scalar }
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the private scalar.
    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// Returns the public key `generator * scalar`.
    pub fn public_key(&self) -> PublicKey {
        let point = (ProjectivePoint::<StarkCurve>::GENERATOR * self.scalar).to_affine();
        PublicKey { point }
    }

    // SIGNATURE GENERATION
    // --------------------------------------------------------------------------------------------

    /// Signs a message hash with a deterministic RFC 6979 nonce.
    ///
    /// # Errors
    /// See [super::sign].
    pub fn sign(&self, message: FieldElement) -> Result<Signature, SignatureError> {
        super::sign(message, &self.scalar)
    }

    /// Signs a message hash with nonces drawn from the provided source.
    ///
    /// # Errors
    /// See [super::sign_with].
    pub fn sign_with<N: NonceSource + ?Sized>(
        &self,
        message: FieldElement,
        nonces: &mut N,
    ) -> Result<Signature, SignatureError> {
        sign_with(message, &self.scalar, nonces)
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        subtle::ConstantTimeEq::ct_eq(&self.scalar, &other.scalar).into()
    }
}

impl Eq for SecretKey {}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<elided secret for SecretKey>")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<elided secret for SecretKey>")
    }
}

// PUBLIC KEY
// ================================================================================================

/// A public key for ECDSA over the STARK curve: the point `generator * secret`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    point: AffinePoint<StarkCurve>,
}

impl PublicKey {
    /// Creates a public key from a curve point.
    ///
    /// # Errors
    /// Returns [CurveError::NotOnCurve] if the point does not lie on the STARK curve.
    pub fn from_point(point: AffinePoint<StarkCurve>) -> Result<Self, CurveError> {
        if point.is_on_curve() {
            Ok(Self { point })
        } else {
            Err(CurveError::NotOnCurve)
        }
    }

    /// Recovers a public key from its x-coordinate.
    ///
    /// The recovered point is one of the two points with this x-coordinate, which need not be
    /// the signer's. Use [PublicKey::verify_with_x] when only the x-coordinate of the signer's
    /// key is known.
    ///
    /// # Errors
    /// Returns [CurveError::NotOnCurve] if no curve point has this x-coordinate.
    pub fn from_x(x: FieldElement) -> Result<Self, CurveError> {
        AffinePoint::from_x(x).map(|point| Self { point }).ok_or(CurveError::NotOnCurve)
    }

    pub fn point(&self) -> &AffinePoint<StarkCurve> {
        &self.point
    }

    /// Returns the x-coordinate of the key, or `None` for the point at infinity.
    pub fn x(&self) -> Option<FieldElement> {
        self.point.x()
    }

    /// Verifies a signature over a message hash against this public key.
    pub fn verify(&self, message: FieldElement, signature: &Signature) -> bool {
        verify_point(message, signature, &self.point.to_projective())
    }

    /// Verifies a signature against a public key given only by its x-coordinate.
    ///
    /// Both points with this x-coordinate are tried.
    pub fn verify_with_x(message: FieldElement, signature: &Signature, x: FieldElement) -> bool {
        super::verify_with_x(message, signature, x)
    }
}

impl From<&SecretKey> for PublicKey {
    fn from(secret: &SecretKey) -> Self {
        secret.public_key()
    }
}

// KEY PAIR
// ================================================================================================

/// A secret key together with its public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl KeyPair {
    /// Derives the key pair of a private scalar.
    ///
    /// Derivation is deterministic and total; the zero scalar yields the point at infinity as
    /// its public key.
    pub fn derive(private: Scalar) -> Self {
        let secret = SecretKey::from_scalar(private);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Generates a random key pair using the provided random number generator.
    pub fn with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = SecretKey::with_rng(rng);
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Signs a message hash with the secret key of this pair.
    ///
    /// # Errors
    /// See [super::sign].
    pub fn sign(&self, message: FieldElement) -> Result<Signature, SignatureError> {
        self.secret.sign(message)
    }
}
