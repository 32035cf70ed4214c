//! Uniform sampling of field elements and other values from random bytes.

use rand_core::RngCore;

use crate::field::{Fp, PrimeModulus, U256_BYTES};


// RANDOMNESS
// ================================================================================================

/// Defines how `Self` can be read from a sequence of random bytes.
pub trait Randomizable: Sized {
    /// Size of `Self` in bytes.
    ///
    /// This is used to determine how many bytes should be passed to the
    /// [from_random_bytes()](Self::from_random_bytes) function.
    const VALUE_SIZE: usize;

    /// Returns `Self` if the set of bytes forms a valid value, otherwise returns None.
    fn from_random_bytes(source: &[u8]) -> Option<Self>;
}

/// Interprets 32 bytes as a big-endian integer truncated to the bit length of the modulus, and
/// rejects it unless it is below the modulus. Accepted values are uniformly distributed.
impl<M: PrimeModulus> Randomizable for Fp<M> {
    const VALUE_SIZE: usize = U256_BYTES;

    fn from_random_bytes(source: &[u8]) -> Option<Self> {
        let bytes: [u8; U256_BYTES] = source.get(..U256_BYTES)?.try_into().ok()?;
        let value = crate::field::U256::from_be_bytes(&bytes).low_bits(M::BITS);
        Self::from_canonical(value)
    }
}

// SAMPLING
// ================================================================================================

/// Draws a uniformly random value of type `T`, retrying until the drawn bytes form a valid
/// value.
pub fn draw<T: Randomizable, R: RngCore + ?Sized>(rng: &mut R) -> T {
    let mut bytes = vec![0u8; T::VALUE_SIZE];
    loop {
        rng.fill_bytes(&mut bytes);
        if let Some(value) = T::from_random_bytes(&bytes) {
            return value;
        }
    }
}

/// Draws a uniformly random non-zero field element.
pub fn draw_non_zero<M: PrimeModulus, R: RngCore + ?Sized>(rng: &mut R) -> Fp<M> {
    loop {
        let value: Fp<M> = draw(rng);
        if !value.is_zero() {
            return value;
        }
    }
}

/// Generates a random element of the field `M` using the thread-local random number generator.
///
/// This function is only available with the `std` feature.
#[cfg(feature = "std")]
pub fn random_element<M: PrimeModulus>() -> Fp<M> {
    draw(&mut rand::rng())
}
