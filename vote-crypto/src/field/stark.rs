//! The two prime fields of the STARK curve.

use super::{Fp, PrimeModulus, U256};

/// The STARK field prime `p = 2^251 + 17 * 2^192 + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarkPrime;

impl PrimeModulus for StarkPrime {
    const MODULUS: U256 =
        U256::from_be_hex("0800000000000011000000000000000000000000000000000000000000000001");
    const NAME: &'static str = "FieldElement";
}

/// The order of the STARK curve group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarkOrder;

impl PrimeModulus for StarkOrder {
    const MODULUS: U256 =
        U256::from_be_hex("0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f");
    const NAME: &'static str = "Scalar";
}

/// An element of the STARK base field; curve coordinates and hash outputs live here.
pub type FieldElement = Fp<StarkPrime>;

/// An integer modulo the STARK curve order; private keys and signature components live here.
pub type Scalar = Fp<StarkOrder>;

/// Reduces a field element modulo the curve order.
impl From<FieldElement> for Scalar {
    fn from(value: FieldElement) -> Self {
        Scalar::from_u256(value.to_u256())
    }
}

/// Embeds a scalar in the base field; exact since the curve order is below the field prime.
impl From<Scalar> for FieldElement {
    fn from(value: Scalar) -> Self {
        FieldElement::from_u256(value.to_u256())
    }
}
