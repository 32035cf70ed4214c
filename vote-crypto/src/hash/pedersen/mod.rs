use crate::{
    curve::{AffinePoint, CurveError, StarkCurve},
    field::FieldElement,
};

mod constants;
pub use constants::STARK_PEDERSEN_PARAMS;


// PEDERSEN PARAMETERS
// ================================================================================================

/// The constant curve points defining an instance of the Pedersen hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedersenParams {
    shift_point: AffinePoint<StarkCurve>,
    points: [AffinePoint<StarkCurve>; 4],
}

impl PedersenParams {
    /// Creates a parameter set from a shift point and four base points: the low and high parts
    /// of the first input, then the low and high parts of the second input.
    ///
    /// # Errors
    /// Returns [CurveError::NotOnCurve] if any of the points is the identity or is not on the
    /// curve.
    pub fn new(
        shift_point: AffinePoint<StarkCurve>,
        points: [AffinePoint<StarkCurve>; 4],
    ) -> Result<Self, CurveError> {
        let valid = core::iter::once(&shift_point)
            .chain(points.iter())
            .all(|p| !p.is_identity() && p.is_on_curve());
        if !valid {
            return Err(CurveError::NotOnCurve);
        }
        Ok(Self { shift_point, points })
    }

    pub fn shift_point(&self) -> &AffinePoint<StarkCurve> {
        &self.shift_point
    }

    pub fn points(&self) -> &[AffinePoint<StarkCurve>; 4] {
        &self.points
    }
}

// PEDERSEN HASH
// ================================================================================================

/// The StarkWare Pedersen hash of two field elements.
///
/// Each input `x` is split into its low 248 bits and its remaining high bits, and the hash is
/// the x-coordinate of
///
/// ```text
/// shift_point + a_low * P0 + a_high * P1 + b_low * P2 + b_high * P3
/// ```
///
/// The hash is deterministic, order sensitive and defined for every pair of field elements. The
/// number of curve operations is the same for every input.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Pedersen;

impl Pedersen {
    /// Number of bits in the low part of each input.
    pub const LOW_PART_BITS: u32 = 248;

    /// Number of bits in the high part of each input.
    pub const HIGH_PART_BITS: u32 = FieldElement::MODULUS_BITS - Self::LOW_PART_BITS;

    /// Hashes two field elements with the standard StarkWare constant points.
    pub fn hash(a: FieldElement, b: FieldElement) -> FieldElement {
        Self::hash_with(&STARK_PEDERSEN_PARAMS, a, b)
    }

    /// Hashes two field elements with an explicit set of constant points.
    pub fn hash_with(params: &PedersenParams, a: FieldElement, b: FieldElement) -> FieldElement {
        let mut acc = params.shift_point.to_projective();
        for (input, bases) in [a, b].iter().zip(params.points.chunks_exact(2)) {
            let value = input.to_u256();
            let low = value.low_bits(Self::LOW_PART_BITS);
            let high = value.shr(Self::LOW_PART_BITS);
            debug_assert!(high.bits() <= Self::HIGH_PART_BITS);
            acc += bases[0].to_projective().mul_bits(&low, Self::LOW_PART_BITS);
            acc += bases[1].to_projective().mul_bits(&high, Self::HIGH_PART_BITS);
        }

        // the sum is the identity only for parameters with a known discrete-log relation
        acc.to_affine().x().unwrap_or(FieldElement::ZERO)
    }

    /// Hashes a sequence of field elements as `H(...H(H(0, e1), e2)..., n)` where `n` is the
    /// number of elements.
    pub fn hash_elements(elements: &[FieldElement]) -> FieldElement {
        let len = FieldElement::from_u64(elements.len() as u64);
        let acc = elements.iter().fold(FieldElement::ZERO, |acc, e| Self::hash(acc, *e));
        Self::hash(acc, len)
    }

    /// Hashes a pair of integers, such as a poll identifier and a vote.
    pub fn hash_u64(a: u64, b: u64) -> FieldElement {
        Self::hash(FieldElement::from_u64(a), FieldElement::from_u64(b))
    }
}
