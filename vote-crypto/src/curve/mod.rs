//! Short-Weierstrass elliptic curves `y^2 = x^3 + alpha * x + beta` over prime fields.
//!
//! The group law is implemented on homogeneous projective coordinates using the complete
//! addition formulas of Renes, Costello and Batina ("Complete addition formulas for prime order
//! elliptic curves", 2016, algorithm 1). Complete formulas have no exceptional cases: the same
//! sequence of field operations adds distinct points, doubles a point and handles the identity,
//! so point arithmetic never branches on point values.
//!
//! Curve parameters are supplied through the [CurveConfig] trait. The production curve is
//! [StarkCurve]; any other prime-order curve can be plugged in by implementing the trait.

use core::{
    fmt,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use thiserror::Error;

use crate::field::{Fp, PrimeModulus, U256};

mod stark;
pub use stark::StarkCurve;

#[cfg(test)]
mod tests;

// CURVE CONFIGURATION
// ================================================================================================

/// An element of the base field of curve `C`.
pub type BaseField<C> = Fp<<C as CurveConfig>::BaseModulus>;

/// An integer modulo the group order of curve `C`.
pub type ScalarField<C> = Fp<<C as CurveConfig>::ScalarModulus>;

/// Declares the parameters of a prime-order short-Weierstrass curve.
pub trait CurveConfig: 'static + Copy + Clone + fmt::Debug + Default + Eq + Send + Sync {
    /// Modulus of the field the curve is defined over.
    type BaseModulus: PrimeModulus;

    /// Order of the group generated by [CurveConfig::GENERATOR_X], [CurveConfig::GENERATOR_Y].
    type ScalarModulus: PrimeModulus;

    /// The `alpha` coefficient of the curve equation.
    const ALPHA: BaseField<Self>;

    /// The `beta` coefficient of the curve equation.
    const BETA: BaseField<Self>;

    /// `3 * beta`, used by the complete addition formulas.
    const BETA3: BaseField<Self> = Self::BETA.double().add_inner(&Self::BETA);

    /// x-coordinate of the fixed generator.
    const GENERATOR_X: BaseField<Self>;

    /// y-coordinate of the fixed generator.
    const GENERATOR_Y: BaseField<Self>;
}

// ERRORS
// ================================================================================================

/// Errors raised when constructing curve points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("point does not satisfy the curve equation")]
    NotOnCurve,
}

// AFFINE POINT
// ================================================================================================

/// A point on curve `C` in affine coordinates, or the point at infinity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AffinePoint<C: CurveConfig> {
    x: BaseField<C>,
    y: BaseField<C>,
    infinity: bool,
}

impl<C: CurveConfig> AffinePoint<C> {
    /// The point at infinity, the identity of the group.
    pub const IDENTITY: Self = Self {
        x: Fp::ZERO,
        y: Fp::ZERO,
        infinity: true,
    };

    /// The fixed generator of the curve.
    pub const GENERATOR: Self = Self::new_unchecked(C::GENERATOR_X, C::GENERATOR_Y);

    /// Creates a point from its coordinates.
    ///
    /// # Errors
    /// Returns [CurveError::NotOnCurve] if `(x, y)` does not satisfy the curve equation.
    pub fn new(x: BaseField<C>, y: BaseField<C>) -> Result<Self, CurveError> {
        let point = Self::new_unchecked(x, y);
        if point.is_on_curve() {
            Ok(point)
        } else {
            Err(CurveError::NotOnCurve)
        }
    }

    /// Creates a point from coordinates which are known to lie on the curve.
    pub const fn new_unchecked(x: BaseField<C>, y: BaseField<C>) -> Self {
        Self { x, y, infinity: false }
    }

    /// Recovers a point from its x-coordinate.
    ///
    /// Of the two candidate points `(x, y)` and `(x, -y)`, the one whose y-coordinate has the
    /// smaller canonical representative is returned; the other one is its negation. Returns
    /// `None` if no point with this x-coordinate exists.
    pub fn from_x(x: BaseField<C>) -> Option<Self> {
        let y = curve_rhs::<C>(&x).sqrt()?;
        Some(Self::new_unchecked(x, core::cmp::min(y, -y)))
    }

    /// Returns the x-coordinate, or `None` for the point at infinity.
    pub fn x(&self) -> Option<BaseField<C>> {
        (!self.infinity).then_some(self.x)
    }

    /// Returns the y-coordinate, or `None` for the point at infinity.
    pub fn y(&self) -> Option<BaseField<C>> {
        (!self.infinity).then_some(self.y)
    }

    pub fn is_identity(&self) -> bool {
        self.infinity
    }

    /// Returns `true` if this point satisfies the curve equation; the identity always does.
    pub fn is_on_curve(&self) -> bool {
        self.infinity || self.y.square() == curve_rhs::<C>(&self.x)
    }

    pub fn to_projective(&self) -> ProjectivePoint<C> {
        ProjectivePoint::from(*self)
    }
}

/// Evaluates `x^3 + alpha * x + beta`.
fn curve_rhs<C: CurveConfig>(x: &BaseField<C>) -> BaseField<C> {
    (x.square() + C::ALPHA) * *x + C::BETA
}

impl<C: CurveConfig> Default for AffinePoint<C> {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl<C: CurveConfig> Neg for AffinePoint<C> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        if self.infinity {
            self
        } else {
            Self::new_unchecked(self.x, -self.y)
        }
    }
}

impl<C: CurveConfig> From<ProjectivePoint<C>> for AffinePoint<C> {
    fn from(point: ProjectivePoint<C>) -> Self {
        point.to_affine()
    }
}

impl<C: CurveConfig> fmt::Debug for AffinePoint<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.infinity {
            f.write_str("AffinePoint(infinity)")
        } else {
            write!(f, "AffinePoint({:#x}, {:#x})", self.x, self.y)
        }
    }
}

// PROJECTIVE POINT
// ================================================================================================

/// A point on curve `C` in homogeneous projective coordinates `(X : Y : Z)`, representing the
/// affine point `(X / Z, Y / Z)`. The identity is `(0 : 1 : 0)`.
#[derive(Clone, Copy)]
pub struct ProjectivePoint<C: CurveConfig> {
    x: BaseField<C>,
    y: BaseField<C>,
    z: BaseField<C>,
}

impl<C: CurveConfig> ProjectivePoint<C> {
    /// The point at infinity.
    pub const IDENTITY: Self = Self { x: Fp::ZERO, y: Fp::ONE, z: Fp::ZERO };

    /// The fixed generator of the curve.
    pub const GENERATOR: Self = Self {
        x: C::GENERATOR_X,
        y: C::GENERATOR_Y,
        z: Fp::ONE,
    };

    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// Returns `true` if `Y^2 * Z = X^3 + alpha * X * Z^2 + beta * Z^3`.
    pub fn is_on_curve(&self) -> bool {
        let z2 = self.z.square();
        let lhs = self.y.square() * self.z;
        let rhs = self.x.square() * self.x + C::ALPHA * self.x * z2 + C::BETA * z2 * self.z;
        lhs == rhs
    }

    /// Converts this point into affine coordinates.
    pub fn to_affine(&self) -> AffinePoint<C> {
        match self.z.inverse() {
            Ok(z_inv) => AffinePoint::new_unchecked(self.x * z_inv, self.y * z_inv),
            Err(_) => AffinePoint::IDENTITY,
        }
    }

    // GROUP LAW
    // --------------------------------------------------------------------------------------------

    /// Adds two points using the complete formulas; valid for every pair of inputs.
    pub fn add_inner(&self, rhs: &Self) -> Self {
        let a = C::ALPHA;
        let b3 = C::BETA3;
        let (x1, y1, z1) = (self.x, self.y, self.z);
        let (x2, y2, z2) = (rhs.x, rhs.y, rhs.z);

        let mut t0 = x1 * x2;
        let mut t1 = y1 * y2;
        let mut t2 = z1 * z2;
        let t3 = (x1 + y1) * (x2 + y2) - (t0 + t1);
        let mut t4 = (x1 + z1) * (x2 + z2) - (t0 + t2);
        let t5 = (y1 + z1) * (y2 + z2) - (t1 + t2);

        let mut z3 = a * t4;
        let mut x3 = b3 * t2;
        z3 += x3;
        x3 = t1 - z3;
        z3 += t1;
        let mut y3 = x3 * z3;

        t1 = t0.double() + t0;
        t2 = a * t2;
        t4 = b3 * t4;
        t1 += t2;
        t2 = a * (t0 - t2);
        t4 += t2;

        t0 = t1 * t4;
        y3 += t0;
        t0 = t5 * t4;
        x3 = t3 * x3 - t0;
        t0 = t3 * t1;
        z3 = t5 * z3 + t0;

        Self { x: x3, y: y3, z: z3 }
    }

    pub fn double(&self) -> Self {
        self.add_inner(self)
    }

    /// Multiplies this point by a scalar.
    ///
    /// Runs a double-and-add-always loop over all 256 bits of the scalar's canonical
    /// representative, selecting the result of each addition in constant time.
    pub fn mul_scalar(&self, scalar: &ScalarField<C>) -> Self {
        self.mul_bits(&scalar.to_u256(), U256::BITS)
    }

    /// Multiplies this point by the integer formed by the lowest `num_bits` bits of `k`.
    ///
    /// The number of group operations depends only on `num_bits`.
    pub fn mul_bits(&self, k: &U256, num_bits: u32) -> Self {
        let mut acc = Self::IDENTITY;
        for i in (0..num_bits as usize).rev() {
            acc = acc.double();
            let sum = acc.add_inner(self);
            acc = Self::conditional_select(&acc, &sum, Choice::from(k.bit(i) as u8));
        }
        acc
    }
}

impl<C: CurveConfig> Default for ProjectivePoint<C> {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl<C: CurveConfig> From<AffinePoint<C>> for ProjectivePoint<C> {
    fn from(point: AffinePoint<C>) -> Self {
        if point.infinity {
            Self::IDENTITY
        } else {
            Self { x: point.x, y: point.y, z: Fp::ONE }
        }
    }
}

/// Two points are equal when they represent the same affine point, i.e. when
/// `X1 * Z2 = X2 * Z1` and `Y1 * Z2 = Y2 * Z1`.
impl<C: CurveConfig> ConstantTimeEq for ProjectivePoint<C> {
    fn ct_eq(&self, other: &Self) -> Choice {
        (self.x * other.z).ct_eq(&(other.x * self.z))
            & (self.y * other.z).ct_eq(&(other.y * self.z))
    }
}

impl<C: CurveConfig> PartialEq for ProjectivePoint<C> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<C: CurveConfig> Eq for ProjectivePoint<C> {}

impl<C: CurveConfig> ConditionallySelectable for ProjectivePoint<C> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Fp::conditional_select(&a.x, &b.x, choice),
            y: Fp::conditional_select(&a.y, &b.y, choice),
            z: Fp::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl<C: CurveConfig> Add for ProjectivePoint<C> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.add_inner(&rhs)
    }
}

impl<C: CurveConfig> AddAssign for ProjectivePoint<C> {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.add_inner(&rhs);
    }
}

impl<C: CurveConfig> Sub for ProjectivePoint<C> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.add_inner(&-rhs)
    }
}

impl<C: CurveConfig> SubAssign for ProjectivePoint<C> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<C: CurveConfig> Neg for ProjectivePoint<C> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { x: self.x, y: -self.y, z: self.z }
    }
}

impl<C: CurveConfig> Mul<ScalarField<C>> for ProjectivePoint<C> {
    type Output = Self;

    fn mul(self, rhs: ScalarField<C>) -> Self::Output {
        self.mul_scalar(&rhs)
    }
}

impl<C: CurveConfig> Mul<ScalarField<C>> for AffinePoint<C> {
    type Output = ProjectivePoint<C>;

    fn mul(self, rhs: ScalarField<C>) -> Self::Output {
        self.to_projective().mul_scalar(&rhs)
    }
}

impl<C: CurveConfig> fmt::Debug for ProjectivePoint<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectivePoint({:#x} : {:#x} : {:#x})", self.x, self.y, self.z)
    }
}
