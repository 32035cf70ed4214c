//! Prime field arithmetic over 256-bit moduli.
//!
//! Field elements are represented in Montgomery form: an element `a` is stored as
//! `a * R mod p` where `R = 2^256`. Every Montgomery constant is derived at compile time from the
//! modulus declared by a [PrimeModulus] implementation, so adding a new field only requires
//! declaring its modulus.
//!
//! Arithmetic on [Fp] runs in constant time with respect to the values of its operands; the only
//! variable-time operations are [Fp::sqrt] and the comparison traits, which operate on public
//! data.

use alloc::string::String;
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use thiserror::Error;
use zeroize::Zeroize;

use crate::utils::{HexParseError, dec_to_u256, hex_to_u256};

mod limbs;
pub use limbs::{LIMBS, U256, U256_BYTES};
use limbs::{adc, mac};

mod stark;
pub use stark::{FieldElement, Scalar, StarkOrder, StarkPrime};

#[cfg(test)]
mod tests;

// ERRORS
// ================================================================================================

/// Errors raised by prime field arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Attempted to invert the additive identity.
    #[error("attempted to invert the zero element of the field")]
    DivisionByZero,
}

// PRIME MODULUS
// ================================================================================================

/// Declares the modulus of a prime field.
///
/// Only [PrimeModulus::MODULUS] and [PrimeModulus::NAME] need to be provided; the Montgomery
/// constants are evaluated at compile time from the modulus. The modulus must be an odd prime.
pub trait PrimeModulus:
    'static + Copy + Clone + fmt::Debug + Default + Eq + PartialEq + Send + Sync
{
    /// The field modulus `p`.
    const MODULUS: U256;

    /// Human readable name of the field.
    const NAME: &'static str;

    /// Number of significant bits in the modulus.
    const BITS: u32 = Self::MODULUS.bits();

    /// `-p^-1 mod 2^64`.
    const INV: u64 = compute_inv(Self::MODULUS.0[0]);

    /// `2^256 mod p`, the Montgomery form of one.
    const R: U256 = compute_r(&Self::MODULUS);

    /// `2^512 mod p`, used to move values into Montgomery form.
    const R2: U256 = compute_r2(&Self::MODULUS);

    /// `p - 2`, the exponent used for inversion.
    const MODULUS_MINUS_TWO: U256 = Self::MODULUS.wrapping_sub(&U256::from_u64(2));

    /// `(p - 1) / 2`, the exponent used by Euler's criterion.
    const HALF_MODULUS: U256 = Self::MODULUS.shr(1);
}

/// Computes `-m^-1 mod 2^64` by Newton iteration; each step doubles the number of correct bits.
const fn compute_inv(m0: u64) -> u64 {
    let mut inv = 1u64;
    let mut i = 0;
    while i < 6 {
        inv = inv.wrapping_mul(2u64.wrapping_sub(m0.wrapping_mul(inv)));
        i += 1;
    }
    inv.wrapping_neg()
}

/// Computes `2 * x mod m` for `x < m`.
const fn double_mod(x: &U256, m: &U256) -> U256 {
    let (doubled, carry) = x.adc(x);
    let (reduced, borrow) = doubled.sbb(m);
    if carry == 1 || borrow == 0 { reduced } else { doubled }
}

const fn compute_r(m: &U256) -> U256 {
    let mut r = U256::ONE;
    let mut i = 0;
    while i < 256 {
        r = double_mod(&r, m);
        i += 1;
    }
    r
}

const fn compute_r2(m: &U256) -> U256 {
    let mut r = compute_r(m);
    let mut i = 0;
    while i < 256 {
        r = double_mod(&r, m);
        i += 1;
    }
    r
}

// MODULAR PRIMITIVES
// ================================================================================================

/// Subtracts `m` from `(hi, value)` unless that would underflow, without branching.
#[inline(always)]
const fn reduce_once(value: &U256, hi: u64, m: &U256) -> U256 {
    let (reduced, borrow) = value.sbb(m);
    // keep `value` only if the subtraction borrowed and there was no carry out of 256 bits
    let keep = 0u64.wrapping_sub(borrow & (hi ^ 1));
    U256([
        (value.0[0] & keep) | (reduced.0[0] & !keep),
        (value.0[1] & keep) | (reduced.0[1] & !keep),
        (value.0[2] & keep) | (reduced.0[2] & !keep),
        (value.0[3] & keep) | (reduced.0[3] & !keep),
    ])
}

const fn add_mod(a: &U256, b: &U256, m: &U256) -> U256 {
    let (sum, carry) = a.adc(b);
    reduce_once(&sum, carry, m)
}

const fn sub_mod(a: &U256, b: &U256, m: &U256) -> U256 {
    let (diff, borrow) = a.sbb(b);
    let mask = 0u64.wrapping_sub(borrow);
    let correction = U256([m.0[0] & mask, m.0[1] & mask, m.0[2] & mask, m.0[3] & mask]);
    diff.wrapping_add(&correction)
}

/// Montgomery multiplication (CIOS): returns `a * b * 2^-256 mod m`.
///
/// The result is fully reduced whenever `a * b < m * 2^256`, which holds for any `a < 2^256`
/// as long as `b < m`.
const fn mont_mul(a: &U256, b: &U256, m: &U256, inv: u64) -> U256 {
    let mut t = [0u64; LIMBS + 2];
    let mut i = 0;
    while i < LIMBS {
        let mut carry = 0;
        let mut j = 0;
        while j < LIMBS {
            let (lo, hi) = mac(t[j], a.0[j], b.0[i], carry);
            t[j] = lo;
            carry = hi;
            j += 1;
        }
        let (lo, hi) = adc(t[LIMBS], carry, 0);
        t[LIMBS] = lo;
        t[LIMBS + 1] = hi;

        let k = t[0].wrapping_mul(inv);
        let (_, mut carry) = mac(t[0], k, m.0[0], 0);
        let mut j = 1;
        while j < LIMBS {
            let (lo, hi) = mac(t[j], k, m.0[j], carry);
            t[j - 1] = lo;
            carry = hi;
            j += 1;
        }
        let (lo, hi) = adc(t[LIMBS], carry, 0);
        t[LIMBS - 1] = lo;
        t[LIMBS] = t[LIMBS + 1] + hi;
        i += 1;
    }

    reduce_once(&U256([t[0], t[1], t[2], t[3]]), t[LIMBS], m)
}

// FIELD ELEMENT
// ================================================================================================

/// An element of the prime field defined by `M`.
///
/// The inner value is always fully reduced, so equality of the stored representation is equality
/// of the field elements.
pub struct Fp<M: PrimeModulus> {
    mont: U256,
    _modulus: PhantomData<M>,
}

impl<M: PrimeModulus> Fp<M> {
    /// The additive identity.
    pub const ZERO: Self = Self::from_montgomery(U256::ZERO);

    /// The multiplicative identity.
    pub const ONE: Self = Self::from_montgomery(M::R);

    /// The field modulus.
    pub const MODULUS: U256 = M::MODULUS;

    /// Number of significant bits in the field modulus.
    pub const MODULUS_BITS: u32 = M::BITS;

    const fn from_montgomery(mont: U256) -> Self {
        Self { mont, _modulus: PhantomData }
    }

    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Creates a field element from any 256-bit integer, reducing it modulo the field prime.
    pub const fn from_u256(value: U256) -> Self {
        Self::from_montgomery(mont_mul(&value, &M::R2, &M::MODULUS, M::INV))
    }

    /// Creates a field element from an integer which must already be below the modulus.
    ///
    /// Returns `None` when `value >= p`.
    pub const fn from_canonical(value: U256) -> Option<Self> {
        if value.lt(&M::MODULUS) {
            Some(Self::from_u256(value))
        } else {
            None
        }
    }

    pub const fn from_u64(value: u64) -> Self {
        Self::from_u256(U256::from_u64(value))
    }

    pub const fn from_u128(value: u128) -> Self {
        Self::from_u256(U256::from_u128(value))
    }

    /// Creates a field element from a hex constant, reducing it modulo the field prime.
    ///
    /// Panics on malformed input; intended for compile-time constants.
    pub const fn from_hex_unchecked(hex: &str) -> Self {
        Self::from_u256(U256::from_be_hex(hex))
    }

    /// Creates a field element from 32 big-endian bytes, reducing modulo the field prime.
    pub const fn from_bytes(bytes: &[u8; U256_BYTES]) -> Self {
        Self::from_u256(U256::from_be_bytes(bytes))
    }

    /// Creates a field element from 32 big-endian bytes, rejecting values `>= p`.
    pub const fn from_bytes_canonical(bytes: &[u8; U256_BYTES]) -> Option<Self> {
        Self::from_canonical(U256::from_be_bytes(bytes))
    }

    /// Parses a `0x`-prefixed hex string, reducing the value modulo the field prime.
    pub fn from_hex(hex: &str) -> Result<Self, HexParseError> {
        hex_to_u256(hex).map(Self::from_u256)
    }

    /// Parses a `0x`-prefixed hex string, rejecting values `>= p`.
    pub fn from_hex_canonical(hex: &str) -> Result<Self, HexParseError> {
        Self::from_canonical(hex_to_u256(hex)?).ok_or(HexParseError::OutOfRange)
    }

    /// Parses a decimal string, reducing the value modulo the field prime.
    pub fn from_dec_str(value: &str) -> Result<Self, HexParseError> {
        dec_to_u256(value).map(Self::from_u256)
    }

    // ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the canonical integer representative in `[0, p)`.
    pub const fn to_u256(&self) -> U256 {
        mont_mul(&self.mont, &U256::ONE, &M::MODULUS, M::INV)
    }

    /// Returns the 32-byte big-endian encoding of the canonical representative.
    pub const fn to_bytes(&self) -> [u8; U256_BYTES] {
        self.to_u256().to_be_bytes()
    }

    /// Returns the canonical `0x`-prefixed, minimal, lower-case hex encoding.
    pub fn to_hex(&self) -> String {
        format!("{self}")
    }

    pub fn is_zero(&self) -> bool {
        self.mont.is_zero()
    }

    /// Returns a [Choice] which is set when this element is zero.
    pub fn ct_is_zero(&self) -> Choice {
        self.mont.ct_eq(&U256::ZERO)
    }

    // ARITHMETIC
    // --------------------------------------------------------------------------------------------

    pub const fn add_inner(&self, rhs: &Self) -> Self {
        Self::from_montgomery(add_mod(&self.mont, &rhs.mont, &M::MODULUS))
    }

    pub const fn sub_inner(&self, rhs: &Self) -> Self {
        Self::from_montgomery(sub_mod(&self.mont, &rhs.mont, &M::MODULUS))
    }

    pub const fn mul_inner(&self, rhs: &Self) -> Self {
        Self::from_montgomery(mont_mul(&self.mont, &rhs.mont, &M::MODULUS, M::INV))
    }

    pub const fn neg_inner(&self) -> Self {
        Self::from_montgomery(sub_mod(&U256::ZERO, &self.mont, &M::MODULUS))
    }

    pub const fn double(&self) -> Self {
        self.add_inner(self)
    }

    pub const fn square(&self) -> Self {
        self.mul_inner(self)
    }

    /// Raises this element to the power `exp`.
    ///
    /// The exponent is scanned over all 256 bits with a constant-time select, so the running time
    /// does not depend on either the base or the exponent.
    pub fn pow(&self, exp: &U256) -> Self {
        let mut acc = Self::ONE;
        for i in (0..256).rev() {
            acc = acc.square();
            let product = acc * *self;
            acc = Self::conditional_select(&acc, &product, Choice::from(exp.bit(i) as u8));
        }
        acc
    }

    /// Returns the multiplicative inverse of this element.
    ///
    /// # Errors
    /// Returns [FieldError::DivisionByZero] if this element is zero.
    pub fn inverse(&self) -> Result<Self, FieldError> {
        if self.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        Ok(self.pow(&M::MODULUS_MINUS_TWO))
    }

    /// Divides this element by `rhs`.
    ///
    /// # Errors
    /// Returns [FieldError::DivisionByZero] if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, FieldError> {
        Ok(*self * rhs.inverse()?)
    }

    /// Returns `true` if this element is a square in the field (zero included).
    pub fn is_square(&self) -> bool {
        self.is_zero() || self.pow(&M::HALF_MODULUS) == Self::ONE
    }

    /// Returns a square root of this element, or `None` if it is not a square.
    ///
    /// Uses the Tonelli-Shanks algorithm. This operation is not constant time and must only be
    /// applied to public values.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::ZERO);
        }
        if !self.is_square() {
            return None;
        }

        let p_minus_one = M::MODULUS.wrapping_sub(&U256::ONE);
        let two_adicity = p_minus_one.trailing_zeros();
        let odd_part = p_minus_one.shr(two_adicity);

        let mut non_residue = Self::from_u64(2);
        while non_residue.is_square() {
            non_residue += Self::ONE;
        }

        let mut m = two_adicity;
        let mut c = non_residue.pow(&odd_part);
        let mut t = self.pow(&odd_part);
        let mut root = self.pow(&odd_part.wrapping_add(&U256::ONE).shr(1));

        while t != Self::ONE {
            let mut i = 0;
            let mut t_pow = t;
            while t_pow != Self::ONE {
                t_pow = t_pow.square();
                i += 1;
            }

            let mut b = c;
            for _ in 0..(m - i - 1) {
                b = b.square();
            }
            m = i;
            c = b.square();
            t *= c;
            root *= b;
        }

        Some(root)
    }
}

// TRAIT IMPLEMENTATIONS
// ================================================================================================

impl<M: PrimeModulus> Clone for Fp<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: PrimeModulus> Copy for Fp<M> {}

impl<M: PrimeModulus> Default for Fp<M> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<M: PrimeModulus> PartialEq for Fp<M> {
    fn eq(&self, other: &Self) -> bool {
        self.mont == other.mont
    }
}

impl<M: PrimeModulus> Eq for Fp<M> {}

impl<M: PrimeModulus> Hash for Fp<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_u256().hash(state);
    }
}

impl<M: PrimeModulus> Ord for Fp<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_u256().cmp(&other.to_u256())
    }
}

impl<M: PrimeModulus> PartialOrd for Fp<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M: PrimeModulus> ConstantTimeEq for Fp<M> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.mont.ct_eq(&other.mont)
    }
}

impl<M: PrimeModulus> ConditionallySelectable for Fp<M> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self::from_montgomery(U256::conditional_select(&a.mont, &b.mont, choice))
    }
}

impl<M: PrimeModulus> Zeroize for Fp<M> {
    fn zeroize(&mut self) {
        self.mont.zeroize();
    }
}

impl<M: PrimeModulus> Add for Fp<M> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.add_inner(&rhs)
    }
}

impl<M: PrimeModulus> AddAssign for Fp<M> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<M: PrimeModulus> Sub for Fp<M> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.sub_inner(&rhs)
    }
}

impl<M: PrimeModulus> SubAssign for Fp<M> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<M: PrimeModulus> Mul for Fp<M> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.mul_inner(&rhs)
    }
}

impl<M: PrimeModulus> MulAssign for Fp<M> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<M: PrimeModulus> Neg for Fp<M> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.neg_inner()
    }
}

impl<M: PrimeModulus> From<u64> for Fp<M> {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl<M: PrimeModulus> From<u32> for Fp<M> {
    fn from(value: u32) -> Self {
        Self::from_u64(value.into())
    }
}

impl<M: PrimeModulus> From<u128> for Fp<M> {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl<M: PrimeModulus> From<U256> for Fp<M> {
    fn from(value: U256) -> Self {
        Self::from_u256(value)
    }
}

impl<M: PrimeModulus> From<Fp<M>> for U256 {
    fn from(value: Fp<M>) -> Self {
        value.to_u256()
    }
}

/// Parses either a `0x`-prefixed hex string or a decimal string, reducing modulo the prime.
impl<M: PrimeModulus> FromStr for Fp<M> {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") || s.starts_with("0X") {
            Self::from_hex(s)
        } else {
            Self::from_dec_str(s)
        }
    }
}

impl<M: PrimeModulus> fmt::LowerHex for Fp<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.to_u256(), f)
    }
}

impl<M: PrimeModulus> fmt::Display for Fp<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.to_u256())
    }
}

impl<M: PrimeModulus> fmt::Debug for Fp<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#x})", M::NAME, self.to_u256())
    }
}

// SERIALIZATION
// ================================================================================================

#[cfg(feature = "serde")]
impl<M: PrimeModulus> serde::Serialize for Fp<M> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de, M: PrimeModulus> serde::Deserialize<'de> for Fp<M> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <alloc::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::from_hex_canonical(&value).map_err(serde::de::Error::custom)
    }
}
