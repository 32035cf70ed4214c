use alloc::{string::ToString, vec::Vec};

use assert_matches::assert_matches;
use num::{BigUint, One, Zero};
use proptest::prelude::*;

use super::*;

// HELPERS
// ================================================================================================

fn to_big(value: &U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes())
}

fn from_big(value: &BigUint) -> U256 {
    let bytes = value.to_bytes_be();
    assert!(bytes.len() <= U256_BYTES);
    let mut padded = [0u8; U256_BYTES];
    padded[U256_BYTES - bytes.len()..].copy_from_slice(&bytes);
    U256::from_be_bytes(&padded)
}

fn modulus<M: PrimeModulus>() -> BigUint {
    to_big(&M::MODULUS)
}

// MONTGOMERY CONSTANTS
// ================================================================================================

#[test]
fn stark_prime_montgomery_constants() {
    assert_eq!(StarkPrime::BITS, 252);
    assert_eq!(StarkPrime::INV, 0xffffffffffffffff);
    assert_eq!(
        StarkPrime::R,
        U256::from_be_hex("07fffffffffffdf0ffffffffffffffffffffffffffffffffffffffffffffffe1")
    );
    assert_eq!(
        StarkPrime::R2,
        U256::from_be_hex("07ffd4ab5e008810ffffffffff6f800000000001330ffffffffffd737e000401")
    );
}

#[test]
fn stark_order_montgomery_constants() {
    assert_eq!(StarkOrder::BITS, 252);
    assert_eq!(StarkOrder::INV, 0xbb6b3c4ce8bde631);
    assert_eq!(
        StarkOrder::R,
        U256::from_be_hex("07fffffffffffdf10000000000000008c75ec4b46df16bee51925a0bf4fca74f")
    );
    assert_eq!(
        StarkOrder::R2,
        U256::from_be_hex("07d9e57c2333766ebaf0ab4cf78bbabb509cf64d14ce60b96021b3f1ea1c688d")
    );
}

#[test]
fn montgomery_identities() {
    assert_eq!(FieldElement::ONE.to_u256(), U256::ONE);
    assert_eq!(FieldElement::ZERO.to_u256(), U256::ZERO);
    assert_eq!(Scalar::ONE.to_u256(), U256::ONE);
    assert_eq!(FieldElement::ONE.mont, StarkPrime::R);
    assert_eq!(FieldElement::from_u64(7).to_u256(), U256::from_u64(7));
}

// REDUCTION
// ================================================================================================

#[test]
fn construction_reduces_modulo_prime() {
    let p = StarkPrime::MODULUS;
    assert_eq!(FieldElement::from_u256(p), FieldElement::ZERO);
    assert_eq!(FieldElement::from_u256(p.wrapping_add(&U256::ONE)), FieldElement::ONE);
    assert_eq!(
        FieldElement::from_u256(U256::MAX).to_u256(),
        from_big(&(to_big(&U256::MAX) % modulus::<StarkPrime>()))
    );
}

#[test]
fn canonical_construction_rejects_out_of_range() {
    let p = StarkPrime::MODULUS;
    let p_minus_one = p.wrapping_sub(&U256::ONE);
    assert!(FieldElement::from_canonical(p).is_none());
    assert_eq!(FieldElement::from_canonical(p_minus_one).unwrap(), -FieldElement::ONE);
    assert!(FieldElement::from_bytes_canonical(&p.to_be_bytes()).is_none());
    assert_matches!(
        FieldElement::from_hex_canonical(&u256_hex(&p)),
        Err(HexParseError::OutOfRange)
    );
    assert_eq!(FieldElement::from_hex(&u256_hex(&p)).unwrap(), FieldElement::ZERO);
}

fn u256_hex(value: &U256) -> alloc::string::String {
    crate::utils::u256_to_hex(value)
}

// ARITHMETIC
// ================================================================================================

#[test]
fn inverse_of_zero_fails() {
    assert_matches!(FieldElement::ZERO.inverse(), Err(FieldError::DivisionByZero));
    assert_matches!(Scalar::ZERO.inverse(), Err(FieldError::DivisionByZero));
    assert_matches!(
        FieldElement::ONE.checked_div(&FieldElement::ZERO),
        Err(FieldError::DivisionByZero)
    );
}

#[test]
fn inverse_of_one_and_minus_one() {
    assert_eq!(FieldElement::ONE.inverse().unwrap(), FieldElement::ONE);
    let minus_one = -Scalar::ONE;
    assert_eq!(minus_one.inverse().unwrap(), minus_one);
}

#[test]
fn negation_of_zero_is_zero() {
    assert_eq!(-FieldElement::ZERO, FieldElement::ZERO);
    assert_eq!(FieldElement::ZERO - FieldElement::ZERO, FieldElement::ZERO);
}

#[test]
fn sqrt_of_known_squares() {
    for value in [0u64, 1, 4, 9, 10018, 654321] {
        let x = FieldElement::from_u64(value);
        let square = x.square();
        let root = square.sqrt().expect("a square must have a root");
        assert!(root == x || root == -x);
    }
}

#[test]
fn sqrt_of_non_residue_is_none() {
    // 3 is a quadratic non-residue modulo the STARK prime
    let three = FieldElement::from_u64(3);
    assert!(!three.is_square());
    assert!(three.sqrt().is_none());
}

#[test]
fn ordering_uses_canonical_value() {
    let small = FieldElement::from_u64(2);
    let large = -FieldElement::ONE;
    assert!(small < large);
    let mut values = Vec::from([large, FieldElement::ZERO, small]);
    values.sort();
    assert_eq!(values, [FieldElement::ZERO, small, large]);
}

// ENCODING
// ================================================================================================

#[test]
fn hex_encoding_is_canonical() {
    assert_eq!(FieldElement::ZERO.to_hex(), "0x0");
    assert_eq!(FieldElement::from_u64(10018).to_hex(), "0x2722");
    assert_eq!(
        (-Scalar::ONE).to_hex(),
        "0x800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2e"
    );
    assert_eq!(format!("{:x}", FieldElement::from_u64(255)), "ff");
}

#[test]
fn hex_round_trip_at_domain_edges() {
    for scalar in [Scalar::ZERO, Scalar::ONE, -Scalar::ONE] {
        assert_eq!(Scalar::from_hex_canonical(&scalar.to_hex()).unwrap(), scalar);
    }
}

#[test]
fn from_str_accepts_decimal_and_hex() {
    let decimal: Scalar = "654321".parse().unwrap();
    let hex: Scalar = "0x9fbf1".parse().unwrap();
    assert_eq!(decimal, hex);
    assert_eq!(decimal, Scalar::from_u64(654_321));
    assert!("0xzz".parse::<Scalar>().is_err());
    assert!("".parse::<Scalar>().is_err());
}

#[test]
fn conversions_between_fields() {
    let order_as_field = FieldElement::from_u256(StarkOrder::MODULUS);
    assert_eq!(Scalar::from(order_as_field), Scalar::ZERO);

    let scalar = -Scalar::ONE;
    assert_eq!(Scalar::from(FieldElement::from(scalar)), scalar);
}

#[test]
fn debug_names_the_field() {
    assert_eq!(format!("{:?}", FieldElement::from_u64(1)), "FieldElement(0x1)");
    assert_eq!(format!("{:?}", Scalar::from_u64(16)), "Scalar(0x10)");
    assert_eq!(FieldElement::ONE.to_string(), "0x1");
}

// PROPERTY TESTS
// ================================================================================================

fn check_arithmetic<M: PrimeModulus>(a: U256, b: U256) -> Result<(), TestCaseError> {
    let p = modulus::<M>();
    let (big_a, big_b) = (to_big(&a) % &p, to_big(&b) % &p);
    let (fa, fb) = (Fp::<M>::from_u256(a), Fp::<M>::from_u256(b));

    prop_assert_eq!(to_big(&fa.to_u256()), big_a.clone());
    prop_assert_eq!(to_big(&(fa + fb).to_u256()), (&big_a + &big_b) % &p);
    prop_assert_eq!(to_big(&(fa - fb).to_u256()), (&big_a + &p - &big_b) % &p);
    prop_assert_eq!(to_big(&(fa * fb).to_u256()), (&big_a * &big_b) % &p);
    prop_assert_eq!(to_big(&(-fa).to_u256()), (&p - &big_a) % &p);
    prop_assert_eq!(to_big(&fa.square().to_u256()), (&big_a * &big_a) % &p);

    if !big_b.is_zero() {
        let inv = fb.inverse().unwrap();
        prop_assert_eq!(to_big(&inv.to_u256()), big_b.modpow(&(&p - 2u32), &p));
        prop_assert_eq!(fb * inv, Fp::<M>::ONE);
    }
    Ok(())
}

proptest! {
    #[test]
    fn stark_prime_matches_big_integers(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
        check_arithmetic::<StarkPrime>(U256::from_words(a), U256::from_words(b))?;
    }

    #[test]
    fn stark_order_matches_big_integers(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
        check_arithmetic::<StarkOrder>(U256::from_words(a), U256::from_words(b))?;
    }

    #[test]
    fn pow_matches_big_integers(a in any::<[u64; 4]>(), e in any::<[u64; 4]>()) {
        let p = modulus::<StarkPrime>();
        let (a, e) = (U256::from_words(a), U256::from_words(e));
        let expected = (to_big(&a) % &p).modpow(&to_big(&e), &p);
        prop_assert_eq!(to_big(&FieldElement::from_u256(a).pow(&e).to_u256()), expected);
    }

    #[test]
    fn hex_round_trip(a in any::<[u64; 4]>()) {
        let element = Scalar::from_u256(U256::from_words(a));
        prop_assert_eq!(Scalar::from_hex_canonical(&element.to_hex()).unwrap(), element);
        prop_assert_eq!(Scalar::from_bytes_canonical(&element.to_bytes()).unwrap(), element);
    }

    #[test]
    fn sqrt_of_squares(a in any::<[u64; 4]>()) {
        let x = FieldElement::from_u256(U256::from_words(a));
        let root = x.square().sqrt().unwrap();
        prop_assert!(root == x || root == -x);
    }

    #[test]
    fn limb_shifts_match_big_integers(a in any::<[u64; 4]>(), shift in 0u32..256) {
        let value = U256::from_words(a);
        let big = to_big(&value);
        let mask = (BigUint::one() << 256u32) - 1u32;
        prop_assert_eq!(to_big(&value.shr(shift)), &big >> shift);
        prop_assert_eq!(to_big(&value.shl(shift)), (&big << shift) & mask);
        prop_assert_eq!(to_big(&value.low_bits(shift)), &big & ((BigUint::one() << shift) - 1u32));
        prop_assert_eq!(value.bits() as u64, big.bits());
    }
}
