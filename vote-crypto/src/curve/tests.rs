use assert_matches::assert_matches;
use proptest::prelude::*;

use super::*;
use crate::field::{FieldElement, Scalar};

// TEST CURVE
// ================================================================================================

/// `y^2 = x^3 + x + 28` over `F_10007`; the group has prime order 9851.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TestCurve;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TestPrime;

impl PrimeModulus for TestPrime {
    const MODULUS: U256 = U256::from_u64(10007);
    const NAME: &'static str = "TestBase";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TestOrder;

impl PrimeModulus for TestOrder {
    const MODULUS: U256 = U256::from_u64(9851);
    const NAME: &'static str = "TestScalar";
}

impl CurveConfig for TestCurve {
    type BaseModulus = TestPrime;
    type ScalarModulus = TestOrder;

    const ALPHA: BaseField<Self> = Fp::ONE;
    const BETA: BaseField<Self> = Fp::from_u64(28);
    const GENERATOR_X: BaseField<Self> = Fp::from_u64(2);
    const GENERATOR_Y: BaseField<Self> = Fp::from_u64(4582);
}

const TEST_ORDER: u64 = 9851;

type TestAffine = AffinePoint<TestCurve>;
type TestProjective = ProjectivePoint<TestCurve>;

fn point(x: u64, y: u64) -> TestAffine {
    TestAffine::new(Fp::from_u64(x), Fp::from_u64(y)).unwrap()
}

fn scalar(k: u64) -> ScalarField<TestCurve> {
    Fp::from_u64(k)
}

/// Textbook affine double-and-add with explicit special cases, used as a reference.
fn naive_mul(base: TestAffine, mut k: u64) -> TestAffine {
    fn naive_add(p: TestAffine, q: TestAffine) -> TestAffine {
        let (Some(x1), Some(y1)) = (p.x(), p.y()) else { return q };
        let (Some(x2), Some(y2)) = (q.x(), q.y()) else { return p };

        let slope = if x1 == x2 {
            if y1 + y2 == Fp::ZERO {
                return TestAffine::IDENTITY;
            }
            (x1.square() * Fp::from_u64(3) + TestCurve::ALPHA) * y1.double().inverse().unwrap()
        } else {
            (y2 - y1) * (x2 - x1).inverse().unwrap()
        };
        let x3 = slope.square() - x1 - x2;
        TestAffine::new_unchecked(x3, slope * (x1 - x3) - y1)
    }

    let mut acc = TestAffine::IDENTITY;
    let mut addend = base;
    while k > 0 {
        if k & 1 == 1 {
            acc = naive_add(acc, addend);
        }
        addend = naive_add(addend, addend);
        k >>= 1;
    }
    acc
}

// GROUP LAW
// ================================================================================================

#[rstest::rstest]
#[case::double(2, (1643, 429))]
#[case::three(3, (5640, 3564))]
#[case::five(5, (4549, 3701))]
#[case::large(1234, (1002, 7726))]
#[case::order_minus_one(TEST_ORDER - 1, (2, 5425))]
fn scalar_multiplication_known_answers(#[case] k: u64, #[case] expected: (u64, u64)) {
    let result = TestProjective::GENERATOR.mul_scalar(&scalar(k)).to_affine();
    assert_eq!(result, point(expected.0, expected.1));
    assert!(result.is_on_curve());
}

#[test]
fn multiplication_by_order_is_identity() {
    let result = TestProjective::GENERATOR.mul_bits(&U256::from_u64(TEST_ORDER), 16);
    assert!(result.is_identity());
    assert!(TestProjective::GENERATOR.mul_scalar(&scalar(TEST_ORDER)).is_identity());
    assert!(TestProjective::GENERATOR.mul_scalar(&scalar(0)).is_identity());
}

#[test]
fn identity_is_neutral() {
    let g = TestProjective::GENERATOR;
    let identity = TestProjective::IDENTITY;
    assert_eq!(g + identity, g);
    assert_eq!(identity + g, g);
    assert!((identity + identity).is_identity());
    assert!(identity.double().is_identity());
    assert_eq!(identity.to_affine(), TestAffine::IDENTITY);
    assert!(identity.is_on_curve());
}

#[test]
fn point_plus_negation_is_identity() {
    let g = TestProjective::GENERATOR;
    assert!((g + -g).is_identity());
    assert!((g - g).is_identity());
    assert_eq!((-TestAffine::GENERATOR).to_projective(), -g);
    assert_eq!(-TestAffine::IDENTITY, TestAffine::IDENTITY);
}

#[test]
fn addition_and_doubling_agree() {
    let g = TestProjective::GENERATOR;
    assert_eq!(g + g, g.double());
    assert_eq!((g.double() + g).to_affine(), point(5640, 3564));

    let three = g * scalar(3);
    let five = g * scalar(5);
    assert_eq!(three + five, g * scalar(8));

    let mut acc = three;
    acc += five;
    acc -= g;
    assert_eq!(acc, g * scalar(7));
}

#[test]
fn projective_equality_ignores_scaling() {
    let g = TestProjective::GENERATOR;
    let lambda = Fp::from_u64(4321);
    let scaled = TestProjective { x: g.x * lambda, y: g.y * lambda, z: g.z * lambda };
    assert_eq!(scaled, g);
    assert_eq!(scaled.to_affine(), TestAffine::GENERATOR);
    assert_ne!(g, g.double());
    assert_ne!(g, TestProjective::IDENTITY);
}

// AFFINE POINTS
// ================================================================================================

#[test]
fn new_rejects_points_off_the_curve() {
    assert_matches!(
        TestAffine::new(Fp::from_u64(2), Fp::from_u64(4583)),
        Err(CurveError::NotOnCurve)
    );
    assert!(TestAffine::new(Fp::from_u64(2), Fp::from_u64(5425)).is_ok());
}

#[test]
fn from_x_recovers_points() {
    let recovered = TestAffine::from_x(Fp::from_u64(2)).unwrap();
    assert_eq!(recovered, TestAffine::GENERATOR);

    let other = TestAffine::from_x(Fp::from_u64(1002)).unwrap();
    let expected = point(1002, 7726);
    assert!(other == expected || other == -expected);

    // 28 is not a square modulo 10007
    assert!(TestAffine::from_x(Fp::ZERO).is_none());
}

#[test]
fn identity_has_no_coordinates() {
    assert!(TestAffine::IDENTITY.x().is_none());
    assert!(TestAffine::IDENTITY.y().is_none());
    assert!(TestAffine::IDENTITY.is_identity());
    assert!(TestAffine::IDENTITY.is_on_curve());
    assert_eq!(TestAffine::GENERATOR.x(), Some(Fp::from_u64(2)));
}

// STARK CURVE
// ================================================================================================

#[test]
fn stark_generator_is_on_curve() {
    assert!(AffinePoint::<StarkCurve>::GENERATOR.is_on_curve());
    assert!(ProjectivePoint::<StarkCurve>::GENERATOR.is_on_curve());
}

#[test]
fn stark_generator_has_curve_order() {
    let generator = ProjectivePoint::<StarkCurve>::GENERATOR;
    assert!(generator.mul_bits(&Scalar::MODULUS, 252).is_identity());
    assert!(!generator.mul_bits(&Scalar::MODULUS.wrapping_sub(&U256::ONE), 252).is_identity());
}

#[test]
fn stark_scalar_multiplication_known_answer() {
    let public = (ProjectivePoint::<StarkCurve>::GENERATOR * Scalar::from_u64(654_321)).to_affine();
    let expected = FieldElement::from_hex_unchecked(
        "0x1c3eb6d67f833a9dac3766b2f22d31299875884f3fc84ebc70c322e8fb18112",
    );
    assert_eq!(public.x(), Some(expected));
    assert!(public.is_on_curve());
}

#[test]
fn stark_from_x_round_trip() {
    let point = (ProjectivePoint::<StarkCurve>::GENERATOR * Scalar::from_u64(77)).to_affine();
    let x = point.x().unwrap();
    let recovered = AffinePoint::<StarkCurve>::from_x(x).unwrap();
    assert!(recovered == point || recovered == -point);
}

// PROPERTY TESTS
// ================================================================================================

proptest! {
    #[test]
    fn scalar_multiplication_matches_affine_reference(k in 0u64..TEST_ORDER) {
        let expected = naive_mul(TestAffine::GENERATOR, k);
        let actual = TestProjective::GENERATOR.mul_scalar(&scalar(k)).to_affine();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn scalar_multiplication_is_linear(a in 0u64..TEST_ORDER, b in 0u64..TEST_ORDER) {
        let g = TestProjective::GENERATOR;
        prop_assert_eq!(g * scalar(a) + g * scalar(b), g * (scalar(a) + scalar(b)));
    }

    #[test]
    fn results_stay_on_curve(a in 0u64..TEST_ORDER, b in 0u64..TEST_ORDER) {
        let p = TestProjective::GENERATOR * scalar(a);
        let q = TestProjective::GENERATOR * scalar(b);
        prop_assert!((p + q).is_on_curve());
        prop_assert!((p + q).to_affine().is_on_curve());
        prop_assert!(p.double().is_on_curve());
    }
}
