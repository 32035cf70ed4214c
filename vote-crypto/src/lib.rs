#![no_std]

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod curve;
pub mod dsa;
pub mod field;
pub mod hash;
pub mod rand;
pub mod utils;
pub mod vote;

// RE-EXPORTS
// ================================================================================================

pub use curve::{AffinePoint, CurveConfig, ProjectivePoint, StarkCurve};
pub use dsa::ecdsa_stark::{KeyPair, PublicKey, SecretKey, Signature, SignatureError};
pub use field::{FieldElement, FieldError, Scalar};
pub use hash::Pedersen;
pub use vote::{VoteError, VoteRecord, VotingInput};

// CONSTANTS
// ================================================================================================

/// Field element representing ZERO in the STARK base field.
pub const ZERO: FieldElement = FieldElement::ZERO;

/// Field element representing ONE in the STARK base field.
pub const ONE: FieldElement = FieldElement::ONE;

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {

    #[test]
    #[should_panic]
    fn debug_assert_is_checked() {
        // enforce the release checks to always have `RUSTFLAGS="-C debug-assertions"`.
        //
        // pedersen input splitting and nonce derivation check their invariants with
        // `debug_assert`, and we want those checks active whenever tests run.
        debug_assert!(false);
    }

    #[test]
    #[should_panic]
    #[allow(arithmetic_overflow)]
    fn overflow_panics_for_test() {
        // overflows might be disabled if tests are performed in release mode. these are critical,
        // mandatory checks as overflows might be attack vectors.
        //
        // to enable overflow checks in release mode, ensure `RUSTFLAGS="-C overflow-checks"`
        let a = 1_u64;
        let b = 64;
        assert_ne!(a << b, 0);
    }
}
