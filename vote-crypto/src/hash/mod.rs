//! Cryptographic hash functions over the STARK field.

pub mod pedersen;
pub use pedersen::{Pedersen, PedersenParams, STARK_PEDERSEN_PARAMS};
