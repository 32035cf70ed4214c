#![no_main]

use libfuzzer_sys::fuzz_target;
use vote_crypto::{FieldElement, Scalar, Signature, VotingInput, utils::hex_to_u256};

fuzz_target!(|data: &[u8]| {
    // Fixed-width decoding: canonical values must round trip
    if let Ok(bytes) = <[u8; 32]>::try_from(&data[..data.len().min(32)]) {
        if let Some(value) = FieldElement::from_bytes_canonical(&bytes) {
            assert_eq!(value.to_bytes(), bytes);
        }
        let _ = Scalar::from_bytes(&bytes);
    }
    if let Ok(bytes) = <[u8; 64]>::try_from(&data[..data.len().min(64)]) {
        if let Some(signature) = Signature::from_bytes(&bytes) {
            assert_eq!(signature.to_bytes(), bytes);
        }
    }

    // Textual decoding should never panic on arbitrary input
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let _ = hex_to_u256(text);
    if let Ok(value) = FieldElement::from_hex_canonical(text) {
        assert_eq!(FieldElement::from_hex(&value.to_hex()), Ok(value));
    }
    let _ = text.parse::<Scalar>();
    let _ = Signature::from_hex(text);
    let _ = serde_json::from_str::<VotingInput>(text);
});
