#![no_main]

use libfuzzer_sys::fuzz_target;
use vote_crypto::{
    FieldElement, KeyPair, Scalar, Signature,
    dsa::ecdsa_stark::{sign_with_nonce, verify_with_x},
};

fuzz_target!(|data: &[u8]| {
    // Split input data: a 32-byte message, a 32-byte public x-coordinate, a 64-byte signature
    let mut buffer = [0u8; 128];
    let len = data.len().min(buffer.len());
    buffer[..len].copy_from_slice(&data[..len]);

    let (message, rest) = buffer.split_at(32);
    let (public_x, signature) = rest.split_at(32);
    let message = FieldElement::from_bytes(message.try_into().unwrap());
    let public_x = FieldElement::from_bytes(public_x.try_into().unwrap());

    // Verification of arbitrary data must return false rather than panic
    if let Some(signature) = Signature::from_bytes(signature.try_into().unwrap()) {
        let _ = verify_with_x(message, &signature, public_x);
    }

    // Signing with arbitrary keys and nonces either fails cleanly or verifies
    let private = Scalar::from_bytes(rest[..32].try_into().unwrap());
    let nonce = Scalar::from_bytes(rest[32..64].try_into().unwrap());
    if let Ok(signature) = sign_with_nonce(message, &private, &nonce) {
        let key_pair = KeyPair::derive(private);
        assert!(key_pair.public_key().verify(message, &signature));
    }
});
