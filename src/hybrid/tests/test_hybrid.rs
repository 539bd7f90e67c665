use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use super::super::cryptosystem::*;
use super::super::envelope::*;
use crate::error::Error;

#[test]
fn test_hybrid_round_trip_2048_b3() {
    let mut hybrid = HybridCryptosystem::new();
    hybrid.generate_keys(2048, 3).expect("Key generation failed");

    let mut plaintext = vec![0u8; 10_240];
    OsRng.fill_bytes(&mut plaintext);

    let envelope = hybrid.encrypt(&plaintext, None).expect("Encryption failed");

    // The envelope survives its JSON wire form with all mandated fields.
    let json = envelope.to_json().expect("Serialization failed");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for field in ["algorithm", "ciphertext", "iv", "encrypted_key"] {
        assert!(value[field].is_string(), "Envelope is missing {field}");
    }

    let reparsed = Envelope::from_json(&json).expect("Deserialization failed");
    let decrypted = hybrid.decrypt(&reparsed, None).expect("Decryption failed");

    assert_eq!(decrypted, plaintext, "Hybrid round trip must be lossless");
}

#[test]
fn test_hybrid_round_trip_small_plaintexts() {
    let mut hybrid = HybridCryptosystem::new();
    hybrid.generate_keys(1024, 2).expect("Key generation failed");

    for plaintext in [&b""[..], b"x", b"exactly 16 bytes"] {
        let envelope = hybrid.encrypt(plaintext, None).expect("Encryption failed");
        let decrypted = hybrid.decrypt(&envelope, None).expect("Decryption failed");
        assert_eq!(
            decrypted,
            plaintext.to_vec(),
            "Round trip failed for {}-byte plaintext",
            plaintext.len()
        );
    }
}

#[test]
fn test_hybrid_encryptions_are_randomized() {
    let mut hybrid = HybridCryptosystem::new();
    hybrid.generate_keys(1024, 2).expect("Key generation failed");

    let first = hybrid.encrypt(b"same message", None).expect("Encryption failed");
    let second = hybrid.encrypt(b"same message", None).expect("Encryption failed");

    // Fresh symmetric key and IV per call.
    assert_ne!(first.ciphertext, second.ciphertext);
    assert_ne!(first.iv, second.iv);
    assert_ne!(first.encrypted_key, second.encrypted_key);
}

#[test]
fn test_hybrid_encrypt_requires_a_key() {
    let hybrid = HybridCryptosystem::new();
    assert_eq!(hybrid.encrypt(b"data", None), Err(Error::NoKey));
}

#[test]
fn test_hybrid_decrypt_rejects_wrong_algorithm_tag() {
    let mut hybrid = HybridCryptosystem::new();
    hybrid.generate_keys(1024, 2).expect("Key generation failed");

    let mut envelope = hybrid.encrypt(b"data", None).expect("Encryption failed");
    envelope.algorithm = "AES-RSA".to_string();

    assert_eq!(
        hybrid.decrypt(&envelope, None),
        Err(Error::EnvelopeSchema("unsupported algorithm tag"))
    );
}

#[test]
fn test_hybrid_decrypt_rejects_malformed_base64() {
    let mut hybrid = HybridCryptosystem::new();
    hybrid.generate_keys(1024, 2).expect("Key generation failed");

    let envelope = hybrid.encrypt(b"data", None).expect("Encryption failed");

    let mut bad_iv = envelope.clone();
    bad_iv.iv = "@@not base64@@".to_string();
    assert!(matches!(
        hybrid.decrypt(&bad_iv, None),
        Err(Error::EnvelopeSchema(_))
    ));

    let mut bad_body = envelope;
    bad_body.ciphertext = "@@not base64@@".to_string();
    assert!(matches!(
        hybrid.decrypt(&bad_body, None),
        Err(Error::EnvelopeSchema(_))
    ));
}

#[test]
fn test_hybrid_tampered_body_decrypts_to_garbage() {
    // Without a MAC the envelope is unauthenticated: flipping a body byte
    // must not be detected, only produce wrong plaintext.
    let mut hybrid = HybridCryptosystem::new();
    hybrid.generate_keys(1024, 2).expect("Key generation failed");

    let plaintext = [0x77u8; 64];
    let envelope = hybrid.encrypt(&plaintext, None).expect("Encryption failed");

    let mut body = BASE64.decode(&envelope.ciphertext).unwrap();
    body[0] ^= 0x01;

    let mut tampered = envelope;
    tampered.ciphertext = BASE64.encode(&body);

    let decrypted = hybrid.decrypt(&tampered, None).expect("Decryption failed");
    assert_ne!(decrypted, plaintext.to_vec());
}

#[test]
fn test_hybrid_mac_detects_tampering() {
    let mut hybrid = HybridCryptosystem::new();
    hybrid.generate_keys(1024, 2).expect("Key generation failed");

    let envelope = hybrid
        .encrypt_with_mac(b"authenticated payload", None)
        .expect("Encryption failed");
    assert!(envelope.mac.is_some(), "MAC field must be present");

    // Untampered envelopes verify and decrypt.
    let decrypted = hybrid.decrypt(&envelope, None).expect("Decryption failed");
    assert_eq!(decrypted, b"authenticated payload".to_vec());

    // A flipped body byte is rejected before decryption.
    let mut body = BASE64.decode(&envelope.ciphertext).unwrap();
    body[0] ^= 0x01;

    let mut tampered = envelope;
    tampered.ciphertext = BASE64.encode(&body);

    assert_eq!(hybrid.decrypt(&tampered, None), Err(Error::MacMismatch));
}

#[test]
fn test_hybrid_keys_are_reusable_and_overridable() {
    let mut alice = HybridCryptosystem::new();
    let (alice_pk, alice_sk) = alice.generate_keys(1024, 2).expect("Key generation failed");

    // A keyless instance can still seal to Alice with her public key.
    let sender = HybridCryptosystem::new();
    let envelope = sender
        .encrypt(b"for alice", Some(&alice_pk))
        .expect("Encryption failed");

    let decrypted = alice.decrypt(&envelope, Some(&alice_sk)).expect("Decryption failed");
    assert_eq!(decrypted, b"for alice".to_vec());

    // The stored keys keep working across operations.
    for _ in 0..3 {
        let envelope = alice.encrypt(b"again", None).expect("Encryption failed");
        assert_eq!(alice.decrypt(&envelope, None).unwrap(), b"again".to_vec());
    }
}
