use num_bigint::BigUint;

use super::super::multipower::*;
use crate::error::Error;

#[test]
fn test_rsa_round_trip_1024_b2() {
    let mut rsa = MultiPowerRsa::new(1024, 2);
    let (pk, sk) = rsa.generate_keys().expect("Key generation failed");

    assert_eq!(pk.n, &sk.p * &sk.q, "N = p * q for b = 2");

    let ciphertext = rsa
        .encrypt(Message::from(12345678u64), None)
        .expect("Encryption failed");
    let decrypted = rsa.decrypt(&ciphertext, None).expect("Decryption failed");

    assert_eq!(decrypted, BigUint::from(12345678u64));
}

#[test]
fn test_rsa_round_trip_for_each_power() {
    // Hensel-lift correctness across the supported power parameters:
    // decrypt(encrypt(m)) = m is exactly m^(e*d) = m (mod N).
    for b in [2u32, 3, 4] {
        let mut rsa = MultiPowerRsa::new(512, b);
        let (pk, sk) = rsa.generate_keys().expect("Key generation failed");

        assert_eq!(sk.b, b);
        assert_ne!(sk.p, sk.q);

        // A deterministic message well below any 512-bit modulus.
        let m = BigUint::from(0xDEAD_BEEF_CAFE_F00Du64);
        let ciphertext = rsa
            .encrypt(Message::Integer(m.clone()), Some(&pk))
            .expect("Encryption failed");
        let decrypted = rsa
            .decrypt(&ciphertext, Some(&sk))
            .expect("Decryption failed");

        assert_eq!(decrypted, m, "Round trip failed for b = {b}");
    }
}

#[test]
fn test_modulus_bit_length_close_to_requested() {
    for (key_size, b) in [(512u64, 2u32), (512, 3), (768, 3)] {
        let mut rsa = MultiPowerRsa::new(key_size, b);
        let (pk, _) = rsa.generate_keys().expect("Key generation failed");

        let bits = pk.n.bits();
        assert!(
            bits >= key_size - 8 && bits <= key_size + 8,
            "Modulus of {bits} bits is too far from the requested {key_size}"
        );
    }
}

#[test]
fn test_message_variants_reduce_canonically() {
    assert_eq!(
        Message::from(258u64).to_uint(),
        BigUint::from(258u32)
    );
    // Bytes are big-endian: [0x01, 0x02] = 258.
    assert_eq!(
        Message::Bytes(vec![0x01, 0x02]).to_uint(),
        BigUint::from(258u32)
    );
    // Text is UTF-8 encoded, then treated as bytes: "A" = 0x41.
    assert_eq!(Message::from("A").to_uint(), BigUint::from(0x41u32));
    assert_eq!(
        Message::from("A").to_uint(),
        Message::Bytes(b"A".to_vec()).to_uint()
    );
}

#[test]
fn test_text_and_bytes_messages_round_trip() {
    let mut rsa = MultiPowerRsa::new(512, 3);
    rsa.generate_keys().expect("Key generation failed");

    let ciphertext = rsa
        .encrypt(Message::from("short secret"), None)
        .expect("Encryption failed");
    let decrypted = rsa
        .decrypt_to_bytes(&ciphertext, None)
        .expect("Decryption failed");

    assert_eq!(decrypted, b"short secret".to_vec());
}

#[test]
fn test_encrypt_rejects_oversized_message() {
    let mut rsa = MultiPowerRsa::new(512, 2);
    let (pk, _) = rsa.generate_keys().expect("Key generation failed");

    let result = rsa.encrypt(Message::Integer(pk.n.clone()), None);
    assert_eq!(result, Err(Error::MessageTooLarge));

    let result = rsa.encrypt(Message::Integer(&pk.n + 1u32), None);
    assert_eq!(result, Err(Error::MessageTooLarge));
}

#[test]
fn test_small_messages_round_trip() {
    let mut rsa = MultiPowerRsa::new(512, 3);
    rsa.generate_keys().expect("Key generation failed");

    for m in [0u64, 1, 2] {
        let ciphertext = rsa.encrypt(Message::from(m), None).expect("Encryption failed");
        let decrypted = rsa.decrypt(&ciphertext, None).expect("Decryption failed");
        assert_eq!(decrypted, BigUint::from(m));
    }
}

#[test]
fn test_decrypt_rejects_malformed_ciphertext() {
    let mut rsa = MultiPowerRsa::new(512, 2);
    let (pk, _) = rsa.generate_keys().expect("Key generation failed");

    assert_eq!(
        rsa.decrypt("not a number", None),
        Err(Error::InvalidCiphertext)
    );
    assert_eq!(rsa.decrypt("-5", None), Err(Error::InvalidCiphertext));

    // In range only below N.
    let too_large = pk.n.to_str_radix(10);
    assert_eq!(rsa.decrypt(&too_large, None), Err(Error::InvalidCiphertext));
}

#[test]
fn test_operations_without_keys_report_no_key() {
    let rsa = MultiPowerRsa::new(512, 3);

    assert_eq!(
        rsa.encrypt(Message::from(42u64), None),
        Err(Error::NoKey)
    );
    assert_eq!(rsa.decrypt("42", None), Err(Error::NoKey));
}

#[test]
fn test_explicit_keys_override_stored_keys() {
    let mut first = MultiPowerRsa::new(512, 2);
    let (pk_first, sk_first) = first.generate_keys().expect("Key generation failed");

    let mut second = MultiPowerRsa::new(512, 2);
    second.generate_keys().expect("Key generation failed");

    // Encrypt under the first key pair through the second instance.
    let ciphertext = second
        .encrypt(Message::from(777u64), Some(&pk_first))
        .expect("Encryption failed");
    let decrypted = second
        .decrypt(&ciphertext, Some(&sk_first))
        .expect("Decryption failed");

    assert_eq!(decrypted, BigUint::from(777u64));
}

#[test]
fn test_key_generation_rejects_bad_power() {
    let mut rsa = MultiPowerRsa::new(512, 1);
    assert_eq!(rsa.generate_keys(), Err(Error::KeyGenerationFailed));
}

#[test]
fn test_private_key_exponents_are_reduced() {
    let mut rsa = MultiPowerRsa::new(512, 3);
    let (_, sk) = rsa.generate_keys().expect("Key generation failed");

    assert_eq!(sk.d_p, &sk.d % (&sk.p - 1u32));
    assert_eq!(sk.d_q, &sk.d % (&sk.q - 1u32));
}

#[test]
fn test_key_wire_format_round_trip() {
    let mut rsa = MultiPowerRsa::new(512, 3);
    let (pk, sk) = rsa.generate_keys().expect("Key generation failed");

    let pk_json = serde_json::to_string(&pk).expect("Public key serialization failed");
    let sk_json = serde_json::to_string(&sk).expect("Private key serialization failed");

    // Integers travel as decimal-digit strings.
    let value: serde_json::Value = serde_json::from_str(&pk_json).unwrap();
    assert!(value["n"].is_string());
    assert_eq!(value["e"], "65537");

    let pk_back: PublicKey = serde_json::from_str(&pk_json).unwrap();
    let sk_back: PrivateKey = serde_json::from_str(&sk_json).unwrap();
    assert_eq!(pk_back, pk);
    assert_eq!(sk_back, sk);
}

#[test]
fn test_uint_bytes_helpers() {
    let value = bytes_to_uint(&[0x01, 0x00]);
    assert_eq!(value, BigUint::from(256u32));

    assert_eq!(uint_to_bytes(&value, None), Some(vec![0x01, 0x00]));
    assert_eq!(
        uint_to_bytes(&value, Some(4)),
        Some(vec![0x00, 0x00, 0x01, 0x00]),
        "Left padding must restore dropped leading zeros"
    );
    assert_eq!(uint_to_bytes(&value, Some(1)), None, "Value does not fit");
}
