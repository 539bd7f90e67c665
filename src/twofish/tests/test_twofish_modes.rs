use super::super::twofish_modes::*;
use crate::error::Error;

const KEY: &[u8; 16] = b"0123456789abcdef";

#[test]
fn test_mode_dispatch_ecb_round_trip() {
    let plaintext = b"dispatch through the string API";

    let ciphertext = twofish_encrypt(plaintext, KEY, "ecb", None, Some("PKCS7"))
        .expect("Encryption failed");
    let decrypted =
        twofish_decrypt(&ciphertext, KEY, "ecb", Some("PKCS7")).expect("Decryption failed");

    assert_eq!(decrypted, plaintext.to_vec());
}

#[test]
fn test_mode_dispatch_cbc_round_trip() {
    let plaintext = b"dispatch through the string API";
    let iv = [0x24u8; 16];

    let ciphertext = twofish_encrypt(plaintext, KEY, "cbc", Some(&iv), Some("PKCS7"))
        .expect("Encryption failed");
    let decrypted =
        twofish_decrypt(&ciphertext, KEY, "cbc", Some("PKCS7")).expect("Decryption failed");

    assert_eq!(decrypted, plaintext.to_vec());
}

#[test]
fn test_mode_identifiers_are_case_insensitive() {
    let plaintext = b"MiXeD cAsE";
    let iv = [0u8; 16];

    let lower = twofish_encrypt(plaintext, KEY, "cbc", Some(&iv), Some("PKCS7")).unwrap();
    let upper = twofish_encrypt(plaintext, KEY, "CBC", Some(&iv), Some("PKCS7")).unwrap();
    assert_eq!(lower, upper);

    let decrypted = twofish_decrypt(&upper, KEY, "Cbc", Some("PKCS7")).unwrap();
    assert_eq!(decrypted, plaintext.to_vec());
}

#[test]
fn test_unknown_mode_is_an_error() {
    assert_eq!(
        twofish_encrypt(b"data", KEY, "ctr", None, None),
        Err(Error::UnsupportedMode("ctr".to_string()))
    );
    assert_eq!(
        twofish_decrypt(&[0u8; 16], KEY, "gcm", None),
        Err(Error::UnsupportedMode("gcm".to_string()))
    );
}
