//! Mode dispatch by identifier string.
//!
//! The wire peers of this library select the block-cipher mode with a
//! case-insensitive string (`"ecb"` or `"cbc"`). These functions map the
//! identifier onto the per-mode drivers; an unknown identifier is a hard
//! error rather than a silent no-op.

use super::twofish_cbc::{twofish_dec_cbc, twofish_enc_cbc};
use super::twofish_ecb::{twofish_dec_ecb, twofish_enc_ecb};
use crate::error::{Error, Result};

/// Encrypt data with the mode selected by identifier string.
///
/// # Parameters
/// - `plaintext`: The data to encrypt.
/// - `key`: The encryption key (16, 24, or 32 bytes).
/// - `mode`: `"ecb"` or `"cbc"`, case-insensitive.
/// - `iv`: Optional initialization vector; only meaningful for CBC, where a
///         random one is generated when absent. Ignored by ECB.
/// - `padding`: Optional padding method, as for the per-mode drivers.
///
/// # Returns
/// Returns a `Result<Vec<u8>>` containing the encrypted data or an error.
pub fn twofish_encrypt(
    plaintext: &[u8],
    key: &[u8],
    mode: &str,
    iv: Option<&[u8]>,
    padding: Option<&str>,
) -> Result<Vec<u8>> {
    match mode.to_ascii_lowercase().as_str() {
        "ecb" => twofish_enc_ecb(plaintext, key, padding),
        "cbc" => twofish_enc_cbc(plaintext, key, iv, padding),
        other => Err(Error::UnsupportedMode(other.to_string())),
    }
}

/// Decrypt data with the mode selected by identifier string.
///
/// For CBC the IV is read from the first 16 bytes of the ciphertext, so no
/// IV parameter exists on the decryption path.
///
/// # Parameters
/// - `ciphertext`: The encrypted data; a positive multiple of 16 bytes.
/// - `key`: The decryption key.
/// - `mode`: `"ecb"` or `"cbc"`, case-insensitive.
/// - `padding`: Optional padding method used during encryption.
///
/// # Returns
/// Returns a `Result<Vec<u8>>` containing the decrypted data or an error.
pub fn twofish_decrypt(
    ciphertext: &[u8],
    key: &[u8],
    mode: &str,
    padding: Option<&str>,
) -> Result<Vec<u8>> {
    match mode.to_ascii_lowercase().as_str() {
        "ecb" => twofish_dec_ecb(ciphertext, key, padding),
        "cbc" => twofish_dec_cbc(ciphertext, key, padding),
        other => Err(Error::UnsupportedMode(other.to_string())),
    }
}
