//! Twofish Encryption and Decryption in ECB Mode
//!
//! This module provides functionality for encrypting and decrypting data
//! using Twofish in Electronic Codebook (ECB) mode, with optional PKCS#7
//! padding to accommodate data that does not align with the block size.
//!
//! ECB mode operates on fixed-size blocks independently and is one of the
//! simplest encryption modes. It is not recommended for large volumes of
//! data or data with patterns, since identical plaintext blocks encrypt to
//! identical ciphertext blocks, but it remains useful for certain
//! applications.
//!
//! # Features
//!
//! - `twofish_enc_ecb`: Encrypts data using Twofish in ECB mode with
//!   optional PKCS#7 padding.
//!
//! - `twofish_dec_ecb`: Decrypts data that was encrypted in ECB mode, with
//!   optional padding removal. `"PKCS7"` strips the trailer leniently
//!   (inconsistent padding is left in place, matching the behavior of the
//!   `"cbc"`/`"ecb"` wire peers this library interoperates with), while
//!   `"PKCS7_STRICT"` reports [`Error::BadPadding`](crate::Error::BadPadding)
//!   instead.
//!
//! # Example
//!
//! ```
//! use soft_twofish::twofish::{twofish_enc_ecb, twofish_dec_ecb};
//!
//! let plaintext = b"Example plaintext.";
//! let key = b"Very secret key.";
//!
//! let encrypted = twofish_enc_ecb(plaintext, key, Some("PKCS7")).expect("Encryption failed");
//! let decrypted = twofish_dec_ecb(&encrypted, key, Some("PKCS7")).expect("Decryption failed");
//!
//! assert_eq!(decrypted, plaintext);
//! ```

use super::twofish_core::*;
use crate::error::{Error, Result};
use crate::padding::{pkcs7_pad, pkcs7_unpad, pkcs7_unpad_lenient};

/// Apply the requested padding scheme before encryption.
pub(super) fn pad_plaintext(data: &mut Vec<u8>, padding: Option<&str>) -> Result<()> {
    match padding {
        Some("PKCS7") | Some("PKCS7_STRICT") => pkcs7_pad(data, TWOFISH_BLOCK_SIZE),
        None if data.len() % TWOFISH_BLOCK_SIZE != 0 => Err(Error::BadBlockSize(data.len())),
        None => Ok(()),
        Some(other) => Err(Error::UnsupportedPadding(other.to_string())),
    }
}

/// Strip the requested padding scheme after decryption.
pub(super) fn unpad_plaintext(data: &mut Vec<u8>, padding: Option<&str>) -> Result<()> {
    match padding {
        Some("PKCS7") => {
            pkcs7_unpad_lenient(data, TWOFISH_BLOCK_SIZE);
            Ok(())
        }
        Some("PKCS7_STRICT") => pkcs7_unpad(data, TWOFISH_BLOCK_SIZE),
        None => Ok(()),
        Some(other) => Err(Error::UnsupportedPadding(other.to_string())),
    }
}

/// Encrypt data using Twofish in ECB mode with optional padding.
///
/// # Parameters
/// - `plaintext`: The data to encrypt. It must be a multiple of
///                `TWOFISH_BLOCK_SIZE` unless PKCS#7 padding is applied.
/// - `key`: The encryption key (16, 24, or 32 bytes).
/// - `padding`: Optional padding method. Supported values are `None`
///              (default), `PKCS7`, and `PKCS7_STRICT` (identical on
///              encryption).
///
/// # Returns
/// Returns a `Result<Vec<u8>>` containing the encrypted data or an error.
pub fn twofish_enc_ecb(plaintext: &[u8], key: &[u8], padding: Option<&str>) -> Result<Vec<u8>> {
    let cipher = Twofish::new(key)?;

    let mut data = plaintext.to_vec();
    pad_plaintext(&mut data, padding)?;

    let mut ciphertext = Vec::with_capacity(data.len());

    // Encrypt each block independently.
    for block in data.chunks(TWOFISH_BLOCK_SIZE) {
        let encrypted_block = cipher.encrypt_block(block)?;
        ciphertext.extend_from_slice(&encrypted_block);
    }

    Ok(ciphertext)
}

/// Decrypt data using Twofish in ECB mode with optional padding removal.
///
/// # Parameters
/// - `ciphertext`: The encrypted data to decrypt. Its length must be a
///                 positive multiple of `TWOFISH_BLOCK_SIZE`.
/// - `key`: The decryption key.
/// - `padding`: Optional padding method used during encryption. Supported
///              values are `None` (default), `PKCS7` (lenient removal), and
///              `PKCS7_STRICT` (inconsistent trailers are an error).
///
/// # Returns
/// Returns a `Result<Vec<u8>>` containing the decrypted data or an error.
pub fn twofish_dec_ecb(ciphertext: &[u8], key: &[u8], padding: Option<&str>) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % TWOFISH_BLOCK_SIZE != 0 {
        return Err(Error::BadCiphertextLength(ciphertext.len()));
    }

    let cipher = Twofish::new(key)?;

    let mut plaintext = Vec::with_capacity(ciphertext.len());

    for block in ciphertext.chunks(TWOFISH_BLOCK_SIZE) {
        let decrypted_block = cipher.decrypt_block(block)?;
        plaintext.extend_from_slice(&decrypted_block);
    }

    unpad_plaintext(&mut plaintext, padding)?;

    Ok(plaintext)
}
