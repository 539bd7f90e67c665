//! Twofish Encryption and Decryption in CBC Mode
//!
//! This module provides functionality for encrypting and decrypting data
//! using Twofish in Cipher Block Chaining (CBC) mode, with optional PKCS#7
//! padding.
//!
//! CBC mode XORs every plaintext block with the previous ciphertext block
//! before encryption, so identical plaintext blocks encrypt differently.
//! The initialization vector (IV) seeds the chain and is carried **inside
//! the ciphertext**: encryption emits the IV as the first 16 bytes of its
//! output and decryption consumes it from there. When no IV is supplied, a
//! fresh one is sampled from the operating system CSPRNG.
//!
//! # Features
//!
//! - `twofish_enc_cbc`: Encrypts data using Twofish in CBC mode. The output
//!   begins with the 16-byte IV, followed by one ciphertext block per
//!   padded plaintext block.
//!
//! - `twofish_dec_cbc`: Decrypts data produced by `twofish_enc_cbc`,
//!   reading the IV from the leading 16 bytes.
//!
//! # Example
//!
//! ```
//! use soft_twofish::twofish::{twofish_enc_cbc, twofish_dec_cbc};
//!
//! let plaintext = b"Example plaintext.";
//! let key = b"Very secret key.";
//!
//! // No IV supplied: a random one is generated and prepended.
//! let encrypted = twofish_enc_cbc(plaintext, key, None, Some("PKCS7")).expect("Encryption failed");
//! let decrypted = twofish_dec_cbc(&encrypted, key, Some("PKCS7")).expect("Decryption failed");
//!
//! assert_eq!(decrypted, plaintext);
//! ```
//!
//! # Disclaimer
//!
//! - CBC mode does not provide authentication or integrity checks; these
//!   must be implemented separately if needed.

use rand::rngs::OsRng;
use rand::RngCore;

use super::twofish_core::*;
use super::twofish_ecb::{pad_plaintext, unpad_plaintext};
use crate::error::{Error, Result};

/// Encrypt data using Twofish in CBC mode with optional padding.
///
/// # Parameters
/// - `plaintext`: The data to encrypt. It must be a multiple of
///                `TWOFISH_BLOCK_SIZE` unless PKCS#7 padding is applied.
/// - `key`: The encryption key (16, 24, or 32 bytes).
/// - `iv`: The initialization vector. Must be 16 bytes when supplied; when
///         `None`, a random IV is drawn from the OS CSPRNG.
/// - `padding`: Optional padding method. Supported values are `None`
///              (default), `PKCS7`, and `PKCS7_STRICT` (identical on
///              encryption).
///
/// # Returns
/// Returns a `Result<Vec<u8>>` containing the IV followed by the encrypted
/// data, or an error.
pub fn twofish_enc_cbc(
    plaintext: &[u8],
    key: &[u8],
    iv: Option<&[u8]>,
    padding: Option<&str>,
) -> Result<Vec<u8>> {
    let cipher = Twofish::new(key)?;

    let iv: [u8; TWOFISH_BLOCK_SIZE] = match iv {
        Some(iv) => iv
            .try_into()
            .map_err(|_| Error::BadIvLength(iv.len()))?,
        None => {
            let mut fresh = [0u8; TWOFISH_BLOCK_SIZE];
            OsRng.fill_bytes(&mut fresh);
            fresh
        }
    };

    let mut data = plaintext.to_vec();
    pad_plaintext(&mut data, padding)?;

    let mut ciphertext = Vec::with_capacity(TWOFISH_BLOCK_SIZE + data.len());
    ciphertext.extend_from_slice(&iv);

    let mut previous_block = iv;

    for block in data.chunks(TWOFISH_BLOCK_SIZE) {
        // XOR current block with previous ciphertext block (or the IV).
        let mut block_array = [0u8; TWOFISH_BLOCK_SIZE];
        block_array.copy_from_slice(block);
        for (b, p) in block_array.iter_mut().zip(previous_block.iter()) {
            *b ^= *p;
        }

        previous_block = cipher.encrypt_block(&block_array)?;
        ciphertext.extend_from_slice(&previous_block);
    }

    Ok(ciphertext)
}

/// Decrypt data using Twofish in CBC mode with optional padding removal.
///
/// The first 16 bytes of `ciphertext` are taken as the IV, as produced by
/// [`twofish_enc_cbc`].
///
/// # Parameters
/// - `ciphertext`: The IV followed by the encrypted data. The total length
///                 must be a positive multiple of `TWOFISH_BLOCK_SIZE`.
/// - `key`: The decryption key.
/// - `padding`: Optional padding method used during encryption. Supported
///              values are `None` (default), `PKCS7` (lenient removal), and
///              `PKCS7_STRICT` (inconsistent trailers are an error).
///
/// # Returns
/// Returns a `Result<Vec<u8>>` containing the decrypted data or an error.
pub fn twofish_dec_cbc(ciphertext: &[u8], key: &[u8], padding: Option<&str>) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % TWOFISH_BLOCK_SIZE != 0 {
        return Err(Error::BadCiphertextLength(ciphertext.len()));
    }

    let cipher = Twofish::new(key)?;

    let (iv, body) = ciphertext.split_at(TWOFISH_BLOCK_SIZE);

    let mut plaintext = Vec::with_capacity(body.len());
    let mut previous_block = iv;

    for block in body.chunks(TWOFISH_BLOCK_SIZE) {
        let mut decrypted_block = cipher.decrypt_block(block)?;
        // XOR decrypted block with previous ciphertext block (or the IV).
        for (b, p) in decrypted_block.iter_mut().zip(previous_block.iter()) {
            *b ^= *p;
        }

        plaintext.extend_from_slice(&decrypted_block);
        previous_block = block;
    }

    unpad_plaintext(&mut plaintext, padding)?;

    Ok(plaintext)
}
