//! PKCS#7 Padding and Unpadding Module
//!
//! This module provides functionality for applying and removing PKCS#7
//! padding to and from byte arrays. PKCS#7 padding, defined in the PKCS#7
//! (Public Key Cryptography Standards #7) standard by RSA Laboratories, is
//! commonly used with block ciphers to bring data to a uniform block size.
//!
//! The scheme appends a run of identical bytes to the end of a data block,
//! each set to the number of padding bytes added. This module implements
//! three functions:
//!
//! - `pkcs7_pad`: Applies PKCS#7 padding to a byte array (`Vec<u8>`),
//!   ensuring that its length is a multiple of a specified block size. If
//!   the input is already block-aligned, a full block of padding is added.
//!
//! - `pkcs7_unpad`: Removes PKCS#7 padding, verifying the consistency of
//!   the trailer before removal. An inconsistent trailer is an error.
//!
//! - `pkcs7_unpad_lenient`: Removes PKCS#7 padding when, and only when, the
//!   trailer is consistent; otherwise the data is left untouched and no
//!   error is reported. Block-cipher decryption uses this variant by
//!   default so that callers cannot be distinguished by padding failures.
//!
//! # Examples
//!
//! ```
//! use soft_twofish::padding::{pkcs7_pad, pkcs7_unpad};
//!
//! let mut data = vec![0x01, 0x02, 0x03];
//! pkcs7_pad(&mut data, 8).expect("Padding failed");
//! assert_eq!(data, vec![0x01, 0x02, 0x03, 0x05, 0x05, 0x05, 0x05, 0x05]);
//!
//! pkcs7_unpad(&mut data, 8).expect("Unpadding failed");
//! assert_eq!(data, vec![0x01, 0x02, 0x03]);
//! ```
//!
//! # Official Standard Reference
//!
//! - The PKCS#7 padding scheme is detailed in "PKCS #7: Cryptographic
//!   Message Syntax Version 1.5", paragraph 10.3. "Content-encryption
//!   process": [https://www.rfc-editor.org/rfc/rfc2315](https://www.rfc-editor.org/rfc/rfc2315).

use crate::error::{Error, Result};

/// Apply PKCS#7 padding to a given byte array, in-place.
///
/// The input is padded so that its length becomes a multiple of
/// `block_size`. The padding bytes all carry the value of the padding
/// length. If the input length is already a multiple of the block size, an
/// entire block of padding is added.
///
/// # Arguments
///
/// * `data` : A mutable reference to the byte array (`Vec<u8>`) to be
///            padded. The data is manipulated directly, in place.
/// * `block_size` : The block size for padding. Must be greater than 0 and
///                  less than 256 so the pad length fits a single byte.
///
/// # Returns
///
/// * `Ok(())` if the padding is successfully applied,
/// * `Err(Error::BadBlockSize)` if the block size is invalid (0 or >= 256).
pub fn pkcs7_pad(data: &mut Vec<u8>, block_size: usize) -> Result<()> {
    if block_size == 0 || block_size >= 256 {
        return Err(Error::BadBlockSize(block_size));
    }

    let padding_size = block_size - (data.len() % block_size);
    let padding_byte = padding_size as u8;

    for _ in 0..padding_size {
        data.push(padding_byte);
    }

    Ok(())
}

/// Remove PKCS#7 padding from a given byte array, in-place (strict).
///
/// Inspects the last byte of the array (the padding length), verifies that
/// the whole trailer is consistent with it, and removes the padding bytes.
///
/// # Arguments
///
/// * `data` : A mutable reference to the byte array (`Vec<u8>`) from which
///            padding is to be removed, in place.
/// * `block_size` : The block size that was used for padding; the padding
///                  length can never exceed it.
///
/// # Returns
///
/// * `Ok(())` if the unpadding is successfully performed,
/// * `Err(Error::BadPadding)` if the data is empty, the padding length is
///   out of range, or the trailer bytes are not all equal to it.
pub fn pkcs7_unpad(data: &mut Vec<u8>, block_size: usize) -> Result<()> {
    let padding_size = match inspect_trailer(data, block_size) {
        Some(n) => n,
        None => return Err(Error::BadPadding),
    };

    data.truncate(data.len() - padding_size);

    Ok(())
}

/// Remove PKCS#7 padding from a given byte array when it is consistent.
///
/// Behaves like [`pkcs7_unpad`] for a well-formed trailer. When the trailer
/// is inconsistent the data is left unchanged and no error is reported, so
/// the caller cannot learn whether padding was present.
///
/// # Arguments
///
/// * `data` : A mutable reference to the byte array (`Vec<u8>`) from which
///            padding is to be removed, in place.
/// * `block_size` : The block size that was used for padding.
pub fn pkcs7_unpad_lenient(data: &mut Vec<u8>, block_size: usize) {
    if let Some(padding_size) = inspect_trailer(data, block_size) {
        data.truncate(data.len() - padding_size);
    }
}

/// Return the padding length when the trailer is a consistent PKCS#7 pad.
fn inspect_trailer(data: &[u8], block_size: usize) -> Option<usize> {
    let padding_size = *data.last()? as usize;

    if padding_size == 0 || padding_size > block_size || padding_size > data.len() {
        return None;
    }

    if data
        .iter()
        .rev()
        .take(padding_size)
        .any(|&x| x as usize != padding_size)
    {
        return None;
    }

    Some(padding_size)
}
