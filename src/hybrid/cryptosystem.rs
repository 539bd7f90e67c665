//! Hybrid Cryptosystem combining Twofish and Multi-Power RSA
//!
//! This module provides the hybrid envelope protocol: every message is
//! encrypted under a fresh 256-bit Twofish key in CBC mode, and that key is
//! wrapped under the recipient's Multi-Power RSA public key. The result is
//! an [`Envelope`] carrying the algorithm tag, the IV, the CBC body, and
//! the wrapped key.
//!
//! # Features
//!
//! - `generate_keys`: Produce the RSA key pair the envelopes are wrapped
//!   under.
//! - `encrypt` / `encrypt_with_mac`: Build an envelope for a plaintext;
//!   the latter additionally authenticates the body with HMAC-SHA256 keyed
//!   by the symmetric key.
//! - `decrypt`: Validate an envelope, unwrap the symmetric key, and
//!   recover the plaintext.
//!
//! Keys may be generated once and reused across any number of envelope
//! operations; each operation draws a fresh symmetric key and IV. The
//! symmetric key lives in a zeroizing buffer and is wiped before the
//! operation returns.
//!
//! # Example
//!
//! ```no_run
//! use soft_twofish::hybrid::HybridCryptosystem;
//!
//! let mut hybrid = HybridCryptosystem::new();
//! hybrid.generate_keys(2048, 3).expect("Key generation failed");
//!
//! let envelope = hybrid.encrypt(b"attack at dawn", None).expect("Encryption failed");
//! let plaintext = hybrid.decrypt(&envelope, None).expect("Decryption failed");
//!
//! assert_eq!(plaintext, b"attack at dawn");
//! ```
//!
//! # Disclaimer
//!
//! - Without the MAC field the envelope is unauthenticated: an attacker
//!   can flip ciphertext bits undetected. Use `encrypt_with_mac` unless
//!   wire compatibility with MAC-unaware peers is required.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::envelope::{Envelope, ENVELOPE_ALGORITHM};
use crate::error::{Error, Result};
use crate::rsa::{Message, MultiPowerRsa, PrivateKey, PublicKey};
use crate::twofish::{twofish_dec_cbc, twofish_enc_cbc, TWOFISH_BLOCK_SIZE};

type HmacSha256 = Hmac<Sha256>;

// Wrapped symmetric keys are always 256-bit.
const SYMMETRIC_KEY_SIZE: usize = 32;

/// A hybrid cryptosystem instance holding the RSA key state.
#[derive(Clone, Debug, Default)]
pub struct HybridCryptosystem {
    rsa: MultiPowerRsa,
}

impl HybridCryptosystem {
    /// Create an instance with no keys loaded.
    ///
    /// Envelope operations return [`Error::NoKey`](crate::Error::NoKey)
    /// until keys are generated or passed explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the RSA key pair used for key wrapping.
    ///
    /// # Parameters
    ///
    /// * `rsa_key_size`: Modulus size in bits.
    /// * `b`: Multi-Power RSA power parameter (modulus `p^(b-1) * q`).
    ///
    /// # Returns
    ///
    /// Copies of the generated pair; the instance keeps its own.
    pub fn generate_keys(&mut self, rsa_key_size: u64, b: u32) -> Result<(PublicKey, PrivateKey)> {
        self.rsa = MultiPowerRsa::new(rsa_key_size, b);
        self.rsa.generate_keys()
    }

    /// The stored public key, when present.
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.rsa.public_key.as_ref()
    }

    /// The stored private key, when present.
    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.rsa.private_key.as_ref()
    }

    /// Encrypt a plaintext into an envelope.
    ///
    /// A fresh 256-bit symmetric key and a fresh 16-byte IV are drawn from
    /// the OS CSPRNG for every call. The plaintext is CBC-encrypted with
    /// PKCS#7 padding, the IV is split off the mode output into its own
    /// envelope field, and the symmetric key is wrapped under the public
    /// key.
    ///
    /// # Parameters
    ///
    /// * `plaintext`: The message bytes.
    /// * `public_key`: Key to wrap under for this call; falls back to the
    ///   stored public key when `None`.
    ///
    /// # Returns
    ///
    /// * `Ok(Envelope)` - The sealed envelope, MAC field absent.
    /// * `Err(Error::NoKey)` - If no public key is available.
    pub fn encrypt(&self, plaintext: &[u8], public_key: Option<&PublicKey>) -> Result<Envelope> {
        self.seal(plaintext, public_key, false)
    }

    /// Encrypt a plaintext into an envelope with an authentication tag.
    ///
    /// Identical to [`HybridCryptosystem::encrypt`], but the envelope also
    /// carries an HMAC-SHA256 over the body, keyed with the symmetric key.
    /// Decryption rejects envelopes whose tag does not match.
    pub fn encrypt_with_mac(
        &self,
        plaintext: &[u8],
        public_key: Option<&PublicKey>,
    ) -> Result<Envelope> {
        self.seal(plaintext, public_key, true)
    }

    fn seal(
        &self,
        plaintext: &[u8],
        public_key: Option<&PublicKey>,
        with_mac: bool,
    ) -> Result<Envelope> {
        let mut symmetric_key = Zeroizing::new([0u8; SYMMETRIC_KEY_SIZE]);
        OsRng.fill_bytes(&mut *symmetric_key);

        let mut iv = [0u8; TWOFISH_BLOCK_SIZE];
        OsRng.fill_bytes(&mut iv);

        // The mode output starts with the IV; the envelope carries the IV
        // in its own field, so only the body goes into `ciphertext`.
        let ct_full = twofish_enc_cbc(plaintext, &*symmetric_key, Some(&iv), Some("PKCS7"))?;
        let body = &ct_full[TWOFISH_BLOCK_SIZE..];

        let wrapped_key = self.rsa.encrypt(
            Message::Integer(BigUint::from_bytes_be(&*symmetric_key)),
            public_key,
        )?;

        let mac = with_mac.then(|| BASE64.encode(compute_mac(&*symmetric_key, body)));

        Ok(Envelope {
            algorithm: ENVELOPE_ALGORITHM.to_string(),
            ciphertext: BASE64.encode(body),
            iv: BASE64.encode(iv),
            encrypted_key: wrapped_key,
            mac,
        })
    }

    /// Decrypt an envelope back to its plaintext.
    ///
    /// The algorithm tag and field encodings are validated, the symmetric
    /// key is unwrapped and left-padded back to exactly 32 bytes (the wrap
    /// loses leading zero bytes), the MAC is verified when present, and
    /// the body is CBC-decrypted with lenient PKCS#7 removal.
    ///
    /// # Parameters
    ///
    /// * `envelope`: The envelope to open.
    /// * `private_key`: Key to unwrap with for this call; falls back to the
    ///   stored private key when `None`.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The recovered plaintext.
    /// * `Err(Error::EnvelopeSchema)` - Wrong algorithm tag or malformed
    ///   field encoding.
    /// * `Err(Error::MacMismatch)` - A MAC field is present and does not
    ///   match the body.
    /// * `Err(Error::NoKey)` - If no private key is available.
    pub fn decrypt(&self, envelope: &Envelope, private_key: Option<&PrivateKey>) -> Result<Vec<u8>> {
        if envelope.algorithm != ENVELOPE_ALGORITHM {
            return Err(Error::EnvelopeSchema("unsupported algorithm tag"));
        }

        let iv = envelope.decode_iv()?;
        let body = envelope.decode_body()?;
        let mac = envelope.decode_mac()?;

        let key_int = self.rsa.decrypt(&envelope.encrypted_key, private_key)?;
        let key_bytes = key_int.to_bytes_be();
        if key_bytes.len() > SYMMETRIC_KEY_SIZE {
            return Err(Error::BadKeyLength(key_bytes.len()));
        }

        // Restore the leading zero bytes the integer form dropped.
        let mut symmetric_key = Zeroizing::new([0u8; SYMMETRIC_KEY_SIZE]);
        symmetric_key[SYMMETRIC_KEY_SIZE - key_bytes.len()..].copy_from_slice(&key_bytes);

        if let Some(expected) = mac {
            verify_mac(&*symmetric_key, &body, &expected)?;
        }

        let mut ct_full = Vec::with_capacity(TWOFISH_BLOCK_SIZE + body.len());
        ct_full.extend_from_slice(&iv);
        ct_full.extend_from_slice(&body);

        twofish_dec_cbc(&ct_full, &*symmetric_key, Some("PKCS7"))
    }
}

/// HMAC-SHA256 over the body, keyed with the symmetric key.
fn compute_mac(key: &[u8], body: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(body);
    mac.finalize().into_bytes().to_vec()
}

/// Verify the expected tag against the body, in constant time.
fn verify_mac(key: &[u8], body: &[u8], expected: &[u8]) -> Result<()> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(body);
    mac.verify_slice(expected).map_err(|_| Error::MacMismatch)
}
