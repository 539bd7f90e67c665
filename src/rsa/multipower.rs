//! Multi-Power RSA
//!
//! This module implements the Multi-Power RSA public-key scheme, a variant
//! of RSA whose modulus has the form `N = p^(b-1) * q`. Encryption is plain
//! `m^e mod N`; decryption exploits the modulus structure by computing the
//! message modulo `q` and modulo `p`, Hensel-lifting the latter up to
//! `p^(b-1)`, and recombining with the Chinese Remainder Theorem. For the
//! default `b = 3` this replaces one full-size private exponentiation with
//! two at a third of the modulus size plus a handful of cheap lifts.
//!
//! # Features
//!
//! - `MultiPowerRsa`: Key generation, encryption, and CRT decryption for a
//!   configurable key size and power parameter `b`.
//! - `PublicKey` / `PrivateKey`: Key records that serialize as decimal
//!   strings plus the scalar `b`, so keys survive text-oriented transports
//!   unchanged.
//! - `Message`: Explicit input variant (integer, bytes, or text) with a
//!   canonical reduction to a non-negative integer.
//!
//! # Example
//!
//! ```no_run
//! use soft_twofish::rsa::{Message, MultiPowerRsa};
//!
//! let mut rsa = MultiPowerRsa::new(1024, 2);
//! rsa.generate_keys().expect("Key generation failed");
//!
//! let ciphertext = rsa.encrypt(Message::from(12345678u64), None).expect("Encryption failed");
//! let decrypted = rsa.decrypt(&ciphertext, None).expect("Decryption failed");
//!
//! assert_eq!(decrypted, 12345678u64.into());
//! ```
//!
//! # Disclaimer
//!
//! - Messages are encrypted raw, without OAEP or any other randomized
//!   padding. Encrypting low-entropy messages directly is insecure; the
//!   intended use is wrapping uniformly random symmetric keys.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use serde::{Deserialize, Serialize};

use super::bigint::{generate_prime, mod_inverse};
use crate::error::{Error, Result};

/// Default modulus size in bits.
pub const DEFAULT_RSA_KEY_SIZE: u64 = 2048;

/// Default power parameter, giving a `p^2 * q` modulus.
pub const DEFAULT_RSA_POWER: u32 = 3;

/// The fixed public exponent.
pub const PUBLIC_EXPONENT: u32 = 65537;

// Fresh (p, q) pairs drawn before key generation reports failure.
const KEY_GENERATION_ATTEMPTS: usize = 16;

/// Serde adapter encoding a `BigUint` as a decimal-digit string.
mod decimal {
    use num_bigint::BigUint;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let digits = String::deserialize(deserializer)?;
        BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| D::Error::custom("expected a decimal-digit string"))
    }
}

/// Public half of a Multi-Power RSA key pair: the modulus `N = p^(b-1) * q`
/// and the public exponent `e`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    #[serde(with = "decimal")]
    pub n: BigUint,
    #[serde(with = "decimal")]
    pub e: BigUint,
}

/// Private half of a Multi-Power RSA key pair.
///
/// Carries the factorization and the reduced decryption exponents
/// `d_p = d mod (p-1)` and `d_q = d mod (q-1)` used by the CRT decryption
/// path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    #[serde(with = "decimal")]
    pub n: BigUint,
    #[serde(with = "decimal")]
    pub e: BigUint,
    #[serde(with = "decimal")]
    pub d: BigUint,
    #[serde(with = "decimal")]
    pub p: BigUint,
    #[serde(with = "decimal")]
    pub q: BigUint,
    pub b: u32,
    #[serde(with = "decimal")]
    pub d_p: BigUint,
    #[serde(with = "decimal")]
    pub d_q: BigUint,
}

/// A message accepted by the public-key scheme.
///
/// All variants reduce canonically to a non-negative integer: bytes are
/// interpreted big-endian, text is UTF-8 encoded and then treated as bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    Integer(BigUint),
    Bytes(Vec<u8>),
    Text(String),
}

impl Message {
    /// Canonical reduction to a non-negative integer.
    pub fn to_uint(&self) -> BigUint {
        match self {
            Message::Integer(value) => value.clone(),
            Message::Bytes(bytes) => BigUint::from_bytes_be(bytes),
            Message::Text(text) => BigUint::from_bytes_be(text.as_bytes()),
        }
    }
}

impl From<BigUint> for Message {
    fn from(value: BigUint) -> Self {
        Message::Integer(value)
    }
}

impl From<u64> for Message {
    fn from(value: u64) -> Self {
        Message::Integer(BigUint::from(value))
    }
}

impl From<&[u8]> for Message {
    fn from(bytes: &[u8]) -> Self {
        Message::Bytes(bytes.to_vec())
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

/// A Multi-Power RSA instance.
///
/// Holds the configured key size and power parameter together with the key
/// pair, once generated or loaded. Keys are reused across any number of
/// encrypt/decrypt operations; operations may also override the stored key
/// per call.
#[derive(Clone, Debug)]
pub struct MultiPowerRsa {
    key_size: u64,
    b: u32,
    pub public_key: Option<PublicKey>,
    pub private_key: Option<PrivateKey>,
}

impl Default for MultiPowerRsa {
    fn default() -> Self {
        Self::new(DEFAULT_RSA_KEY_SIZE, DEFAULT_RSA_POWER)
    }
}

impl MultiPowerRsa {
    /// Create an instance with the given modulus size in bits and power
    /// parameter `b` (the modulus is `p^(b-1) * q`).
    ///
    /// No keys are generated yet; call [`MultiPowerRsa::generate_keys`] or
    /// assign imported keys before encrypting. `b` must be at least 2 or
    /// key generation will fail.
    pub fn new(key_size: u64, b: u32) -> Self {
        MultiPowerRsa {
            key_size,
            b,
            public_key: None,
            private_key: None,
        }
    }

    /// Generate a fresh key pair and store it on the instance.
    ///
    /// Primes `p` and `q` are sampled independently with fresh entropy so
    /// that `p` has `ceil(key_size / b)` bits, `q` fills the remaining
    /// `key_size - (b-1) * ceil(key_size / b)` bits, both are coprime with
    /// the public exponent minus-one test (`gcd(e, p-1) = gcd(e, q-1) = 1`),
    /// and `p != q`.
    ///
    /// # Returns
    ///
    /// * `Ok((PublicKey, PrivateKey))` - Copies of the stored key pair.
    /// * `Err(Error::KeyGenerationFailed)` - If the parameters are unusable
    ///   or the retry budget is exhausted.
    pub fn generate_keys(&mut self) -> Result<(PublicKey, PrivateKey)> {
        if self.b < 2 {
            return Err(Error::KeyGenerationFailed);
        }

        let e = BigUint::from(PUBLIC_EXPONENT);
        let b = self.b as u64;

        let p_bits = self.key_size.div_ceil(b);
        let q_bits = self
            .key_size
            .checked_sub((b - 1) * p_bits)
            .ok_or(Error::KeyGenerationFailed)?;
        if p_bits < 2 || q_bits < 2 {
            return Err(Error::KeyGenerationFailed);
        }

        for _ in 0..KEY_GENERATION_ATTEMPTS {
            let p = generate_rsa_prime(p_bits, &e)?;
            let q = generate_rsa_prime(q_bits, &e)?;
            if p == q {
                continue;
            }

            let n = p.pow(self.b - 1) * &q;
            let phi = p.pow(self.b - 2) * (&p - 1u32) * (&q - 1u32);

            let d = match mod_inverse(&e, &phi) {
                Some(d) => d,
                None => continue,
            };
            let d_p = &d % (&p - 1u32);
            let d_q = &d % (&q - 1u32);

            let public_key = PublicKey { n: n.clone(), e: e.clone() };
            let private_key = PrivateKey {
                n,
                e: e.clone(),
                d,
                p,
                q,
                b: self.b,
                d_p,
                d_q,
            };

            self.public_key = Some(public_key.clone());
            self.private_key = Some(private_key.clone());
            return Ok((public_key, private_key));
        }

        Err(Error::KeyGenerationFailed)
    }

    /// Encrypt a message under the given (or stored) public key.
    ///
    /// # Parameters
    ///
    /// * `message`: The message; reduced canonically to an integer `m`,
    ///   which must satisfy `m < N`.
    /// * `public_key`: Key to use for this call; falls back to the stored
    ///   public key when `None`.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The ciphertext `m^e mod N` as a decimal-digit
    ///   string, robust across text-oriented transports.
    /// * `Err(Error::MessageTooLarge)` - If `m >= N`.
    /// * `Err(Error::NoKey)` - If no public key is available.
    pub fn encrypt(&self, message: Message, public_key: Option<&PublicKey>) -> Result<String> {
        let pk = public_key
            .or(self.public_key.as_ref())
            .ok_or(Error::NoKey)?;

        let m = message.to_uint();
        if m >= pk.n {
            return Err(Error::MessageTooLarge);
        }

        Ok(m.modpow(&pk.e, &pk.n).to_str_radix(10))
    }

    /// Decrypt a ciphertext under the given (or stored) private key.
    ///
    /// Decryption runs modulo the two prime-power factors separately:
    /// `m_q = c^(d_q) mod q` directly, and `m_p = c^(d_p) mod p` lifted to
    /// a root of `x^e = c` modulo `p^(b-1)` by Hensel/Newton steps. The two
    /// residues are recombined with the CRT.
    ///
    /// # Parameters
    ///
    /// * `ciphertext`: The decimal-digit wire form produced by
    ///   [`MultiPowerRsa::encrypt`].
    /// * `private_key`: Key to use for this call; falls back to the stored
    ///   private key when `None`.
    ///
    /// # Returns
    ///
    /// * `Ok(BigUint)` - The decrypted message as an integer.
    /// * `Err(Error::InvalidCiphertext)` - If the input is not a
    ///   non-negative integer below `N`.
    /// * `Err(Error::NoKey)` - If no private key is available.
    pub fn decrypt(&self, ciphertext: &str, private_key: Option<&PrivateKey>) -> Result<BigUint> {
        let sk = private_key
            .or(self.private_key.as_ref())
            .ok_or(Error::NoKey)?;

        let c = BigUint::parse_bytes(ciphertext.trim().as_bytes(), 10)
            .ok_or(Error::InvalidCiphertext)?;
        if c >= sk.n {
            return Err(Error::InvalidCiphertext);
        }

        let m_q = c.modpow(&sk.d_q, &sk.q);
        let m_p = hensel_lift(&c, sk)?;

        // CRT: find m with m = m_p (mod p^(b-1)) and m = m_q (mod q).
        let p_b1 = sk.p.pow(sk.b - 1);
        let q_inv = mod_inverse(&sk.q, &p_b1).ok_or(Error::InvalidCiphertext)?;
        let diff = ((&m_p + &p_b1) - (&m_q % &p_b1)) % &p_b1;
        let m = (&m_q + &sk.q * ((diff * q_inv) % &p_b1)) % &sk.n;

        Ok(m)
    }

    /// Decrypt a ciphertext and return the message as big-endian bytes.
    ///
    /// The byte string is minimal: leading zero bytes of the original
    /// message are not recovered. Callers that need a fixed width (such as
    /// wrapped symmetric keys) must left-pad the result themselves.
    pub fn decrypt_to_bytes(
        &self,
        ciphertext: &str,
        private_key: Option<&PrivateKey>,
    ) -> Result<Vec<u8>> {
        Ok(self.decrypt(ciphertext, private_key)?.to_bytes_be())
    }
}

/// Sample a prime of the given bit length suitable for RSA: the public
/// exponent must be invertible modulo `prime - 1`.
fn generate_rsa_prime(bits: u64, e: &BigUint) -> Result<BigUint> {
    for _ in 0..KEY_GENERATION_ATTEMPTS {
        let p = generate_prime(bits)?;
        if (&p - 1u32).gcd(e).is_one() {
            return Ok(p);
        }
    }
    Err(Error::KeyGenerationFailed)
}

/// Lift `c^(d_p) mod p` to the root of `x^e = c` modulo `p^(b-1)`.
///
/// Standard Hensel lifting for `f(x) = x^e - c`: at each step the residual
/// `(c - m^e) mod p^(j+1)` is divisible by `p^j`, and the quotient is
/// corrected by the inverse of the derivative `e * m^(e-1) mod p`. The
/// invariant `m^e = c (mod p^j)` holds on entry to every step.
fn hensel_lift(c: &BigUint, sk: &PrivateKey) -> Result<BigUint> {
    let mut m = (c % &sk.p).modpow(&sk.d_p, &sk.p);

    let e_minus_1 = &sk.e - 1u32;
    let mut p_j = sk.p.clone();

    for _ in 1..sk.b.saturating_sub(1) {
        let p_j1 = &p_j * &sk.p;

        let residual = ((c % &p_j1) + &p_j1 - m.modpow(&sk.e, &p_j1)) % &p_j1;
        let quotient = (&residual / &p_j) % &sk.p;

        let derivative = (m.modpow(&e_minus_1, &sk.p) * &sk.e) % &sk.p;
        let derivative_inv = mod_inverse(&derivative, &sk.p).ok_or(Error::InvalidCiphertext)?;

        let correction = (quotient * derivative_inv) % &sk.p;
        m = (m + correction * &p_j) % &p_j1;

        p_j = p_j1;
    }

    Ok(m)
}

/// Interpret bytes as a big-endian non-negative integer.
pub fn bytes_to_uint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Convert a non-negative integer to big-endian bytes.
///
/// With `length` given, the output is left-padded with zero bytes to
/// exactly that many bytes; `None` when the value does not fit.
pub fn uint_to_bytes(value: &BigUint, length: Option<usize>) -> Option<Vec<u8>> {
    let bytes = value.to_bytes_be();
    match length {
        None => Some(bytes),
        Some(length) if bytes.len() <= length => {
            let mut padded = vec![0u8; length - bytes.len()];
            padded.extend_from_slice(&bytes);
            Some(padded)
        }
        Some(_) => None,
    }
}
