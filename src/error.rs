//! Library-wide error and result types.

use std::fmt;

/// Result alias used throughout soft-twofish.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Cryptographic failures are deliberately opaque: decryption with a wrong
/// key produces either garbage output or one of these coarse kinds, never a
/// message that narrows down which internal check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A cipher key was not 16, 24, or 32 bytes long.
    BadKeyLength(usize),
    /// A single-block operation received an input that is not exactly one
    /// block, or an unpadded multi-block input is not block-aligned.
    BadBlockSize(usize),
    /// Ciphertext handed to a mode decryptor is not a positive multiple of
    /// the block size.
    BadCiphertextLength(usize),
    /// A CBC initialization vector was not 16 bytes long.
    BadIvLength(usize),
    /// Strict unpadding found an inconsistent PKCS#7 trailer.
    BadPadding,
    /// The mode identifier is not one of the supported mode strings.
    UnsupportedMode(String),
    /// The padding identifier is not one of the supported padding strings.
    UnsupportedPadding(String),
    /// The plaintext integer is not smaller than the public modulus.
    MessageTooLarge,
    /// The ciphertext is not a non-negative integer below the modulus.
    InvalidCiphertext,
    /// Prime search or key assembly exhausted its attempt budget.
    KeyGenerationFailed,
    /// The envelope is missing a field, carries an unknown algorithm tag,
    /// or holds malformed base64/JSON (message describes which).
    EnvelopeSchema(&'static str),
    /// The envelope carries a MAC field and it does not match the body.
    MacMismatch,
    /// The operation requires a key that has not been generated or provided.
    NoKey,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadKeyLength(n) => {
                write!(f, "invalid key length: expected 16, 24, or 32 bytes, got {n}")
            }
            Error::BadBlockSize(n) => write!(f, "input is not block-aligned: {n} bytes"),
            Error::BadCiphertextLength(n) => {
                write!(f, "ciphertext length must be a positive multiple of 16, got {n}")
            }
            Error::BadIvLength(n) => write!(f, "IV must be 16 bytes, got {n}"),
            Error::BadPadding => write!(f, "inconsistent PKCS#7 padding"),
            Error::UnsupportedMode(m) => write!(f, "unsupported cipher mode: {m:?}"),
            Error::UnsupportedPadding(p) => write!(f, "unsupported padding scheme: {p:?}"),
            Error::MessageTooLarge => write!(f, "message is not smaller than the modulus"),
            Error::InvalidCiphertext => write!(f, "ciphertext is not a valid integer below the modulus"),
            Error::KeyGenerationFailed => write!(f, "key generation exhausted its attempts"),
            Error::EnvelopeSchema(s) => write!(f, "invalid envelope: {s}"),
            Error::MacMismatch => write!(f, "envelope MAC verification failed"),
            Error::NoKey => write!(f, "no key available: generate or provide keys first"),
        }
    }
}

impl std::error::Error for Error {}
