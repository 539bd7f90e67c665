//! **soft-twofish** - a software implementation of the Twofish block cipher
//! paired with Multi-Power RSA into a hybrid cryptosystem.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`twofish`] | Twofish-128/192/256 core, ECB and CBC modes |
//! | [`padding`] | PKCS#7 padding add/strip |
//! | [`rsa`]     | Multi-Power RSA (`N = p^(b-1) * q`) with CRT decryption |
//! | [`hybrid`]  | Envelope protocol: RSA-wrapped key + CBC payload |
//!
//! The hybrid envelope serializes to JSON with base64 binary fields and a
//! decimal-string wrapped key; see [`hybrid::Envelope`].

pub mod error;
pub mod hybrid;
pub mod padding;
pub mod rsa;
pub mod twofish;

pub use error::{Error, Result};
