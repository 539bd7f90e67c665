//! Envelope wire format.
//!
//! An envelope is the serialized record a hybrid encryption produces: the
//! CBC body and IV as standard base64 (RFC 4648, with padding), the wrapped
//! symmetric key as a decimal-digit string, and a fixed algorithm tag. An
//! optional `mac` field carries an HMAC-SHA256 over the body; it is absent
//! unless the sender asked for authentication, keeping the wire format
//! compatible with peers that do not know the field.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::twofish::TWOFISH_BLOCK_SIZE;

/// Algorithm tag carried by every envelope.
pub const ENVELOPE_ALGORITHM: &str = "Twofish-MultiPowerRSA";

/// A serialized hybrid message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Always [`ENVELOPE_ALGORITHM`]; rejected on decrypt otherwise.
    pub algorithm: String,
    /// Base64 of the CBC body (without the IV).
    pub ciphertext: String,
    /// Base64 of the 16-byte IV.
    pub iv: String,
    /// The symmetric key encrypted under the recipient's public key, as a
    /// decimal-digit string.
    pub encrypted_key: String,
    /// Optional base64 HMAC-SHA256 over the body bytes, keyed with the
    /// symmetric key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
}

impl Envelope {
    /// Serialize the envelope to its JSON wire form.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|_| Error::EnvelopeSchema("serialization failed"))
    }

    /// Parse an envelope from its JSON wire form.
    ///
    /// A missing field or malformed JSON is an
    /// [`Error::EnvelopeSchema`](crate::Error::EnvelopeSchema).
    pub fn from_json(json: &str) -> Result<Envelope> {
        serde_json::from_str(json).map_err(|_| Error::EnvelopeSchema("malformed JSON"))
    }

    /// Decode the IV field, enforcing its length.
    pub(super) fn decode_iv(&self) -> Result<[u8; TWOFISH_BLOCK_SIZE]> {
        let iv = BASE64
            .decode(&self.iv)
            .map_err(|_| Error::EnvelopeSchema("iv is not valid base64"))?;
        let len = iv.len();
        iv.try_into().map_err(|_| Error::BadIvLength(len))
    }

    /// Decode the ciphertext body field.
    pub(super) fn decode_body(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.ciphertext)
            .map_err(|_| Error::EnvelopeSchema("ciphertext is not valid base64"))
    }

    /// Decode the optional MAC field.
    pub(super) fn decode_mac(&self) -> Result<Option<Vec<u8>>> {
        match &self.mac {
            None => Ok(None),
            Some(mac) => BASE64
                .decode(mac)
                .map(Some)
                .map_err(|_| Error::EnvelopeSchema("mac is not valid base64")),
        }
    }
}
