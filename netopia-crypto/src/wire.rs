//! Wire encoding of envelopes as flat form fields.
//!
//! The gateway transports envelopes as sibling form fields: base64
//! `env_key` and `data`, an explicit `cipher` identifier, and a base64
//! `iv` for the block family. Legacy senders omit `cipher`, in which case
//! the stream family is assumed.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::cipher::{CipherSuite, IV_SIZE};
use crate::envelope::Envelope;
use crate::error::{CryptoError, CryptoResult};

/// Transport form of an envelope: a flat string-keyed mapping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WireEnvelope {
    /// Asymmetrically-encrypted symmetric key, base64.
    pub env_key: String,
    /// Symmetrically-encrypted body, base64.
    pub data: String,
    /// Cipher family identifier. Absent on legacy envelopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cipher: Option<String>,
    /// Base64 16-byte IV, present only for the block family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
}

impl WireEnvelope {
    /// Encodes an envelope for transport.
    pub fn from_envelope(envelope: &Envelope) -> Self {
        Self {
            env_key: BASE64.encode(&envelope.encrypted_key),
            data: BASE64.encode(&envelope.data),
            cipher: Some(envelope.cipher.wire_id().to_string()),
            iv: envelope.iv.map(|iv| BASE64.encode(iv)),
        }
    }

    /// Decodes the wire fields back into an envelope.
    ///
    /// The cipher identifier is untrusted input: it is resolved against
    /// the fixed allow-list first, and an unknown id fails with
    /// [`CryptoError::UnsupportedCipher`] before any field is decoded.
    /// Invalid base64 or a missing/mis-sized IV for the block family
    /// fails with [`CryptoError::Format`].
    pub fn to_envelope(&self) -> CryptoResult<Envelope> {
        let cipher = match self.cipher.as_deref() {
            // Legacy envelopes predate the cipher field.
            None => CipherSuite::Rc4,
            Some(id) => CipherSuite::from_wire_id(id)?,
        };

        let encrypted_key = decode_field("env_key", &self.env_key)?;
        let data = decode_field("data", &self.data)?;

        let iv = if cipher.requires_iv() {
            let b64 = self.iv.as_deref().ok_or_else(|| {
                CryptoError::Format(format!("iv is required for {cipher}"))
            })?;
            let bytes = decode_field("iv", b64)?;
            let iv: [u8; IV_SIZE] = bytes.as_slice().try_into().map_err(|_| {
                CryptoError::Format(format!(
                    "iv must be exactly {IV_SIZE} bytes, got {}",
                    bytes.len()
                ))
            })?;
            Some(iv)
        } else {
            // The stream family has no IV; a stray field is ignored.
            None
        };

        Ok(Envelope {
            encrypted_key,
            data,
            cipher,
            iv,
        })
    }
}

fn decode_field(name: &str, value: &str) -> CryptoResult<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| CryptoError::Format(format!("{name} is not valid base64: {e}")))
}
