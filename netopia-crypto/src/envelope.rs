//! Sealing and opening of payment envelopes.
//!
//! Sealing generates a fresh symmetric key per message, encrypts the body
//! under it, and wraps the key with the recipient's RSA public key. The
//! suite is picked by walking an ordered candidate chain: the block
//! cipher first, then the stream paths. Opening never negotiates: the
//! explicit cipher id carried next to the ciphertext selects exactly one
//! path, and an unknown id is rejected before any decryption is
//! attempted.

use std::path::Path;

use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::{debug, warn};

use crate::cipher::{self, CipherSuite, IV_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::keys;
use crate::wire::WireEnvelope;

/// Candidate order for the seal chain: block cipher preferred, then the
/// native stream path, then the manual stream fallback.
pub const DEFAULT_SUITES: [CipherSuite; 3] = [
    CipherSuite::Aes256Cbc,
    CipherSuite::Rc4,
    CipherSuite::Rc4Fallback,
];

/// A sealed payload before wire encoding.
#[derive(Clone, Debug)]
pub struct Envelope {
    /// Per-message symmetric key, encrypted under the recipient's RSA
    /// public key.
    pub encrypted_key: Vec<u8>,
    /// Body ciphertext.
    pub data: Vec<u8>,
    /// The suite that produced `data`.
    pub cipher: CipherSuite,
    /// Present exactly when the suite requires one.
    pub iv: Option<[u8; IV_SIZE]>,
}

/// Seals `plaintext` for the holder of `public_key` using the default
/// suite preference.
pub fn seal(plaintext: &[u8], public_key: &RsaPublicKey) -> CryptoResult<Envelope> {
    seal_with_suites(plaintext, public_key, &DEFAULT_SUITES)
}

/// Seals `plaintext` trying each candidate suite in order.
///
/// A failing candidate is recorded and the next one tried; only when the
/// whole chain is exhausted does this return an error, aggregating every
/// attempt. This probing is safe because encryption runs on caller-chosen
/// input; the open side never does it.
pub fn seal_with_suites(
    plaintext: &[u8],
    public_key: &RsaPublicKey,
    suites: &[CipherSuite],
) -> CryptoResult<Envelope> {
    let mut attempts: Vec<String> = Vec::new();
    for &suite in suites {
        match seal_one(plaintext, public_key, suite) {
            Ok(envelope) => {
                debug!(suite = suite.wire_id(), "sealed payload");
                return Ok(envelope);
            }
            Err(e) => {
                warn!(suite = suite.wire_id(), error = %e, "seal attempt failed, trying next suite");
                attempts.push(format!("{}: {e}", suite.wire_id()));
            }
        }
    }
    if attempts.is_empty() {
        return Err(CryptoError::Encryption("no cipher suites to attempt".into()));
    }
    Err(CryptoError::Encryption(format!(
        "all cipher suites failed: [{}]",
        attempts.join("; ")
    )))
}

fn seal_one(
    plaintext: &[u8],
    public_key: &RsaPublicKey,
    suite: CipherSuite,
) -> CryptoResult<Envelope> {
    let key = cipher::generate_key(suite);
    let iv = suite.requires_iv().then(cipher::generate_iv);
    let data = cipher::encrypt_body(suite, plaintext, &key, iv.as_ref())?;
    let encrypted_key = keys::wrap_key(&key, public_key)?;
    Ok(Envelope {
        encrypted_key,
        data,
        cipher: suite,
        iv,
    })
}

/// Opens an envelope with the recipient's private key.
///
/// Dispatches on the envelope's explicit suite. A decryption failure is
/// terminal: no other suite is tried, since guessing on
/// attacker-influenced input would turn the open path into an oracle.
pub fn open(envelope: &Envelope, private_key: &RsaPrivateKey) -> CryptoResult<Vec<u8>> {
    if envelope.cipher.requires_iv() && envelope.iv.is_none() {
        return Err(CryptoError::Format(format!(
            "{} requires an IV",
            envelope.cipher
        )));
    }

    let key = keys::unwrap_key(&envelope.encrypted_key, private_key)?;
    let plaintext = cipher::decrypt_body(envelope.cipher, &envelope.data, &key, envelope.iv.as_ref())?;
    debug!(suite = envelope.cipher.wire_id(), len = plaintext.len(), "opened payload");
    Ok(plaintext)
}

/// Seals `plaintext` with a public key loaded from `public_key_path` and
/// returns the wire-encoded fields.
pub fn seal_with_key_file(
    plaintext: &[u8],
    public_key_path: impl AsRef<Path>,
) -> CryptoResult<WireEnvelope> {
    let public_key = keys::load_public_key(public_key_path)?;
    let envelope = seal(plaintext, &public_key)?;
    Ok(WireEnvelope::from_envelope(&envelope))
}

/// Decodes wire fields and opens them with a private key loaded from
/// `private_key_path`.
///
/// Field validation (base64, cipher allow-list, IV shape) happens before
/// the key file is touched.
pub fn open_with_key_file(
    wire: &WireEnvelope,
    private_key_path: impl AsRef<Path>,
) -> CryptoResult<Vec<u8>> {
    let envelope = wire.to_envelope()?;
    let private_key = keys::load_private_key(private_key_path)?;
    open(&envelope, &private_key)
}
