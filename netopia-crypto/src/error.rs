//! Envelope error types.

use thiserror::Error;

/// Result type for envelope operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while sealing or opening payment envelopes.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key file missing, unreadable, or not parseable as an RSA key.
    #[error("key load failed: {0}")]
    KeyLoad(String),

    /// Encryption rejected by the underlying primitive, or every
    /// candidate in the seal chain failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Asymmetric unwrap or body decryption reported failure. Never
    /// masked by falling back to another cipher.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The envelope's explicit cipher identifier is not in the known set.
    #[error("unsupported cipher: {0}")]
    UnsupportedCipher(String),

    /// Base64 or field-shape violation in the wire representation.
    #[error("malformed envelope: {0}")]
    Format(String),
}
