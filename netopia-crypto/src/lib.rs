//! Envelope encryption for the Netopia card-payment gateway.
//!
//! Implements the hybrid envelope the gateway's servers expect: a fresh
//! symmetric key per message, sealed under the counterparty's RSA public
//! key, with the body encrypted under that key by one of the historically
//! used families:
//!
//! - AES-256-CBC with PKCS#7 padding and a 16-byte IV (preferred)
//! - a legacy keystream cipher (no padding, no IV), kept for backward
//!   compatibility with older integrations
//!
//! Encryption picks a suite by walking an ordered fallback chain.
//! Decryption always follows the explicit `cipher` identifier carried
//! next to the ciphertext and never guesses: the identifier is validated
//! against a fixed allow-list, and a failure on one path is terminal.
//!
//! The wire unit is a flat string mapping of base64 fields (`env_key`,
//! `data`, optional `cipher` and `iv`) posted as sibling form fields.

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod legacy;
pub mod rc4;
pub mod wire;

pub use cipher::{AES_KEY_SIZE, CipherSuite, IV_SIZE, RC4_KEY_SIZE};
pub use envelope::{
    DEFAULT_SUITES, Envelope, open, open_with_key_file, seal, seal_with_key_file,
    seal_with_suites,
};
pub use error::{CryptoError, CryptoResult};
pub use wire::WireEnvelope;
