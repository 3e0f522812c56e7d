//! RSA key loading and per-message key wrapping.
//!
//! Keys are loaded per operation from PEM files on disk, matching how the
//! gateway distributes them (a public key for sealing outbound orders, the
//! merchant private key for opening confirm callbacks). Nothing here
//! caches key material.

use std::fs;
use std::path::Path;

use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Loads an RSA public key from a PEM file.
pub fn load_public_key(path: impl AsRef<Path>) -> CryptoResult<RsaPublicKey> {
    let path = path.as_ref();
    let pem = fs::read_to_string(path).map_err(|e| {
        CryptoError::KeyLoad(format!("could not read public key {}: {e}", path.display()))
    })?;
    public_key_from_pem(&pem)
}

/// Parses an RSA public key from PEM text.
///
/// Accepts both SPKI (`PUBLIC KEY`) and the older PKCS#1
/// (`RSA PUBLIC KEY`) encapsulation.
pub fn public_key_from_pem(pem: &str) -> CryptoResult<RsaPublicKey> {
    match RsaPublicKey::from_public_key_pem(pem) {
        Ok(key) => Ok(key),
        Err(_) => RsaPublicKey::from_pkcs1_pem(pem)
            .map_err(|e| CryptoError::KeyLoad(format!("could not parse public key: {e}"))),
    }
}

/// Loads an RSA private key from a PEM file.
pub fn load_private_key(path: impl AsRef<Path>) -> CryptoResult<RsaPrivateKey> {
    let path = path.as_ref();
    let pem = fs::read_to_string(path).map_err(|e| {
        CryptoError::KeyLoad(format!("could not read private key {}: {e}", path.display()))
    })?;
    private_key_from_pem(&pem)
}

/// Parses an RSA private key from PEM text.
///
/// Accepts both PKCS#8 (`PRIVATE KEY`) and the older PKCS#1
/// (`RSA PRIVATE KEY`) encapsulation.
pub fn private_key_from_pem(pem: &str) -> CryptoResult<RsaPrivateKey> {
    match RsaPrivateKey::from_pkcs8_pem(pem) {
        Ok(key) => Ok(key),
        Err(_) => RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|e| CryptoError::KeyLoad(format!("could not parse private key: {e}"))),
    }
}

/// Encrypts a per-message symmetric key under the recipient's public key.
///
/// PKCS#1 v1.5 padding, the scheme the gateway's servers use for both
/// cipher families. Fails if the key does not fit the modulus.
pub fn wrap_key(key: &[u8], public_key: &RsaPublicKey) -> CryptoResult<Vec<u8>> {
    public_key
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, key)
        .map_err(|e| CryptoError::Encryption(format!("could not wrap symmetric key: {e}")))
}

/// Decrypts the asymmetric envelope to recover the symmetric key.
///
/// The primitive's failure signal is checked explicitly; a wrong private
/// key or corrupted ciphertext is an error, never silent garbage.
pub fn unwrap_key(wrapped: &[u8], private_key: &RsaPrivateKey) -> CryptoResult<Zeroizing<Vec<u8>>> {
    private_key
        .decrypt(Pkcs1v15Encrypt, wrapped)
        .map(Zeroizing::new)
        .map_err(|e| CryptoError::Decryption(format!("could not unwrap symmetric key: {e}")))
}
