//! Deprecated fixed-key encryption kept for old integrations.
//!
//! One historical integration path derived its AES key from the merchant
//! identifier instead of generating a fresh random key per message, and
//! shipped the IV prepended to the ciphertext in a single base64 blob.
//! That defeats per-message key freshness, so nothing in the seal chain
//! ever selects this path; it exists solely to read and produce artifacts
//! for integrations that still speak the old format. The key string is an
//! explicit argument; there is no process-wide default key.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::cipher::{AES_KEY_SIZE, IV_SIZE, generate_iv};
use crate::error::{CryptoError, CryptoResult};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Pads the merchant identifier with `'0'` (or truncates) to the AES-256
/// key size, the derivation the old integrations used.
fn derive_key(merchant_key: &str) -> [u8; AES_KEY_SIZE] {
    let mut key = [b'0'; AES_KEY_SIZE];
    let bytes = merchant_key.as_bytes();
    let n = bytes.len().min(AES_KEY_SIZE);
    key[..n].copy_from_slice(&bytes[..n]);
    key
}

/// Encrypts `plaintext` under a merchant-derived key; returns
/// `base64(iv || ciphertext)`.
#[deprecated(
    note = "merchant-derived keys defeat per-message key freshness; use envelope::seal"
)]
pub fn encrypt_with_merchant_key(plaintext: &[u8], merchant_key: &str) -> CryptoResult<String> {
    let key = derive_key(merchant_key);
    let iv = generate_iv();

    let cipher = Aes256CbcEnc::new_from_slices(&key, &iv)
        .map_err(|e| CryptoError::Encryption(format!("invalid AES key or IV length: {e}")))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut blob = Vec::with_capacity(IV_SIZE + ciphertext.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(blob))
}

/// Decrypts a `base64(iv || ciphertext)` blob produced by the fixed-key
/// path.
#[deprecated(
    note = "merchant-derived keys defeat per-message key freshness; use envelope::open"
)]
pub fn decrypt_with_merchant_key(payload: &str, merchant_key: &str) -> CryptoResult<Vec<u8>> {
    let blob = BASE64
        .decode(payload)
        .map_err(|e| CryptoError::Format(format!("payload is not valid base64: {e}")))?;
    if blob.len() < IV_SIZE {
        return Err(CryptoError::Format(format!(
            "payload too short to contain an IV: {} bytes",
            blob.len()
        )));
    }
    let (iv, ciphertext) = blob.split_at(IV_SIZE);

    let key = derive_key(merchant_key);
    let cipher = Aes256CbcDec::new_from_slices(&key, iv)
        .map_err(|e| CryptoError::Decryption(format!("invalid AES key or IV length: {e}")))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Decryption("invalid PKCS#7 padding".into()))
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let blob = encrypt_with_merchant_key(b"legacy payload", "MERCHANT-SIGNATURE").unwrap();
        let back = decrypt_with_merchant_key(&blob, "MERCHANT-SIGNATURE").unwrap();
        assert_eq!(back, b"legacy payload");
    }

    #[test]
    fn key_derivation_pads_and_truncates() {
        assert_eq!(derive_key("abc"), *b"abc00000000000000000000000000000");
        let long = "x".repeat(40);
        assert_eq!(derive_key(&long), *b"xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx");
    }

    #[test]
    fn wrong_merchant_key_fails_or_differs() {
        let blob = encrypt_with_merchant_key(b"legacy payload bytes", "merchant-a").unwrap();
        match decrypt_with_merchant_key(&blob, "merchant-b") {
            Err(CryptoError::Decryption(_)) => {}
            Ok(out) => assert_ne!(out, b"legacy payload bytes"),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn truncated_blob_rejected() {
        let err = decrypt_with_merchant_key(&BASE64.encode([0u8; 8]), "m").unwrap_err();
        assert!(matches!(err, CryptoError::Format(_)));
    }

    #[test]
    fn invalid_base64_rejected() {
        let err = decrypt_with_merchant_key("!!!", "m").unwrap_err();
        assert!(matches!(err, CryptoError::Format(_)));
    }
}
