//! Symmetric payload encryption for the two gateway cipher families.
//!
//! The stream family wraps the keystream engine (no padding, no IV); the
//! block family is AES-256-CBC with PKCS#7 padding and a 16-byte IV. Both
//! sit behind one contract so the envelope layer can dispatch on the
//! suite carried next to the ciphertext.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::rc4;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block / IV size in bytes.
pub const IV_SIZE: usize = 16;
/// AES-256 key size in bytes.
pub const AES_KEY_SIZE: usize = 32;
/// Random key size used by the stream family.
pub const RC4_KEY_SIZE: usize = 16;

/// Symmetric cipher family, carried on the wire as the `cipher` field.
///
/// The identifier is explicit, never negotiated at decrypt time: legacy
/// envelopes omit it (the stream family is then assumed) and anything not
/// in this set is rejected before any key material is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CipherSuite {
    /// Legacy stream cipher, provider-native seal path.
    Rc4,
    /// Legacy stream cipher with manual key wrapping. Same keystream as
    /// [`CipherSuite::Rc4`]; historically emitted when the native seal
    /// primitive was unavailable.
    Rc4Fallback,
    /// AES-256-CBC with PKCS#7 padding and a random 16-byte IV.
    Aes256Cbc,
}

impl CipherSuite {
    /// Every suite the gateway has ever emitted, i.e. the decrypt-side
    /// allow-list.
    pub const ALL: [CipherSuite; 3] = [
        CipherSuite::Rc4,
        CipherSuite::Rc4Fallback,
        CipherSuite::Aes256Cbc,
    ];

    /// The identifier written to the wire `cipher` field.
    pub fn wire_id(self) -> &'static str {
        match self {
            CipherSuite::Rc4 => "rc4",
            CipherSuite::Rc4Fallback => "rc4-fallback",
            CipherSuite::Aes256Cbc => "aes-256-cbc",
        }
    }

    /// Resolves a wire identifier against the allow-list.
    pub fn from_wire_id(id: &str) -> CryptoResult<Self> {
        match id {
            "rc4" => Ok(CipherSuite::Rc4),
            "rc4-fallback" => Ok(CipherSuite::Rc4Fallback),
            "aes-256-cbc" => Ok(CipherSuite::Aes256Cbc),
            other => Err(CryptoError::UnsupportedCipher(other.to_string())),
        }
    }

    /// Whether the suite carries an IV next to the ciphertext.
    pub fn requires_iv(self) -> bool {
        matches!(self, CipherSuite::Aes256Cbc)
    }

    /// Size of the per-message symmetric key in bytes.
    pub fn key_size(self) -> usize {
        match self {
            CipherSuite::Rc4 | CipherSuite::Rc4Fallback => RC4_KEY_SIZE,
            CipherSuite::Aes256Cbc => AES_KEY_SIZE,
        }
    }
}

impl std::fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_id())
    }
}

/// Generates a fresh per-message symmetric key for the suite.
pub fn generate_key(suite: CipherSuite) -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(vec![0u8; suite.key_size()]);
    OsRng.fill_bytes(&mut key);
    key
}

/// Generates a random 16-byte IV for the block family.
pub fn generate_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypts `plaintext` under `key` with the given suite.
///
/// The stream family ignores `iv` and produces ciphertext of exactly the
/// plaintext length. The block family requires a 16-byte IV and always
/// produces a multiple of 16 bytes.
pub fn encrypt_body(
    suite: CipherSuite,
    plaintext: &[u8],
    key: &[u8],
    iv: Option<&[u8; IV_SIZE]>,
) -> CryptoResult<Vec<u8>> {
    match suite {
        CipherSuite::Rc4 | CipherSuite::Rc4Fallback => {
            if key.is_empty() {
                return Err(CryptoError::Encryption("stream key is empty".into()));
            }
            Ok(rc4::apply(plaintext, key))
        }
        CipherSuite::Aes256Cbc => {
            let iv = iv.ok_or_else(|| {
                CryptoError::Encryption("aes-256-cbc requires an IV".into())
            })?;
            let cipher = Aes256CbcEnc::new_from_slices(key, iv).map_err(|e| {
                CryptoError::Encryption(format!("invalid AES key or IV length: {e}"))
            })?;
            Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
        }
    }
}

/// Decrypts `ciphertext` under `key` with the given suite.
///
/// Block-family failures (invalid padding, wrong key material shape) are
/// reported as [`CryptoError::Decryption`], never returned as garbage.
pub fn decrypt_body(
    suite: CipherSuite,
    ciphertext: &[u8],
    key: &[u8],
    iv: Option<&[u8; IV_SIZE]>,
) -> CryptoResult<Vec<u8>> {
    match suite {
        CipherSuite::Rc4 | CipherSuite::Rc4Fallback => {
            if key.is_empty() {
                return Err(CryptoError::Decryption("stream key is empty".into()));
            }
            Ok(rc4::apply(ciphertext, key))
        }
        CipherSuite::Aes256Cbc => {
            let iv = iv.ok_or_else(|| {
                CryptoError::Decryption("aes-256-cbc requires an IV".into())
            })?;
            let cipher = Aes256CbcDec::new_from_slices(key, iv).map_err(|e| {
                CryptoError::Decryption(format!("invalid AES key or IV length: {e}"))
            })?;
            cipher
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| CryptoError::Decryption("invalid PKCS#7 padding".into()))
        }
    }
}
