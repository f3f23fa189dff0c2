//! CubeAI Crypto — encrypted local preference storage.
//!
//! Values are encrypted with AES-256-CBC and stored as
//! `base64(iv) + ":" + base64(ciphertext)`. Two compatibility paths are
//! kept from earlier releases of the app:
//! - ciphertexts without a `:` separator decrypt with an all-zero IV
//! - with no session key at all, values are stored as plaintext JSON
//!   (an intentional availability-over-security degradation, logged)
//!
//! Key derivation from a passphrase is repeat-and-truncate to 32 bytes.
//! That is NOT a real KDF; it is preserved because existing stored blobs
//! depend on it. New installs should prefer
//! [`SessionCipher::from_passphrase_hkdf`] or a random key from the
//! session context.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod store;

pub use store::SecureStore;

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// AES block / IV length in bytes.
pub const IV_LEN: usize = 16;

/// Crypto/storage error type
#[derive(Debug, Error)]
pub enum Error {
    /// Key material is empty or unusable
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Decryption failed (wrong key, corrupt data, or bad padding)
    #[error("decryption failed")]
    Decrypt,

    /// Stored value is not valid base64 or has a malformed layout
    #[error("invalid stored format: {0}")]
    InvalidFormat(String),

    /// Store file I/O failure
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// (De)serialization failure
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Derive a 32-byte key from a passphrase by repeating its UTF-8 bytes
/// and truncating. Legacy-compatible; not a KDF. Exposed so a session
/// context can be bootstrapped from the same key material the store
/// uses.
pub fn derive_key(passphrase: &str) -> Result<[u8; KEY_LEN]> {
    let bytes = passphrase.as_bytes();
    if bytes.is_empty() {
        return Err(Error::InvalidKey("empty passphrase".to_string()));
    }
    let mut key = [0u8; KEY_LEN];
    for (i, slot) in key.iter_mut().enumerate() {
        *slot = bytes[i % bytes.len()];
    }
    Ok(key)
}

/// AES-256-CBC cipher over a session key.
///
/// The key is zeroized when the cipher is dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionCipher {
    key: [u8; KEY_LEN],
}

impl SessionCipher {
    /// Create a cipher from a raw 256-bit key.
    pub fn from_key(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Create a cipher from a passphrase using the legacy
    /// repeat-and-truncate derivation (required to read existing blobs).
    pub fn from_passphrase(passphrase: &str) -> Result<Self> {
        Ok(Self {
            key: derive_key(passphrase)?,
        })
    }

    /// Create a cipher from a passphrase using HKDF-SHA256.
    ///
    /// Preferred for fresh installs; incompatible with blobs written by
    /// the legacy derivation.
    pub fn from_passphrase_hkdf(passphrase: &str, salt: &[u8]) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(Error::InvalidKey("empty passphrase".to_string()));
        }
        let hkdf = Hkdf::<Sha256>::new(Some(salt), passphrase.as_bytes());
        let mut key = [0u8; KEY_LEN];
        hkdf.expand(b"cubeai-prefs-v2", &mut key)
            .map_err(|_| Error::InvalidKey("hkdf expand failed".to_string()))?;
        Ok(Self { key })
    }

    /// Encrypt a plaintext string to `base64(iv):base64(ciphertext)`.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let mut iv = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        format!("{}:{}", BASE64.encode(iv), BASE64.encode(ciphertext))
    }

    /// Decrypt a stored value.
    ///
    /// Values without a `:` separator are treated as legacy ciphertexts
    /// encrypted with an all-zero IV.
    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let (iv, ciphertext) = match encoded.split_once(':') {
            Some((iv_b64, ct_b64)) => {
                let iv_bytes = BASE64
                    .decode(iv_b64)
                    .map_err(|e| Error::InvalidFormat(e.to_string()))?;
                let iv: [u8; IV_LEN] = iv_bytes
                    .try_into()
                    .map_err(|_| Error::InvalidFormat("iv is not 16 bytes".to_string()))?;
                let ciphertext = BASE64
                    .decode(ct_b64)
                    .map_err(|e| Error::InvalidFormat(e.to_string()))?;
                (iv, ciphertext)
            }
            None => {
                // Legacy path: fixed zero IV, bare base64 ciphertext.
                let ciphertext = BASE64
                    .decode(encoded)
                    .map_err(|e| Error::InvalidFormat(e.to_string()))?;
                ([0u8; IV_LEN], ciphertext)
            }
        };

        let plaintext = Aes256CbcDec::new(&self.key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| Error::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| Error::Decrypt)
    }
}

impl std::fmt::Debug for SessionCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_across_passphrase_lengths() {
        // Shorter than, equal to, and longer than the 32-byte key.
        let passphrases = [
            "k",
            "short-key",
            "exactly-thirty-two-bytes-long!!!",
            "a-passphrase-that-is-considerably-longer-than-thirty-two-bytes",
        ];
        for passphrase in passphrases {
            let cipher = SessionCipher::from_passphrase(passphrase).unwrap();
            let plaintext = "ocean salinity: 27.4 PSU \u{1F30A}";
            let encoded = cipher.encrypt(plaintext);
            assert!(encoded.contains(':'));
            assert_eq!(cipher.decrypt(&encoded).unwrap(), plaintext, "{}", passphrase);
        }
    }

    #[test]
    fn repeat_truncate_derivation() {
        let key = derive_key("abc").unwrap();
        assert_eq!(&key[..6], b"abcabc");
        assert_eq!(key[31], b'b'); // 31 % 3 == 1

        let long = "x".repeat(40);
        let key = derive_key(&long).unwrap();
        assert_eq!(key, [b'x'; 32]);
    }

    #[test]
    fn empty_passphrase_rejected() {
        assert!(matches!(
            SessionCipher::from_passphrase(""),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn fresh_iv_per_encryption() {
        let cipher = SessionCipher::from_passphrase("session-key").unwrap();
        let a = cipher.encrypt("same value");
        let b = cipher.encrypt("same value");
        assert_ne!(a, b);
        assert_eq!(cipher.decrypt(&a).unwrap(), "same value");
        assert_eq!(cipher.decrypt(&b).unwrap(), "same value");
    }

    #[test]
    fn legacy_value_without_separator_uses_zero_iv() {
        let cipher = SessionCipher::from_passphrase("legacy-key").unwrap();

        // Produce a legacy blob by hand: zero IV, bare base64.
        let ciphertext = Aes256CbcEnc::new(&derive_key("legacy-key").unwrap().into(), &[0u8; IV_LEN].into())
            .encrypt_padded_vec_mut::<Pkcs7>(b"pre-migration value");
        let legacy = BASE64.encode(ciphertext);
        assert!(!legacy.contains(':'));

        assert_eq!(cipher.decrypt(&legacy).unwrap(), "pre-migration value");
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let cipher = SessionCipher::from_passphrase("right-key").unwrap();
        let other = SessionCipher::from_passphrase("wrong-key").unwrap();
        let encoded = cipher.encrypt("secret");
        assert!(other.decrypt(&encoded).is_err());
    }

    #[test]
    fn malformed_base64_is_invalid_format() {
        let cipher = SessionCipher::from_passphrase("key").unwrap();
        assert!(matches!(
            cipher.decrypt("!!not-base64!!:AAAA"),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn hkdf_derivation_differs_from_legacy() {
        let legacy = SessionCipher::from_passphrase("passphrase").unwrap();
        let modern = SessionCipher::from_passphrase_hkdf("passphrase", b"salt").unwrap();
        let encoded = modern.encrypt("value");
        assert!(legacy.decrypt(&encoded).is_err());
        assert_eq!(modern.decrypt(&encoded).unwrap(), "value");
    }

    #[test]
    fn debug_redacts_key() {
        let cipher = SessionCipher::from_passphrase("topsecret").unwrap();
        let debug = format!("{:?}", cipher);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("topsecret"));
    }
}
