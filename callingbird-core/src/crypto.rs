use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;

const IV_SIZE: usize = 12;
const TAG_SIZE: usize = 16;
const KEY_SIZE: usize = 32;

/// Error type for token encryption and decryption.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Master key must be {KEY_SIZE} bytes hex-encoded")]
    InvalidKey,

    #[error("Encrypted payload is malformed: {0}")]
    InvalidFormat(String),

    #[error("Decryption failed (wrong key or tampered ciphertext)")]
    DecryptFailed,
}

/// An encrypted secret as stored at rest: random IV, ciphertext and GCM
/// auth tag kept as separate base64 columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    pub iv: String,
    pub ciphertext: String,
    pub tag: String,
}

/// AES-256-GCM envelope encryption with a single tenant-independent master key.
///
/// Decryption is an explicit, fallible operation: callers get a `Result`
/// rather than a panicking accessor.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Builds a cipher from a hex-encoded 32-byte master key.
    pub fn from_hex_key(master_key_hex: &str) -> Result<Self, CryptoError> {
        let key_bytes = hex::decode(master_key_hex).map_err(|_| CryptoError::InvalidKey)?;
        if key_bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKey);
        }
        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Encrypts a secret with a fresh random IV.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedSecret, CryptoError> {
        let mut iv = [0u8; IV_SIZE];
        rand::thread_rng().fill_bytes(&mut iv);
        let nonce = Nonce::from_slice(&iv);

        let sealed = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::DecryptFailed)?;

        // aes-gcm appends the 16-byte tag to the ciphertext
        let split = sealed.len() - TAG_SIZE;
        Ok(EncryptedSecret {
            iv: BASE64.encode(iv),
            ciphertext: BASE64.encode(&sealed[..split]),
            tag: BASE64.encode(&sealed[split..]),
        })
    }

    /// Decrypts a stored secret, verifying the auth tag.
    pub fn decrypt(&self, secret: &EncryptedSecret) -> Result<String, CryptoError> {
        let iv = BASE64
            .decode(&secret.iv)
            .map_err(|e| CryptoError::InvalidFormat(e.to_string()))?;
        if iv.len() != IV_SIZE {
            return Err(CryptoError::InvalidFormat("bad IV length".to_string()));
        }
        let mut sealed = BASE64
            .decode(&secret.ciphertext)
            .map_err(|e| CryptoError::InvalidFormat(e.to_string()))?;
        let tag = BASE64
            .decode(&secret.tag)
            .map_err(|e| CryptoError::InvalidFormat(e.to_string()))?;
        sealed.extend_from_slice(&tag);

        let nonce = Nonce::from_slice(&iv);
        let plain = self
            .cipher
            .decrypt(nonce, sealed.as_ref())
            .map_err(|_| CryptoError::DecryptFailed)?;

        String::from_utf8(plain).map_err(|e| CryptoError::InvalidFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_roundtrip() {
        let cipher = TokenCipher::from_hex_key(TEST_KEY).expect("valid key");
        let secret = cipher.encrypt("ya29.refresh-token").expect("encrypt");
        let plain = cipher.decrypt(&secret).expect("decrypt");
        assert_eq!(plain, "ya29.refresh-token");
    }

    #[test]
    fn test_ivs_are_random_per_secret() {
        let cipher = TokenCipher::from_hex_key(TEST_KEY).expect("valid key");
        let a = cipher.encrypt("same").expect("encrypt");
        let b = cipher.encrypt("same").expect("encrypt");
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = TokenCipher::from_hex_key(TEST_KEY).expect("valid key");
        let mut secret = cipher.encrypt("token").expect("encrypt");
        secret.tag = BASE64.encode([0u8; 16]);
        assert!(matches!(
            cipher.decrypt(&secret),
            Err(CryptoError::DecryptFailed)
        ));
    }

    #[test]
    fn test_rejects_short_key() {
        assert!(matches!(
            TokenCipher::from_hex_key("deadbeef"),
            Err(CryptoError::InvalidKey)
        ));
    }
}
