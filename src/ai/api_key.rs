use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;

use crate::error::AppError;

const NONCE_SIZE: usize = 12;
const KEY_SIZE: usize = 32;

/// Ciphertext plus the nonce it was sealed with, both base64. Matches the
/// two columns of the provider_keys table.
#[derive(Debug, Clone)]
pub struct SealedKey {
    pub ciphertext: String,
    pub nonce: String,
}

/// Encrypts user-supplied provider API keys at rest with AES-256-GCM.
pub struct KeyVault {
    encryption_key: [u8; KEY_SIZE],
}

impl KeyVault {
    pub fn new(encryption_key: [u8; KEY_SIZE]) -> Self {
        Self { encryption_key }
    }

    pub fn from_base64_key(key: &str) -> Result<Self, AppError> {
        let key_bytes = BASE64
            .decode(key)
            .map_err(|e| AppError::ConfigError(format!("Invalid encryption key: {}", e)))?;

        if key_bytes.len() != KEY_SIZE {
            return Err(AppError::ConfigError(
                "Invalid encryption key length".to_string(),
            ));
        }

        let mut encryption_key = [0u8; KEY_SIZE];
        encryption_key.copy_from_slice(&key_bytes);

        Ok(Self { encryption_key })
    }

    pub fn seal(&self, api_key: &str) -> Result<SealedKey, AppError> {
        let cipher = Aes256Gcm::new_from_slice(&self.encryption_key)
            .map_err(|e| AppError::InternalError(format!("Encryption error: {}", e)))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let encrypted = cipher
            .encrypt(nonce, api_key.as_bytes())
            .map_err(|e| AppError::InternalError(format!("Encryption failed: {}", e)))?;

        Ok(SealedKey {
            ciphertext: BASE64.encode(encrypted),
            nonce: BASE64.encode(nonce_bytes),
        })
    }

    pub fn open(&self, ciphertext_b64: &str, nonce_b64: &str) -> Result<String, AppError> {
        let cipher = Aes256Gcm::new_from_slice(&self.encryption_key)
            .map_err(|e| AppError::InternalError(format!("Decryption error: {}", e)))?;

        let nonce_bytes = BASE64
            .decode(nonce_b64)
            .map_err(|e| AppError::InternalError(format!("Invalid nonce: {}", e)))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let encrypted_data = BASE64
            .decode(ciphertext_b64)
            .map_err(|e| AppError::InternalError(format!("Invalid encrypted data: {}", e)))?;

        let decrypted = cipher
            .decrypt(nonce, encrypted_data.as_ref())
            .map_err(|e| AppError::InternalError(format!("Decryption failed: {}", e)))?;

        String::from_utf8(decrypted)
            .map_err(|e| AppError::InternalError(format!("Invalid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_test_key() -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        key
    }

    #[test]
    fn test_seal_open_round_trip() {
        let vault = KeyVault::new(generate_test_key());

        let api_key = "sk-test-api-key-123";
        let sealed = vault.seal(api_key).unwrap();

        assert!(!sealed.ciphertext.is_empty());
        assert!(!sealed.nonce.is_empty());

        let opened = vault.open(&sealed.ciphertext, &sealed.nonce).unwrap();
        assert_eq!(opened, api_key);
    }

    #[test]
    fn test_wrong_key_fails_to_open() {
        let vault = KeyVault::new(generate_test_key());
        let sealed = vault.seal("sk-test-api-key-123").unwrap();

        let other_vault = KeyVault::new(generate_test_key());
        assert!(other_vault.open(&sealed.ciphertext, &sealed.nonce).is_err());
    }

    #[test]
    fn test_nonces_are_unique_per_seal() {
        let vault = KeyVault::new(generate_test_key());
        let a = vault.seal("same-key").unwrap();
        let b = vault.seal("same-key").unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_from_base64_key_validation() {
        // 32 zero bytes
        let valid = BASE64.encode([0u8; KEY_SIZE]);
        assert!(KeyVault::from_base64_key(&valid).is_ok());

        let short = BASE64.encode([0u8; 16]);
        assert!(KeyVault::from_base64_key(&short).is_err());

        assert!(KeyVault::from_base64_key("not base64!!").is_err());
    }
}
