//! AES-256-GCM decryptor for the permission fields of the login payload.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chronopay_application::SecretDecryptor;
use chronopay_core::{AppError, AppResult};

const NONCE_LENGTH: usize = 12;

/// Decrypts base64 text laid out as a 12-byte nonce followed by the
/// AES-256-GCM ciphertext.
#[derive(Clone)]
pub struct AesPermissionDecryptor {
    cipher: Aes256Gcm,
}

impl AesPermissionDecryptor {
    /// Creates a new decryptor from a 32-byte key.
    pub fn new(key_bytes: &[u8; 32]) -> Self {
        let cipher = Aes256Gcm::new(key_bytes.into());
        Self { cipher }
    }

    /// Creates a new decryptor from a hex-encoded 32-byte key.
    pub fn from_hex(hex_key: &str) -> AppResult<Self> {
        let decoded = hex::decode(hex_key.trim()).map_err(|error| {
            AppError::Validation(format!("invalid CHRONOPAY_PERMISSION_KEY hex: {error}"))
        })?;

        let key: [u8; 32] = decoded.try_into().map_err(|_| {
            AppError::Validation(
                "CHRONOPAY_PERMISSION_KEY must be exactly 32 bytes (64 hex chars)".to_owned(),
            )
        })?;
        Ok(Self::new(&key))
    }
}

impl SecretDecryptor for AesPermissionDecryptor {
    fn decrypt_text(&self, ciphertext: &str) -> AppResult<String> {
        let decoded = STANDARD.decode(ciphertext.trim()).map_err(|error| {
            AppError::Internal(format!("permission field is not base64: {error}"))
        })?;

        if decoded.len() < NONCE_LENGTH {
            return Err(AppError::Internal(
                "ciphertext too short: missing nonce".to_owned(),
            ));
        }

        let (nonce_bytes, encrypted) = decoded.split_at(NONCE_LENGTH);
        let nonce_array: [u8; NONCE_LENGTH] = nonce_bytes
            .try_into()
            .map_err(|_| AppError::Internal("nonce must be exactly 12 bytes".to_owned()))?;
        let nonce = Nonce::from(nonce_array);

        let plaintext = self
            .cipher
            .decrypt(&nonce, encrypted)
            .map_err(|error| AppError::Internal(format!("failed to decrypt permission: {error}")))?;

        String::from_utf8(plaintext)
            .map_err(|error| AppError::Internal(format!("permission is not UTF-8: {error}")))
    }
}
