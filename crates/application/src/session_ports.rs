use chronopay_core::AppResult;

/// Port for decrypting individually encrypted permission fields.
pub trait SecretDecryptor: Send + Sync {
    /// Decrypts one encoded ciphertext into UTF-8 text.
    fn decrypt_text(&self, ciphertext: &str) -> AppResult<String>;
}

/// Port for the locally persisted key/value session state.
pub trait SessionStore: Send + Sync {
    /// Reads the raw value stored under `key`.
    fn read(&self, key: &str) -> AppResult<Option<String>>;
}
