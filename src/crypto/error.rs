// Credvault — Crypto error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Decryption failed — wrong key or corrupted ciphertext")]
    DecryptFailed,
}
