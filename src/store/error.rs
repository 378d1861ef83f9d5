// Credvault — Store error types
//
// NotFound and Unauthorized are deliberately distinct: an entity that does
// not exist and an entity the caller does not own must never be conflated.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Vault not found: {0}")]
    VaultNotFound(Uuid),

    #[error("Credential not found: {0}")]
    CredentialNotFound(Uuid),

    #[error("Unauthorized — the caller does not own this resource")]
    Unauthorized,

    #[error("No valid rows to import after filtering")]
    NoValidRows,

    #[error("Crypto error: {0}")]
    Crypto(#[from] crate::crypto::CryptoError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}
