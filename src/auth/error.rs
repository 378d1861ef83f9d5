// Credvault — Auth error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,

    /// Returned for both unknown email and wrong password, so callers
    /// cannot enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}
