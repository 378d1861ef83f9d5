// Credvault — Store Module
//
// SQLite-backed entity lifecycle for users, vaults, and credentials.
// Secret values are encrypted before they reach this layer's INSERT/UPDATE
// statements and are returned as ciphertext+IV pairs, never decrypted in bulk.

mod credentials;
mod db;
mod error;
mod models;
mod vaults;

pub use credentials::CredentialStore;
pub use db::Database;
pub use error::StoreError;
pub use models::{Credential, CredentialUpdate, ImportRow, NewCredential, Vault};
pub use vaults::VaultStore;
