// Credvault — Library root
//
// Re-exports the auth, authz, crypto, store, import, and CLI modules.

pub mod auth;
pub mod authz;
pub mod cli;
pub mod crypto;
pub mod error;
pub mod import;
pub mod store;

pub use error::{CredvaultError, Result};
