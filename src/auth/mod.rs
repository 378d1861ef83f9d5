// Credvault — Authentication Module
//
// Registration and login backed by Argon2id password hashing. Login never
// reveals whether an email exists: unknown email and wrong password produce
// the exact same error.

mod error;
mod service;

pub use error::AuthError;
pub use service::{AuthService, UserListing};
