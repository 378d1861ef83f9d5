// Credvault — Crypto Module
//
// Symmetric encryption of stored secrets: AES-256-CBC with PKCS#7 padding,
// one process-wide key, and a fresh random IV for every encryption. IV and
// ciphertext travel hex-encoded.

mod cipher;
mod error;
mod key;

pub use cipher::{EncryptedSecret, SecretCipher};
pub use error::CryptoError;
pub use key::EncryptionKey;
