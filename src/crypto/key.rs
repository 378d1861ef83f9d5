// Credvault — Encryption key handling
//
// The process-wide AES-256 key arrives base64-encoded in the CREDVAULT_KEY
// environment variable. Validation happens at construction: a missing,
// undecodable, or wrong-length key refuses to produce an `EncryptionKey`
// at all, so nothing downstream ever holds a bad key. The raw bytes are
// zeroized when the key is dropped and never written to the store or logs.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use zeroize::Zeroizing;

use super::CryptoError;

/// Length of the AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Environment variable holding the base64-encoded key.
pub const KEY_ENV_VAR: &str = "CREDVAULT_KEY";

/// A validated 32-byte AES-256 key.
pub struct EncryptionKey {
    bytes: Zeroizing<[u8; KEY_LEN]>,
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl EncryptionKey {
    /// Build a key from raw bytes. Fails unless exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_LEN {
            return Err(CryptoError::InvalidKey(format!(
                "key must be exactly {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            )));
        }
        let mut buf = Zeroizing::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self { bytes: buf })
    }

    /// Decode a base64-encoded key string.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let decoded = Zeroizing::new(
            BASE64
                .decode(encoded.trim())
                .map_err(|e| CryptoError::InvalidKey(format!("not valid base64: {}", e)))?,
        );
        Self::from_bytes(&decoded)
    }

    /// Load the key from the `CREDVAULT_KEY` environment variable.
    pub fn from_env() -> Result<Self, CryptoError> {
        let encoded = std::env::var(KEY_ENV_VAR).map_err(|_| {
            CryptoError::InvalidKey(format!("{} environment variable is not set", KEY_ENV_VAR))
        })?;
        Self::from_base64(&encoded)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_32_byte_key() {
        let key = EncryptionKey::from_bytes(&[7u8; 32]);
        assert!(key.is_ok());
    }

    #[test]
    fn test_short_key_rejected() {
        let err = EncryptionKey::from_bytes(&[7u8; 16]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey(_)));
    }

    #[test]
    fn test_long_key_rejected() {
        assert!(EncryptionKey::from_bytes(&[7u8; 33]).is_err());
    }

    #[test]
    fn test_base64_roundtrip() {
        let encoded = BASE64.encode([42u8; 32]);
        let key = EncryptionKey::from_base64(&encoded).unwrap();
        assert_eq!(key.as_bytes(), &[42u8; 32]);
    }

    #[test]
    fn test_base64_garbage_rejected() {
        assert!(EncryptionKey::from_base64("not-base64!!!").is_err());
    }

    #[test]
    fn test_base64_wrong_length_rejected() {
        // Valid base64, but decodes to 16 bytes
        let encoded = BASE64.encode([1u8; 16]);
        assert!(EncryptionKey::from_base64(&encoded).is_err());
    }
}
