// Credvault — Secret cipher
//
// AES-256-CBC with PKCS#7 padding. Every encryption draws a fresh random
// 16-byte IV, so saving the same plaintext twice never yields the same
// ciphertext. IV and ciphertext are hex-encoded strings, which is also how
// they are stored alongside each credential row.
//
// CBC carries no integrity tag: a flipped ciphertext bit is not detected
// until decryption produces padding garbage or silently wrong plaintext.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;

use super::{CryptoError, EncryptionKey};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Length of the CBC initialization vector in bytes.
pub const IV_LEN: usize = 16;

/// A ciphertext together with the IV it was produced with. The pair is
/// inseparable: an IV is used for exactly one encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    /// Hex-encoded 16-byte initialization vector.
    pub iv: String,
    /// Hex-encoded AES-256-CBC ciphertext.
    pub ciphertext: String,
}

/// Encrypts and decrypts secret values with the process-wide key.
pub struct SecretCipher {
    key: EncryptionKey,
}

impl SecretCipher {
    pub fn new(key: EncryptionKey) -> Self {
        Self { key }
    }

    /// Encrypt a plaintext secret with a freshly generated random IV.
    pub fn encrypt(&self, plaintext: &str) -> EncryptedSecret {
        let mut iv = [0u8; IV_LEN];
        rand::rng().fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(self.key.as_bytes().into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        EncryptedSecret {
            iv: hex::encode(iv),
            ciphertext: hex::encode(ciphertext),
        }
    }

    /// Decrypt a hex-encoded ciphertext with its hex-encoded IV.
    ///
    /// Takes only the ciphertext and IV; no ownership binding is enforced
    /// at this layer.
    pub fn decrypt(&self, ciphertext_hex: &str, iv_hex: &str) -> Result<String, CryptoError> {
        let iv_bytes = hex::decode(iv_hex)
            .map_err(|e| CryptoError::MalformedInput(format!("IV is not valid hex: {}", e)))?;
        let iv: [u8; IV_LEN] = iv_bytes.try_into().map_err(|v: Vec<u8>| {
            CryptoError::MalformedInput(format!("IV must be {} bytes, got {}", IV_LEN, v.len()))
        })?;

        let ciphertext = hex::decode(ciphertext_hex).map_err(|e| {
            CryptoError::MalformedInput(format!("ciphertext is not valid hex: {}", e))
        })?;

        let plaintext = Aes256CbcDec::new(self.key.as_bytes().into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CryptoError::DecryptFailed)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptFailed)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
