// Credvault — Data models
//
// A credential row carries the encrypted secret and the IV it was produced
// with, never the plaintext. A user row carries the Argon2 hash, never the
// password. Display impls follow the same rule.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named container for credentials, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vault {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.name)
    }
}

/// A stored credential. The secret is present only as the
/// ciphertext/IV pair; decryption is a separate, explicit operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: Uuid,
    pub vault_id: Uuid,
    pub username: String,
    /// Hex-encoded AES-256-CBC ciphertext of the secret.
    pub password_encrypted: String,
    /// Hex-encoded IV the ciphertext was produced with.
    pub iv: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            self.id,
            self.username,
            self.url.as_deref().unwrap_or("no url")
        )
    }
}

/// Input for creating a single credential. `secret` is the plaintext; it is
/// encrypted before insertion and dropped immediately after.
pub struct NewCredential {
    pub username: String,
    pub secret: String,
    pub url: Option<String>,
}

/// Partial update of a credential. `None` fields are left unchanged; a
/// supplied `secret` is re-encrypted with a freshly generated IV, and a
/// supplied `vault_id` moves the credential to another vault.
#[derive(Default)]
pub struct CredentialUpdate {
    pub username: Option<String>,
    pub secret: Option<String>,
    pub url: Option<String>,
    pub vault_id: Option<Uuid>,
}

impl CredentialUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.secret.is_none()
            && self.url.is_none()
            && self.vault_id.is_none()
    }
}

/// One candidate row of a bulk import, e.g. parsed from a CSV export.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRow {
    pub username: String,
    #[serde(alias = "password")]
    pub secret: String,
    #[serde(default)]
    pub url: Option<String>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
