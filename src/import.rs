// Credvault — Bulk credential import
//
// Two-tier failure model, kept on purpose: rows failing validation are
// silently dropped (only the aggregate count is ever visible), while the
// insert itself is all-or-nothing — one failed statement rolls back the
// whole batch. Re-running an import inserts duplicates; there is no
// dedup key.

use chrono::Utc;
use rusqlite::params;
use uuid::Uuid;

use crate::crypto::SecretCipher;
use crate::store::{Database, ImportRow, StoreError};

pub struct ImportCoordinator<'a> {
    db: &'a Database,
    cipher: &'a SecretCipher,
}

impl<'a> ImportCoordinator<'a> {
    pub fn new(db: &'a Database, cipher: &'a SecretCipher) -> Self {
        Self { db, cipher }
    }

    /// Import candidate rows into a vault, returning how many were inserted.
    ///
    /// A row is accepted only if username and secret are both non-empty;
    /// the URL is optional. Each accepted row is encrypted under its own
    /// fresh IV.
    pub fn import(&self, vault_id: Uuid, rows: Vec<ImportRow>) -> Result<usize, StoreError> {
        self.require_vault(vault_id)?;

        let total = rows.len();
        let accepted: Vec<ImportRow> = rows
            .into_iter()
            .filter(|row| !row.username.is_empty() && !row.secret.is_empty())
            .collect();

        let dropped = total - accepted.len();
        if dropped > 0 {
            tracing::warn!(dropped, "Skipped import rows with missing username or secret");
        }

        if accepted.is_empty() {
            return Err(StoreError::NoValidRows);
        }

        let tx = self.db.conn().unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO credentials (id, vault_id, username, password_encrypted, iv, url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            for row in &accepted {
                let encrypted = self.cipher.encrypt(&row.secret);
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    vault_id.to_string(),
                    row.username,
                    encrypted.ciphertext,
                    encrypted.iv,
                    row.url,
                    Utc::now().to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;

        let imported = accepted.len();
        tracing::info!(vault_id = %vault_id, imported, "Credentials imported");
        Ok(imported)
    }

    fn require_vault(&self, vault_id: Uuid) -> Result<(), StoreError> {
        use rusqlite::OptionalExtension;

        let exists: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT id FROM vaults WHERE id = ?1",
                params![vault_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match exists {
            Some(_) => Ok(()),
            None => Err(StoreError::VaultNotFound(vault_id)),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
