// Credvault — Credential store
//
// Secrets are encrypted before insertion and listed only as ciphertext+IV;
// revealing a plaintext is a separate per-record operation on the cipher.
// Updates are partial: only the supplied fields change, and a supplied
// secret is always re-encrypted under a freshly generated IV.

use chrono::Utc;
use rusqlite::types::ToSql;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::authz::OwnershipGuard;
use crate::crypto::SecretCipher;

use super::models::{Credential, CredentialUpdate, NewCredential};
use super::{Database, StoreError};

pub struct CredentialStore<'a> {
    db: &'a Database,
    cipher: &'a SecretCipher,
}

impl<'a> CredentialStore<'a> {
    pub fn new(db: &'a Database, cipher: &'a SecretCipher) -> Self {
        Self { db, cipher }
    }

    /// Add a credential to a vault. The vault must exist; username and
    /// secret must be non-empty. The secret never reaches the database in
    /// plaintext.
    pub fn create(&self, vault_id: Uuid, cred: NewCredential) -> Result<Uuid, StoreError> {
        if cred.username.is_empty() || cred.secret.is_empty() {
            return Err(StoreError::Validation(
                "username and secret are required".to_string(),
            ));
        }
        self.require_vault(vault_id)?;

        let encrypted = self.cipher.encrypt(&cred.secret);
        let id = Uuid::new_v4();

        self.db.conn().execute(
            "INSERT INTO credentials (id, vault_id, username, password_encrypted, iv, url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id.to_string(),
                vault_id.to_string(),
                cred.username,
                encrypted.ciphertext,
                encrypted.iv,
                cred.url,
                Utc::now().to_rfc3339(),
            ],
        )?;

        tracing::info!(credential_id = %id, vault_id = %vault_id, "Credential added");
        Ok(id)
    }

    /// List the credentials in a vault, encrypted secret and IV included.
    /// Nothing is decrypted here.
    pub fn list(&self, vault_id: Uuid) -> Result<Vec<Credential>, StoreError> {
        self.require_vault(vault_id)?;

        let mut stmt = self.db.conn().prepare(
            "SELECT id, vault_id, username, password_encrypted, iv, url, created_at
             FROM credentials WHERE vault_id = ?1",
        )?;
        let rows = stmt.query_map(params![vault_id.to_string()], row_to_credential)?;

        let mut creds = Vec::new();
        for row in rows {
            creds.push(row?);
        }
        Ok(creds)
    }

    /// Fetch a single credential by id.
    pub fn get(&self, credential_id: Uuid) -> Result<Credential, StoreError> {
        let cred = self
            .db
            .conn()
            .query_row(
                "SELECT id, vault_id, username, password_encrypted, iv, url, created_at
                 FROM credentials WHERE id = ?1",
                params![credential_id.to_string()],
                row_to_credential,
            )
            .optional()?;

        cred.ok_or(StoreError::CredentialNotFound(credential_id))
    }

    /// Apply a partial update. Authorization is checked against the owner of
    /// the credential's current vault; when `vault_id` is supplied the
    /// credential moves there, and the destination vault's ownership is not
    /// re-verified.
    pub fn update(
        &self,
        credential_id: Uuid,
        caller: Uuid,
        update: CredentialUpdate,
    ) -> Result<(), StoreError> {
        if update.is_empty() {
            return Err(StoreError::Validation("no fields to update".to_string()));
        }
        OwnershipGuard::new(self.db).check_credential(credential_id, caller)?;

        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(username) = update.username {
            clauses.push("username = ?");
            values.push(Box::new(username));
        }
        if let Some(url) = update.url {
            clauses.push("url = ?");
            values.push(Box::new(url));
        }
        if let Some(new_vault) = update.vault_id {
            clauses.push("vault_id = ?");
            values.push(Box::new(new_vault.to_string()));
        }
        if let Some(secret) = update.secret {
            let encrypted = self.cipher.encrypt(&secret);
            clauses.push("password_encrypted = ?");
            values.push(Box::new(encrypted.ciphertext));
            clauses.push("iv = ?");
            values.push(Box::new(encrypted.iv));
        }

        let sql = format!(
            "UPDATE credentials SET {} WHERE id = ?",
            clauses.join(", ")
        );
        values.push(Box::new(credential_id.to_string()));

        self.db
            .conn()
            .execute(&sql, rusqlite::params_from_iter(values.iter()))?;

        tracing::info!(credential_id = %credential_id, "Credential updated");
        Ok(())
    }

    /// Delete a credential. The caller must own its vault.
    pub fn delete(&self, credential_id: Uuid, caller: Uuid) -> Result<(), StoreError> {
        OwnershipGuard::new(self.db).check_credential(credential_id, caller)?;

        self.db.conn().execute(
            "DELETE FROM credentials WHERE id = ?1",
            params![credential_id.to_string()],
        )?;

        tracing::info!(credential_id = %credential_id, "Credential deleted");
        Ok(())
    }

    fn require_vault(&self, vault_id: Uuid) -> Result<(), StoreError> {
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

fn row_to_credential(row: &rusqlite::Row<'_>) -> rusqlite::Result<Credential> {
    let id_str: String = row.get(0)?;
    let vault_id_str: String = row.get(1)?;
    let username: String = row.get(2)?;
    let password_encrypted: String = row.get(3)?;
    let iv: String = row.get(4)?;
    let url: Option<String> = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let vault_id = Uuid::parse_str(&vault_id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(Credential {
        id,
        vault_id,
        username,
        password_encrypted,
        iv,
        url,
        created_at,
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
