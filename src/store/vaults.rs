// Credvault — Vault store
//
// Lifecycle operations for vaults. Deleting a vault removes its credentials
// first, then the vault itself, inside one transaction: a reader can never
// observe a credential whose vault is gone.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::authz::OwnershipGuard;

use super::models::Vault;
use super::{Database, StoreError};

pub struct VaultStore<'a> {
    db: &'a Database,
}

impl<'a> VaultStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a vault owned by `owner`. The owner must exist.
    pub fn create(&self, owner: Uuid, name: &str) -> Result<Uuid, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation("vault name is required".to_string()));
        }
        self.require_user(owner)?;

        let id = Uuid::new_v4();
        self.db.conn().execute(
            "INSERT INTO vaults (id, user_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.to_string(),
                owner.to_string(),
                name,
                Utc::now().to_rfc3339()
            ],
        )?;

        tracing::info!(vault_id = %id, owner = %owner, "Vault created");
        Ok(id)
    }

    /// List the vaults owned by `owner`. No ordering is guaranteed.
    pub fn list(&self, owner: Uuid) -> Result<Vec<Vault>, StoreError> {
        self.require_user(owner)?;

        let mut stmt = self.db.conn().prepare(
            "SELECT id, user_id, name, created_at FROM vaults WHERE user_id = ?1",
        )?;
        let rows = stmt.query_map(params![owner.to_string()], row_to_vault)?;

        let mut vaults = Vec::new();
        for row in rows {
            vaults.push(row?);
        }
        Ok(vaults)
    }

    /// Rename a vault. The caller must own it.
    pub fn rename(&self, vault_id: Uuid, caller: Uuid, new_name: &str) -> Result<(), StoreError> {
        if new_name.trim().is_empty() {
            return Err(StoreError::Validation("vault name is required".to_string()));
        }
        OwnershipGuard::new(self.db).check_vault(vault_id, caller)?;

        self.db.conn().execute(
            "UPDATE vaults SET name = ?1 WHERE id = ?2",
            params![new_name, vault_id.to_string()],
        )?;

        tracing::info!(vault_id = %vault_id, "Vault renamed");
        Ok(())
    }

    /// Delete a vault and all credentials inside it. Returns the number of
    /// credentials removed. Children go first, then the parent, in one
    /// transaction.
    pub fn delete(&self, vault_id: Uuid, caller: Uuid) -> Result<usize, StoreError> {
        OwnershipGuard::new(self.db).check_vault(vault_id, caller)?;

        let tx = self.db.conn().unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM credentials WHERE vault_id = ?1",
            params![vault_id.to_string()],
        )?;
        tx.execute(
            "DELETE FROM vaults WHERE id = ?1",
            params![vault_id.to_string()],
        )?;
        tx.commit()?;

        tracing::info!(vault_id = %vault_id, deleted_credentials = removed, "Vault deleted");
        Ok(removed)
    }

    fn require_user(&self, user_id: Uuid) -> Result<(), StoreError> {
        let exists: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT id FROM users WHERE id = ?1",
                params![user_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match exists {
            Some(_) => Ok(()),
            None => Err(StoreError::UserNotFound(user_id)),
        }
    }
}

fn row_to_vault(row: &rusqlite::Row<'_>) -> rusqlite::Result<Vault> {
    let id_str: String = row.get(0)?;
    let user_id_str: String = row.get(1)?;
    let name: String = row.get(2)?;
    let created_at_str: String = row.get(3)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let user_id = Uuid::parse_str(&user_id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(Vault {
        id,
        user_id,
        name,
        created_at,
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{EncryptionKey, SecretCipher};
    use crate::store::{CredentialStore, NewCredential};

    fn setup() -> (Database, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let user_id = Uuid::new_v4();
        db.conn()
            .execute(
                "INSERT INTO users (id, email, password_hash, created_at) VALUES (?1, ?2, 'h', ?3)",
                params![user_id.to_string(), "owner@x.com", Utc::now().to_rfc3339()],
            )
            .unwrap();
        (db, user_id)
    }

    fn test_cipher() -> SecretCipher {
        SecretCipher::new(EncryptionKey::from_bytes(&[3u8; 32]).unwrap())
    }

    #[test]
    fn test_create_and_list() {
        let (db, user_id) = setup();
        let store = VaultStore::new(&db);

        let v1 = store.create(user_id, "Personal").unwrap();
        let v2 = store.create(user_id, "Work").unwrap();

        let vaults = store.list(user_id).unwrap();
        assert_eq!(vaults.len(), 2);
        let ids: Vec<Uuid> = vaults.iter().map(|v| v.id).collect();
        assert!(ids.contains(&v1) && ids.contains(&v2));
    }

    #[test]
    fn test_create_with_unknown_owner_fails() {
        let (db, _) = setup();
        let store = VaultStore::new(&db);

        let err = store.create(Uuid::new_v4(), "Ghost").unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound(_)));
    }

    #[test]
    fn test_create_with_empty_name_fails() {
        let (db, user_id) = setup();
        let store = VaultStore::new(&db);

        let err = store.create(user_id, "  ").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_list_for_unknown_owner_fails() {
        let (db, _) = setup();
        let store = VaultStore::new(&db);

        assert!(matches!(
            store.list(Uuid::new_v4()),
            Err(StoreError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_rename() {
        let (db, user_id) = setup();
        let store = VaultStore::new(&db);
        let vault_id = store.create(user_id, "Personal").unwrap();

        store.rename(vault_id, user_id, "Private").unwrap();

        let vaults = store.list(user_id).unwrap();
        assert_eq!(vaults[0].name, "Private");
    }

    #[test]
    fn test_rename_by_stranger_is_unauthorized() {
        let (db, user_id) = setup();
        let store = VaultStore::new(&db);
        let vault_id = store.create(user_id, "Personal").unwrap();

        let other = Uuid::new_v4();
        let err = store.rename(vault_id, other, "Stolen").unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
    }

    #[test]
    fn test_delete_cascades_and_counts() {
        let (db, user_id) = setup();
        let vaults = VaultStore::new(&db);
        let vault_id = vaults.create(user_id, "Personal").unwrap();

        let cipher = test_cipher();
        let creds = CredentialStore::new(&db, &cipher);
        for i in 0..3 {
            creds
                .create(
                    vault_id,
                    NewCredential {
                        username: format!("user{}", i),
                        secret: format!("secret{}", i),
                        url: None,
                    },
                )
                .unwrap();
        }

        let removed = vaults.delete(vault_id, user_id).unwrap();
        assert_eq!(removed, 3);

        // The vault id no longer resolves
        let err = creds.list(vault_id).unwrap_err();
        assert!(matches!(err, StoreError::VaultNotFound(_)));

        // And no orphaned credential rows remain
        let orphans: i64 = db
            .conn()
            .query_row(
                "SELECT count(*) FROM credentials WHERE vault_id = ?1",
                params![vault_id.to_string()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_delete_empty_vault_counts_zero() {
        let (db, user_id) = setup();
        let store = VaultStore::new(&db);
        let vault_id = store.create(user_id, "Empty").unwrap();

        assert_eq!(store.delete(vault_id, user_id).unwrap(), 0);
        assert!(store.list(user_id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_vault_is_not_found() {
        let (db, user_id) = setup();
        let store = VaultStore::new(&db);

        let err = store.delete(Uuid::new_v4(), user_id).unwrap_err();
        assert!(matches!(err, StoreError::VaultNotFound(_)));
    }

    #[test]
    fn test_delete_by_stranger_is_unauthorized() {
        let (db, user_id) = setup();
        let store = VaultStore::new(&db);
        let vault_id = store.create(user_id, "Personal").unwrap();

        let err = store.delete(vault_id, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));

        // Vault untouched
        assert_eq!(store.list(user_id).unwrap().len(), 1);
    }
}
