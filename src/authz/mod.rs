// Credvault — Ownership Guard
//
// Resolves the ownership chain (credential -> vault -> user) and checks it
// against the claimed caller. Every mutating vault or credential operation
// goes through one of the check_* pairs; ownership is always re-derived from
// the store, never cached and never taken from the caller beyond the id
// being resolved.

use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::store::{Database, StoreError};

pub struct OwnershipGuard<'a> {
    db: &'a Database,
}

impl<'a> OwnershipGuard<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Resolve the owning user of a vault.
    pub fn vault_owner(&self, vault_id: Uuid) -> Result<Uuid, StoreError> {
        let owner: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT user_id FROM vaults WHERE id = ?1",
                params![vault_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match owner {
            Some(id) => parse_uuid(&id),
            None => Err(StoreError::VaultNotFound(vault_id)),
        }
    }

    /// Resolve the owning user of a credential, joining through its vault.
    pub fn credential_owner(&self, credential_id: Uuid) -> Result<Uuid, StoreError> {
        let owner: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT v.user_id
                 FROM credentials c
                 JOIN vaults v ON v.id = c.vault_id
                 WHERE c.id = ?1",
                params![credential_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match owner {
            Some(id) => parse_uuid(&id),
            None => Err(StoreError::CredentialNotFound(credential_id)),
        }
    }

    /// Check a resolved owner against the claimed caller.
    pub fn authorize(&self, owner: Uuid, caller: Uuid) -> Result<(), StoreError> {
        if owner == caller {
            Ok(())
        } else {
            tracing::warn!(%owner, %caller, "Ownership check failed");
            Err(StoreError::Unauthorized)
        }
    }

    /// Resolve-then-authorize for a vault mutation.
    pub fn check_vault(&self, vault_id: Uuid, caller: Uuid) -> Result<(), StoreError> {
        let owner = self.vault_owner(vault_id)?;
        self.authorize(owner, caller)
    }

    /// Resolve-then-authorize for a credential mutation, against the
    /// credential's *current* vault.
    pub fn check_credential(&self, credential_id: Uuid, caller: Uuid) -> Result<(), StoreError> {
        let owner = self.credential_owner(credential_id)?;
        self.authorize(owner, caller)
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw)
        .map_err(|e| StoreError::Validation(format!("stored id is not a UUID: {}", e)))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn seed(db: &Database) -> (Uuid, Uuid, Uuid) {
        let user_id = Uuid::new_v4();
        let vault_id = Uuid::new_v4();
        let cred_id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        db.conn()
            .execute(
                "INSERT INTO users (id, email, password_hash, created_at) VALUES (?1, ?2, 'h', ?3)",
                params![user_id.to_string(), "owner@x.com", now],
            )
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO vaults (id, user_id, name, created_at) VALUES (?1, ?2, 'Personal', ?3)",
                params![vault_id.to_string(), user_id.to_string(), now],
            )
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO credentials (id, vault_id, username, password_encrypted, iv, url, created_at)
                 VALUES (?1, ?2, 'bob', 'aabb', 'ccdd', NULL, ?3)",
                params![cred_id.to_string(), vault_id.to_string(), now],
            )
            .unwrap();

        (user_id, vault_id, cred_id)
    }

    #[test]
    fn test_vault_owner_resolves() {
        let db = Database::open_in_memory().unwrap();
        let (user_id, vault_id, _) = seed(&db);
        let guard = OwnershipGuard::new(&db);

        assert_eq!(guard.vault_owner(vault_id).unwrap(), user_id);
    }

    #[test]
    fn test_missing_vault_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let guard = OwnershipGuard::new(&db);

        let err = guard.vault_owner(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::VaultNotFound(_)));
    }

    #[test]
    fn test_credential_owner_joins_through_vault() {
        let db = Database::open_in_memory().unwrap();
        let (user_id, _, cred_id) = seed(&db);
        let guard = OwnershipGuard::new(&db);

        assert_eq!(guard.credential_owner(cred_id).unwrap(), user_id);
    }

    #[test]
    fn test_missing_credential_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let guard = OwnershipGuard::new(&db);

        let err = guard.credential_owner(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::CredentialNotFound(_)));
    }

    #[test]
    fn test_authorize_distinguishes_owner_from_stranger() {
        let db = Database::open_in_memory().unwrap();
        let (user_id, vault_id, cred_id) = seed(&db);
        let guard = OwnershipGuard::new(&db);

        assert!(guard.check_vault(vault_id, user_id).is_ok());
        assert!(guard.check_credential(cred_id, user_id).is_ok());

        let stranger = Uuid::new_v4();
        assert!(matches!(
            guard.check_vault(vault_id, stranger),
            Err(StoreError::Unauthorized)
        ));
        assert!(matches!(
            guard.check_credential(cred_id, stranger),
            Err(StoreError::Unauthorized)
        ));
    }
}
