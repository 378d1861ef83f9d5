// Credvault — Authentication Service
//
// Passwords are hashed with Argon2id into PHC strings (random per-user salt,
// tunable work factor) before they touch the database. The plaintext is
// never stored and never logged.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{DateTime, Utc};
use rand::RngCore;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::store::Database;

use super::AuthError;

// Argon2id parameters, OWASP interactive-login baseline:
// m=19456 KiB (19 MiB), t=2 iterations, p=1 lane
const ARGON2_M_COST: u32 = 19456;
const ARGON2_T_COST: u32 = 2;
const ARGON2_P_COST: u32 = 1;

/// A user row as shown in listings: id and email, never the hash.
#[derive(Debug, Clone)]
pub struct UserListing {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

pub struct AuthService<'a> {
    db: &'a Database,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn hasher() -> Result<Argon2<'static>, AuthError> {
        let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
            .map_err(|e| AuthError::Hash(format!("invalid Argon2 params: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Register a new user. The email must be globally unique.
    pub fn register(&self, email: &str, password: &str) -> Result<Uuid, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let mut salt_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| AuthError::Hash(format!("salt encoding failed: {}", e)))?;

        let password_hash = Self::hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();

        let id = Uuid::new_v4();
        let inserted = self.db.conn().execute(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.to_string(),
                email,
                password_hash,
                Utc::now().to_rfc3339()
            ],
        );

        match inserted {
            Ok(_) => {
                tracing::info!(user_id = %id, "User registered");
                Ok(id)
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(AuthError::DuplicateEmail)
            }
            Err(e) => Err(AuthError::Database(e)),
        }
    }

    /// Authenticate by email and password, returning the user id.
    ///
    /// Unknown email and wrong password both come back as
    /// `InvalidCredentials` so the two cases are indistinguishable.
    pub fn login(&self, email: &str, password: &str) -> Result<Uuid, AuthError> {
        let row: Option<(String, String)> = self
            .db
            .conn()
            .query_row(
                "SELECT id, password_hash FROM users WHERE email = ?1",
                params![email],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (id_str, stored_hash) = match row {
            Some(pair) => pair,
            None => return Err(AuthError::InvalidCredentials),
        };

        let parsed = PasswordHash::new(&stored_hash)
            .map_err(|e| AuthError::Hash(format!("stored hash is malformed: {}", e)))?;

        Self::hasher()?
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let id = Uuid::parse_str(&id_str)
            .map_err(|e| AuthError::Hash(format!("stored user id is not a UUID: {}", e)))?;

        tracing::info!(user_id = %id, "User logged in");
        Ok(id)
    }

    /// List registered users (id, email, creation time — never hashes).
    pub fn list_users(&self) -> Result<Vec<UserListing>, AuthError> {
        let mut stmt = self
            .db
            .conn()
            .prepare("SELECT id, email, created_at FROM users")?;

        let rows = stmt.query_map([], |row| {
            let id_str: String = row.get(0)?;
            let email: String = row.get(1)?;
            let created_at_str: String = row.get(2)?;

            let id = Uuid::parse_str(&id_str).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());

            Ok(UserListing {
                id,
                email,
                created_at,
            })
        })?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_login() {
        let db = Database::open_in_memory().unwrap();
        let auth = AuthService::new(&db);

        let registered = auth.register("a@x.com", "pw123").unwrap();
        let logged_in = auth.login("a@x.com", "pw123").unwrap();
        assert_eq!(registered, logged_in);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = Database::open_in_memory().unwrap();
        let auth = AuthService::new(&db);

        auth.register("a@x.com", "pw123").unwrap();
        let err = auth.register("a@x.com", "pw456").unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[test]
    fn test_register_rejects_empty_fields() {
        let db = Database::open_in_memory().unwrap();
        let auth = AuthService::new(&db);

        assert!(matches!(
            auth.register("", "pw"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            auth.register("a@x.com", ""),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_plaintext_password_is_not_stored() {
        let db = Database::open_in_memory().unwrap();
        let auth = AuthService::new(&db);

        auth.register("a@x.com", "pw123-plaintext").unwrap();

        let stored: String = db
            .conn()
            .query_row(
                "SELECT password_hash FROM users WHERE email = 'a@x.com'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(!stored.contains("pw123-plaintext"));
        assert!(stored.starts_with("$argon2id$"));
    }

    #[test]
    fn test_wrong_password_and_unknown_email_are_indistinguishable() {
        let db = Database::open_in_memory().unwrap();
        let auth = AuthService::new(&db);

        auth.register("a@x.com", "pw123").unwrap();

        let wrong_password = auth.login("a@x.com", "wrong").unwrap_err();
        let unknown_email = auth.login("nobody@x.com", "anything").unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[test]
    fn test_same_password_different_users_different_hashes() {
        let db = Database::open_in_memory().unwrap();
        let auth = AuthService::new(&db);

        auth.register("a@x.com", "shared-pw").unwrap();
        auth.register("b@x.com", "shared-pw").unwrap();

        let hashes: Vec<String> = {
            let mut stmt = db
                .conn()
                .prepare("SELECT password_hash FROM users")
                .unwrap();
            let rows = stmt.query_map([], |row| row.get(0)).unwrap();
            rows.map(|r| r.unwrap()).collect()
        };
        assert_ne!(hashes[0], hashes[1], "salts must randomize the hash");
    }

    #[test]
    fn test_list_users_shows_email_not_hash() {
        let db = Database::open_in_memory().unwrap();
        let auth = AuthService::new(&db);

        auth.register("a@x.com", "pw123").unwrap();
        let users = auth.list_users().unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "a@x.com");
    }
}
