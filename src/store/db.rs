// Credvault — SQLite Database Management
//
// Opens the vault database and runs idempotent schema migrations. Foreign
// keys are enforced; cascading semantics are still handled explicitly in the
// stores (children deleted before their parent) so the deletion order is
// visible in the code rather than hidden in the schema.

use std::path::Path;

use rusqlite::Connection;

use super::StoreError;

/// Wrapper around the vault's SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self { conn };
        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing only).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run schema migrations to create or update tables.
    fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id              TEXT PRIMARY KEY,
                email           TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS vaults (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL REFERENCES users(id),
                name            TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS credentials (
                id                  TEXT PRIMARY KEY,
                vault_id            TEXT NOT NULL REFERENCES vaults(id),
                username            TEXT NOT NULL,
                password_encrypted  TEXT NOT NULL,
                iv                  TEXT NOT NULL,
                url                 TEXT,
                created_at          TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_vaults_user
                ON vaults(user_id);

            CREATE INDEX IF NOT EXISTS idx_credentials_vault
                ON credentials(vault_id);
            ",
        )?;

        tracing::debug!("Database migrations completed successfully");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
