// Credvault — CLI Command Handlers
//
// Each function handles one CLI subcommand, coordinating the auth, store,
// crypto, and import modules. The encryption key is validated up front for
// every invocation: a bad key means nothing runs.

use std::path::PathBuf;

use uuid::Uuid;

use crate::auth::AuthService;
use crate::crypto::{EncryptionKey, SecretCipher};
use crate::error::CredvaultError;
use crate::import::ImportCoordinator;
use crate::store::{CredentialStore, CredentialUpdate, Database, ImportRow, NewCredential, VaultStore};

use super::{Commands, CredAction, VaultAction};

/// Default directory for credvault data files.
fn data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("credvault")
}

/// Path to the database file (override with CREDVAULT_DB).
fn db_path() -> PathBuf {
    match std::env::var("CREDVAULT_DB") {
        Ok(path) => PathBuf::from(path),
        Err(_) => data_dir().join("credvault.db"),
    }
}

/// Execute the parsed CLI command.
pub fn execute(command: Commands) -> Result<(), CredvaultError> {
    // Fail fast: a missing or malformed key refuses to run anything.
    let key = EncryptionKey::from_env()?;
    let cipher = SecretCipher::new(key);

    let path = db_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db = Database::open(&path)?;

    match command {
        Commands::Register { email } => cmd_register(&db, email),
        Commands::Login { email } => cmd_login(&db, email),
        Commands::Users => cmd_users(&db),
        Commands::Vault { action } => match action {
            VaultAction::Create { user, name } => cmd_vault_create(&db, user, name),
            VaultAction::List { user } => cmd_vault_list(&db, user),
            VaultAction::Rename { id, user, name } => cmd_vault_rename(&db, id, user, name),
            VaultAction::Delete { id, user } => cmd_vault_delete(&db, id, user),
        },
        Commands::Cred { action } => match action {
            CredAction::Add {
                vault,
                username,
                secret,
                url,
            } => cmd_cred_add(&db, &cipher, vault, username, secret, url),
            CredAction::List { vault } => cmd_cred_list(&db, &cipher, vault),
            CredAction::Update {
                id,
                user,
                username,
                secret,
                url,
                vault,
            } => cmd_cred_update(&db, &cipher, id, user, username, secret, url, vault),
            CredAction::Delete { id, user } => cmd_cred_delete(&db, &cipher, id, user),
            CredAction::Reveal { id } => cmd_cred_reveal(&db, &cipher, id),
        },
        Commands::Import { vault, file } => cmd_import(&db, &cipher, vault, file),
    }
}

// ─── Users ───────────────────────────────────────────────────────────────────

fn cmd_register(db: &Database, email: String) -> Result<(), CredvaultError> {
    let password = prompt_secret("Password: ")?;
    let id = AuthService::new(db).register(&email, &password)?;

    println!("✓ User registered");
    println!("  ID:    {}", id);
    println!("  Email: {}", email);
    Ok(())
}

fn cmd_login(db: &Database, email: String) -> Result<(), CredvaultError> {
    let password = prompt_secret("Password: ")?;
    let id = AuthService::new(db).login(&email, &password)?;

    println!("✓ Logged in");
    println!("  User ID: {}", id);
    Ok(())
}

fn cmd_users(db: &Database) -> Result<(), CredvaultError> {
    let users = AuthService::new(db).list_users()?;

    if users.is_empty() {
        println!("No users registered yet.");
        return Ok(());
    }

    println!("Registered users ({}):\n", users.len());
    for user in &users {
        println!(
            "  {} │ {} │ {}",
            user.id,
            user.email,
            user.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

// ─── Vaults ──────────────────────────────────────────────────────────────────

fn cmd_vault_create(db: &Database, user: String, name: String) -> Result<(), CredvaultError> {
    let owner = parse_uuid(&user)?;
    let id = VaultStore::new(db).create(owner, &name)?;

    println!("✓ Vault created");
    println!("  ID:   {}", id);
    println!("  Name: {}", name);
    Ok(())
}

fn cmd_vault_list(db: &Database, user: String) -> Result<(), CredvaultError> {
    let owner = parse_uuid(&user)?;
    let vaults = VaultStore::new(db).list(owner)?;

    if vaults.is_empty() {
        println!("No vaults yet. Create one with: credvault vault create --user <id> --name <name>");
        return Ok(());
    }

    println!("Vaults ({}):\n", vaults.len());
    for vault in &vaults {
        println!(
            "  {} │ {:20} │ {}",
            vault.id,
            vault.name,
            vault.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

fn cmd_vault_rename(
    db: &Database,
    id: String,
    user: String,
    name: String,
) -> Result<(), CredvaultError> {
    let vault_id = parse_uuid(&id)?;
    let caller = parse_uuid(&user)?;
    VaultStore::new(db).rename(vault_id, caller, &name)?;

    println!("✓ Vault {} renamed to {}", vault_id, name);
    Ok(())
}

fn cmd_vault_delete(db: &Database, id: String, user: String) -> Result<(), CredvaultError> {
    let vault_id = parse_uuid(&id)?;
    let caller = parse_uuid(&user)?;
    let removed = VaultStore::new(db).delete(vault_id, caller)?;

    println!("✓ Vault {} deleted ({} credentials removed)", vault_id, removed);
    Ok(())
}

// ─── Credentials ─────────────────────────────────────────────────────────────

fn cmd_cred_add(
    db: &Database,
    cipher: &SecretCipher,
    vault: String,
    username: String,
    secret: Option<String>,
    url: Option<String>,
) -> Result<(), CredvaultError> {
    let vault_id = parse_uuid(&vault)?;
    let secret = match secret {
        Some(s) => s,
        None => prompt_secret("Secret: ")?,
    };

    let id = CredentialStore::new(db, cipher).create(
        vault_id,
        NewCredential {
            username: username.clone(),
            secret,
            url,
        },
    )?;

    println!("✓ Credential added");
    println!("  ID:       {}", id);
    println!("  Username: {}", username);
    Ok(())
}

fn cmd_cred_list(db: &Database, cipher: &SecretCipher, vault: String) -> Result<(), CredvaultError> {
    let vault_id = parse_uuid(&vault)?;
    let creds = CredentialStore::new(db, cipher).list(vault_id)?;

    if creds.is_empty() {
        println!("No credentials in this vault.");
        return Ok(());
    }

    println!("Credentials ({}):\n", creds.len());
    for cred in &creds {
        println!(
            "  {} │ {:20} │ {}",
            cred.id,
            cred.username,
            cred.url.as_deref().unwrap_or("-"),
        );
    }
    println!("\nSecrets stay encrypted; reveal one with: credvault cred reveal <id>");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_cred_update(
    db: &Database,
    cipher: &SecretCipher,
    id: String,
    user: String,
    username: Option<String>,
    secret: Option<String>,
    url: Option<String>,
    vault: Option<String>,
) -> Result<(), CredvaultError> {
    let credential_id = parse_uuid(&id)?;
    let caller = parse_uuid(&user)?;
    let vault_id = vault.as_deref().map(parse_uuid).transpose()?;

    CredentialStore::new(db, cipher).update(
        credential_id,
        caller,
        CredentialUpdate {
            username,
            secret,
            url,
            vault_id,
        },
    )?;

    println!("✓ Credential {} updated", credential_id);
    Ok(())
}

fn cmd_cred_delete(
    db: &Database,
    cipher: &SecretCipher,
    id: String,
    user: String,
) -> Result<(), CredvaultError> {
    let credential_id = parse_uuid(&id)?;
    let caller = parse_uuid(&user)?;
    CredentialStore::new(db, cipher).delete(credential_id, caller)?;

    println!("✓ Credential {} deleted", credential_id);
    Ok(())
}

fn cmd_cred_reveal(db: &Database, cipher: &SecretCipher, id: String) -> Result<(), CredvaultError> {
    let credential_id = parse_uuid(&id)?;
    let cred = CredentialStore::new(db, cipher).get(credential_id)?;
    // Decryption takes only ciphertext and IV; ownership is not checked here.
    let plaintext = cipher.decrypt(&cred.password_encrypted, &cred.iv)?;

    println!("Username: {}", cred.username);
    if let Some(ref url) = cred.url {
        println!("URL:      {}", url);
    }
    println!("Secret:   {}", plaintext);
    Ok(())
}

// ─── Import ──────────────────────────────────────────────────────────────────

fn cmd_import(
    db: &Database,
    cipher: &SecretCipher,
    vault: String,
    file: String,
) -> Result<(), CredvaultError> {
    let vault_id = parse_uuid(&vault)?;
    let rows = read_csv_rows(&file)?;
    let total = rows.len();

    let imported = ImportCoordinator::new(db, cipher).import(vault_id, rows)?;

    println!("✓ Imported {} of {} rows into vault {}", imported, total, vault_id);
    Ok(())
}

/// Read candidate rows from a CSV file with a `username,password,url` header
/// (a `secret` column is accepted in place of `password`).
fn read_csv_rows(path: &str) -> Result<Vec<ImportRow>, CredvaultError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| CredvaultError::Other(format!("cannot read CSV file: {}", e)))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: ImportRow =
            record.map_err(|e| CredvaultError::Other(format!("malformed CSV row: {}", e)))?;
        rows.push(row);
    }
    Ok(rows)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn parse_uuid(raw: &str) -> Result<Uuid, CredvaultError> {
    Uuid::parse_str(raw).map_err(|e| CredvaultError::Other(format!("Invalid UUID: {}", e)))
}

fn prompt_secret(prompt: &str) -> Result<String, CredvaultError> {
    rpassword::prompt_password(prompt)
        .map_err(|e| CredvaultError::Other(format!("failed to read input: {}", e)))
}
