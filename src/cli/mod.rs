// Credvault — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: register, login, users, vault, cred, import.

mod commands;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// Credvault — encrypted credentials vault.
#[derive(Parser, Debug)]
#[command(name = "credvault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new user. Prompts for the password.
    Register {
        /// Email address (must be unique).
        #[arg(long)]
        email: String,
    },

    /// Log in and print the user id.
    Login {
        /// Email address.
        #[arg(long)]
        email: String,
    },

    /// List registered users (id and email only).
    Users,

    /// Manage vaults.
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },

    /// Manage credentials.
    Cred {
        #[command(subcommand)]
        action: CredAction,
    },

    /// Bulk-import credentials into a vault from a CSV file
    /// (columns: username, password, url).
    Import {
        /// Target vault UUID.
        #[arg(long)]
        vault: String,

        /// Path to the CSV file.
        #[arg(long)]
        file: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum VaultAction {
    /// Create a vault.
    Create {
        /// Owning user UUID.
        #[arg(long)]
        user: String,

        /// Vault name.
        #[arg(long)]
        name: String,
    },

    /// List a user's vaults.
    List {
        /// Owning user UUID.
        #[arg(long)]
        user: String,
    },

    /// Rename a vault.
    Rename {
        /// Vault UUID.
        id: String,

        /// Calling user UUID (must own the vault).
        #[arg(long)]
        user: String,

        /// New name.
        #[arg(long)]
        name: String,
    },

    /// Delete a vault and every credential inside it.
    Delete {
        /// Vault UUID.
        id: String,

        /// Calling user UUID (must own the vault).
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CredAction {
    /// Add a credential to a vault. Prompts for the secret unless --secret
    /// is given.
    Add {
        /// Target vault UUID.
        #[arg(long)]
        vault: String,

        /// Username for the credential.
        #[arg(long)]
        username: String,

        /// The secret value. Prefer the interactive prompt to keep secrets
        /// out of shell history.
        #[arg(long)]
        secret: Option<String>,

        /// Optional URL the credential belongs to.
        #[arg(long)]
        url: Option<String>,
    },

    /// List the credentials in a vault (encrypted, never plaintext).
    List {
        /// Vault UUID.
        vault: String,
    },

    /// Update a credential: any of username, secret, url, or a new vault.
    Update {
        /// Credential UUID.
        id: String,

        /// Calling user UUID (must own the credential's current vault).
        #[arg(long)]
        user: String,

        /// New username.
        #[arg(long)]
        username: Option<String>,

        /// New secret (re-encrypted with a fresh IV).
        #[arg(long)]
        secret: Option<String>,

        /// New URL.
        #[arg(long)]
        url: Option<String>,

        /// Move to this vault UUID.
        #[arg(long)]
        vault: Option<String>,
    },

    /// Delete a credential.
    Delete {
        /// Credential UUID.
        id: String,

        /// Calling user UUID (must own the credential's vault).
        #[arg(long)]
        user: String,
    },

    /// Decrypt and print one credential's secret.
    Reveal {
        /// Credential UUID.
        id: String,
    },
}
