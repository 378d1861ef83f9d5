// Credvault — Application Entry Point
//
// Parses CLI arguments, initializes structured logging (which never emits
// secret values or plaintext passwords), and dispatches to the command
// handler.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use credvault::cli::{execute, Cli};

fn main() {
    // RUST_LOG=credvault=debug for verbose output; the default `info` level
    // logs only ids and counts.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("credvault=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
