// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! keyseal - passphrase-encrypted private key files.
//!
//! This is the binary entry point for the `keyseal` command.

mod change_passphrase;
mod decrypt;
mod encrypt;
mod inspect;
mod prompt;
mod report;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use keyseal_config::KeysealConfig;
use keyseal_core::KeysealError;
use tracing::debug;

use crate::change_passphrase::ChangePassphraseArgs;
use crate::decrypt::DecryptArgs;
use crate::encrypt::EncryptArgs;
use crate::inspect::InspectArgs;

/// keyseal - encrypt, decrypt and inspect private key files.
#[derive(Parser, Debug)]
#[command(name = "keyseal", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a private key into a new keystore file.
    Encrypt(EncryptArgs),
    /// Decrypt a keystore and show its address.
    Decrypt(DecryptArgs),
    /// Show a keystore's metadata without decrypting it.
    Inspect(InspectArgs),
    /// Re-encrypt a keystore under a new passphrase.
    ChangePassphrase(ChangePassphraseArgs),
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => keyseal_config::load_and_validate_path(path),
        None => keyseal_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            keyseal_config::render_errors(&errors);
            std::process::exit(report::EXIT_CONFIG);
        }
    };

    init_tracing(&config.log.level);
    debug!(
        keystore = %config.paths.encrypted_key,
        kdf = %config.vault.kdf,
        cipher = %config.vault.cipher,
        "configuration loaded"
    );

    if let Err(err) = run(&cli.command, &config) {
        report::print_error(&err);
        std::process::exit(report::exit_code(&err));
    }
}

fn run(command: &Commands, config: &KeysealConfig) -> Result<(), KeysealError> {
    match command {
        Commands::Encrypt(args) => encrypt::run_encrypt(config, args),
        Commands::Decrypt(args) => decrypt::run_decrypt(config, args),
        Commands::Inspect(args) => inspect::run_inspect(config, args),
        Commands::ChangePassphrase(args) => change_passphrase::run_change_passphrase(config, args),
    }
}

/// The keystore a command operates on: the explicit flag, else `paths.encrypted_key`.
fn keystore_path(explicit: Option<&Path>, config: &KeysealConfig) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.paths.encrypted_key))
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("keyseal={},warn", log_level.to_ascii_lowercase()))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
