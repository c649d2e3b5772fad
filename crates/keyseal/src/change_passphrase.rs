// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyseal change-passphrase` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use keyseal_config::KeysealConfig;
use keyseal_core::KeysealError;
use keyseal_vault::{read_keystore, write_keystore, EncryptedSecret, KeyVault};

use crate::prompt::{self, NEW_PASSPHRASE_ENV_VAR, PASSPHRASE_ENV_VAR};
use crate::report;

/// Arguments for `keyseal change-passphrase`.
#[derive(Args, Debug)]
pub struct ChangePassphraseArgs {
    /// Keystore to re-encrypt [default: paths.encrypted_key]
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Environment variable holding the current passphrase
    #[arg(long, value_name = "VAR", default_value = PASSPHRASE_ENV_VAR)]
    pub passphrase_env: String,

    /// Environment variable holding the new passphrase
    #[arg(long, value_name = "VAR", default_value = NEW_PASSPHRASE_ENV_VAR)]
    pub new_passphrase_env: String,
}

/// Run the `keyseal change-passphrase` command.
pub fn run_change_passphrase(
    config: &KeysealConfig,
    args: &ChangePassphraseArgs,
) -> Result<(), KeysealError> {
    let path = crate::keystore_path(args.file.as_deref(), config);
    let rotated = change_passphrase(config, &path, args)?;

    report::header("change-passphrase");
    report::success("passphrase changed", report::use_color());
    report::field("Keystore", path.display());
    report::field("Id", rotated.id);
    println!();
    Ok(())
}

fn change_passphrase(
    config: &KeysealConfig,
    path: &Path,
    args: &ChangePassphraseArgs,
) -> Result<EncryptedSecret, KeysealError> {
    let vault = KeyVault::from_config(&config.vault)?;
    let record = read_keystore(path)?;

    let current = prompt::get_passphrase(&args.passphrase_env)?;
    // Check the current passphrase before asking for a new one.
    KeyVault::decrypt(&record, &current)?;

    let new = prompt::get_passphrase_with_confirm(&args.new_passphrase_env)?;
    let rotated = vault.reencrypt(&record, &current, &new)?;
    write_keystore(path, &rotated, true)?;

    Ok(rotated)
}
