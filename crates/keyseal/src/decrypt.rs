// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyseal decrypt` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use keyseal_config::KeysealConfig;
use keyseal_core::KeysealError;
use keyseal_vault::{read_keystore, KeyVault, RawSecret};

use crate::prompt::{self, PASSPHRASE_ENV_VAR};
use crate::report;

/// Arguments for `keyseal decrypt`.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Keystore to decrypt [default: paths.encrypted_key]
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Environment variable holding the passphrase
    #[arg(long, value_name = "VAR", default_value = PASSPHRASE_ENV_VAR)]
    pub passphrase_env: String,

    /// Print the private key itself
    #[arg(long)]
    pub reveal: bool,
}

/// Run the `keyseal decrypt` command.
///
/// The private key is only printed with `--reveal`.
pub fn run_decrypt(config: &KeysealConfig, args: &DecryptArgs) -> Result<(), KeysealError> {
    let path = crate::keystore_path(args.file.as_deref(), config);
    let secret = decrypt_file(&path, &args.passphrase_env)?;
    let address = secret.address()?;

    let use_color = report::use_color();
    report::header("decrypt");
    report::success("keystore decrypted", use_color);
    report::field("Address", address);
    if args.reveal {
        report::field("Private key", secret.to_hex().as_str());
    } else {
        report::field("Private key", "(hidden, pass --reveal to print)");
    }
    println!();
    Ok(())
}

fn decrypt_file(path: &Path, passphrase_env: &str) -> Result<RawSecret, KeysealError> {
    let record = read_keystore(path)?;
    let passphrase = prompt::get_passphrase(passphrase_env)?;
    KeyVault::decrypt(&record, &passphrase)
}
