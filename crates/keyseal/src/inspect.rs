// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyseal inspect` command implementation.
//!
//! Shows a keystore's public metadata without asking for the passphrase.

use std::path::PathBuf;

use clap::Args;
use keyseal_config::KeysealConfig;
use keyseal_core::KeysealError;
use keyseal_vault::{read_keystore, KdfSettings};

use crate::report;

/// Arguments for `keyseal inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Keystore to inspect [default: paths.encrypted_key]
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Run the `keyseal inspect` command.
pub fn run_inspect(config: &KeysealConfig, args: &InspectArgs) -> Result<(), KeysealError> {
    let path = crate::keystore_path(args.file.as_deref(), config);
    let record = read_keystore(&path)?;

    report::header("inspect");
    report::field("Keystore", path.display());
    report::field("Version", record.version);
    report::field("Id", record.id);
    match record.address {
        Some(address) => report::field("Address", address),
        None => report::field("Address", "(not recorded)"),
    }
    report::field("KDF", describe_kdf(&record.kdf.settings));
    report::field("Salt", hex::encode(record.kdf.salt));
    report::field("Cipher", record.cipher.algorithm);
    report::field("Nonce", hex::encode(record.cipher.nonce));
    println!();
    Ok(())
}

/// One-line summary of the KDF and its work factors.
fn describe_kdf(settings: &KdfSettings) -> String {
    match *settings {
        KdfSettings::Argon2id {
            memory_kib,
            iterations,
            parallelism,
        } => format!(
            "{} (memory {memory_kib} KiB, {iterations} iterations, {parallelism} lanes)",
            settings.algorithm()
        ),
        KdfSettings::Pbkdf2Sha256 { iterations } => {
            format!("{} ({iterations} iterations)", settings.algorithm())
        }
    }
}
