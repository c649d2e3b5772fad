// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyseal encrypt` command implementation.
//!
//! Reads a hex private key and a passphrase, then writes a new keystore file.

use std::io;
use std::path::{Path, PathBuf};

use clap::Args;
use keyseal_config::KeysealConfig;
use keyseal_core::KeysealError;
use keyseal_vault::{write_keystore, Address, EncryptedSecret, KeyVault, RawSecret};
use tracing::info;

use crate::prompt::{self, PASSPHRASE_ENV_VAR, PRIVATE_KEY_ENV_VAR};
use crate::report;

/// Arguments for `keyseal encrypt`.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Where to write the keystore [default: paths.encrypted_key]
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Environment variable holding the 0x-prefixed private key
    #[arg(long, value_name = "VAR", default_value = PRIVATE_KEY_ENV_VAR)]
    pub key_env: String,

    /// Environment variable holding the passphrase
    #[arg(long, value_name = "VAR", default_value = PASSPHRASE_ENV_VAR)]
    pub passphrase_env: String,

    /// Replace an existing keystore
    #[arg(long)]
    pub force: bool,
}

/// Run the `keyseal encrypt` command.
pub fn run_encrypt(config: &KeysealConfig, args: &EncryptArgs) -> Result<(), KeysealError> {
    let path = crate::keystore_path(args.out.as_deref(), config);
    let (record, address) = encrypt_to_file(config, &path, args)?;

    let use_color = report::use_color();
    report::header("encrypt");
    report::success("private key encrypted", use_color);
    report::field("Address", address);
    report::field("Keystore", path.display());
    report::field("Id", record.id);
    println!();
    Ok(())
}

fn encrypt_to_file(
    config: &KeysealConfig,
    path: &Path,
    args: &EncryptArgs,
) -> Result<(EncryptedSecret, Address), KeysealError> {
    // Fail before prompting for anything.
    if !args.force && path.exists() {
        return Err(KeysealError::io(
            path,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "keystore already exists (pass --force to replace it)",
            ),
        ));
    }
    let vault = KeyVault::from_config(&config.vault)?;

    let hex = prompt::get_private_key(&args.key_env)?;
    let secret = RawSecret::from_hex(&hex)?;
    let address = secret.address()?;
    info!(%address, "private key accepted");

    let passphrase = prompt::get_passphrase_with_confirm(&args.passphrase_env)?;
    let record = vault.encrypt(secret.expose_secret(), &passphrase)?;
    write_keystore(path, &record, args.force)?;

    Ok((record, address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyseal_core::ErrorKind;
    use secrecy::SecretString;
    use serial_test::serial;

    const KEY_VAR: &str = "KEYSEAL_ENCRYPT_TEST_KEY";
    const PASS_VAR: &str = "KEYSEAL_ENCRYPT_TEST_PASSPHRASE";
    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn test_config() -> KeysealConfig {
        keyseal_config::load_and_validate_str(
            "[vault]\nkdf = \"pbkdf2-sha256\"\npbkdf2_iterations = 100000\n",
        )
        .unwrap()
    }

    fn args(out: &Path, force: bool) -> EncryptArgs {
        EncryptArgs {
            out: Some(out.to_path_buf()),
            key_env: KEY_VAR.to_string(),
            passphrase_env: PASS_VAR.to_string(),
            force,
        }
    }

    fn set_inputs(key: &str, passphrase: &str) {
        // SAFETY: test-only env mutation, serialized with #[serial].
        unsafe {
            std::env::set_var(KEY_VAR, key);
            std::env::set_var(PASS_VAR, passphrase);
        }
    }

    fn clear_inputs() {
        unsafe {
            std::env::remove_var(KEY_VAR);
            std::env::remove_var(PASS_VAR);
        }
    }

    #[test]
    #[serial]
    fn encrypts_key_from_env_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystore/key.json");

        set_inputs(&format!("\"{KEY_ONE}\""), "correct-horse");
        let result = encrypt_to_file(&test_config(), &path, &args(&path, false));
        clear_inputs();

        let (record, address) = result.unwrap();
        assert_eq!(address.to_string(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
        assert_eq!(record.address, Some(address));

        let loaded = keyseal_vault::read_keystore(&path).unwrap();
        let raw = KeyVault::decrypt(&loaded, &SecretString::from("correct-horse".to_string()))
            .unwrap();
        assert_eq!(raw.to_hex().as_str(), KEY_ONE);
    }

    #[test]
    #[serial]
    fn existing_keystore_is_not_replaced_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        std::fs::write(&path, "keep me").unwrap();

        set_inputs(KEY_ONE, "correct-horse");
        let refused = encrypt_to_file(&test_config(), &path, &args(&path, false));
        let forced = encrypt_to_file(&test_config(), &path, &args(&path, true));
        clear_inputs();

        assert_eq!(refused.unwrap_err().kind(), ErrorKind::Io);
        assert!(forced.is_ok());
        assert_ne!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    #[serial]
    fn malformed_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");

        set_inputs("0x1234", "correct-horse");
        let result = encrypt_to_file(&test_config(), &path, &args(&path, false));
        clear_inputs();

        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidSecretFormat);
        assert!(!path.exists());
    }
}
