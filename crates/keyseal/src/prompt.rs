// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase and private key acquisition via environment variable or TTY prompt.

use std::io::IsTerminal;

use keyseal_core::KeysealError;
use secrecy::SecretString;
use zeroize::Zeroizing;

/// Default environment variable holding the keystore passphrase.
pub const PASSPHRASE_ENV_VAR: &str = "KEYSEAL_PASSPHRASE";

/// Default environment variable holding the replacement passphrase for
/// `change-passphrase`.
pub const NEW_PASSPHRASE_ENV_VAR: &str = "KEYSEAL_NEW_PASSPHRASE";

/// Default environment variable holding the hex private key for `encrypt`.
pub const PRIVATE_KEY_ENV_VAR: &str = "KEYSEAL_PRIVATE_KEY";

/// Read `var`, trimmed. Unset and blank values both count as absent.
fn from_env(var: &str) -> Option<Zeroizing<String>> {
    let value = Zeroizing::new(std::env::var(var).ok()?);
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(Zeroizing::new(trimmed.to_string()))
}

fn read_hidden(prompt: &str) -> Result<Zeroizing<String>, KeysealError> {
    eprint!("{prompt}");
    rpassword::read_password()
        .map(Zeroizing::new)
        .map_err(|e| KeysealError::Internal(format!("failed to read from terminal: {e}")))
}

fn stdin_is_tty() -> bool {
    std::io::stdin().is_terminal()
}

/// Get a passphrase from `env_var` or an interactive prompt.
///
/// Priority:
/// 1. The environment variable (for scripts and CI)
/// 2. Interactive TTY prompt via `rpassword`
pub fn get_passphrase(env_var: &str) -> Result<SecretString, KeysealError> {
    if let Some(value) = from_env(env_var) {
        return Ok(SecretString::from(value.to_string()));
    }

    if stdin_is_tty() {
        let passphrase = read_hidden("Keystore passphrase: ")?;
        if passphrase.is_empty() {
            return Err(KeysealError::InvalidPassphrase(
                "empty passphrase not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(passphrase.to_string()));
    }

    Err(no_input(env_var, "passphrase"))
}

/// Get a new passphrase, prompting twice when interactive.
///
/// A value taken from the environment needs no confirmation.
pub fn get_passphrase_with_confirm(env_var: &str) -> Result<SecretString, KeysealError> {
    if let Some(value) = from_env(env_var) {
        return Ok(SecretString::from(value.to_string()));
    }

    if stdin_is_tty() {
        let first = read_hidden("New keystore passphrase: ")?;
        let second = read_hidden("Confirm keystore passphrase: ")?;

        if first != second {
            return Err(KeysealError::InvalidPassphrase(
                "passphrases do not match".to_string(),
            ));
        }
        if first.is_empty() {
            return Err(KeysealError::InvalidPassphrase(
                "empty passphrase not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(first.to_string()));
    }

    Err(no_input(env_var, "passphrase"))
}

/// Get the hex-encoded private key to encrypt.
pub fn get_private_key(env_var: &str) -> Result<Zeroizing<String>, KeysealError> {
    if let Some(value) = from_env(env_var) {
        return Ok(value);
    }

    if stdin_is_tty() {
        return read_hidden("Private key (0x-prefixed hex): ");
    }

    Err(KeysealError::InvalidSecretFormat(format!(
        "no private key provided. Set {env_var} or run interactively."
    )))
}

fn no_input(env_var: &str, what: &str) -> KeysealError {
    KeysealError::InvalidPassphrase(format!(
        "no {what} provided. Set {env_var} or run interactively."
    ))
}
