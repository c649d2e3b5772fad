// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console output shared by the subcommands, and the exit-code mapping.

use std::io::IsTerminal;

use colored::Colorize;
use keyseal_core::{ErrorKind, KeysealError};

/// Exit code for configuration errors (EX_CONFIG).
pub const EXIT_CONFIG: i32 = 78;

/// Map an error to the process exit code.
pub fn exit_code(err: &KeysealError) -> i32 {
    match err.kind() {
        ErrorKind::InvalidSecretFormat | ErrorKind::InvalidPassphrase => 2,
        ErrorKind::IntegrityCheckFailed => 3,
        ErrorKind::MalformedFormat | ErrorKind::UnsupportedAlgorithm => 4,
        ErrorKind::Io => 74,
        ErrorKind::Config => EXIT_CONFIG,
        ErrorKind::Internal => 70,
    }
}

/// Whether stdout should get ANSI colors.
pub fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

/// Print a command banner.
pub fn header(title: &str) {
    println!();
    println!("  keyseal {title}");
    println!("  {}", "-".repeat(44));
}

/// Print an aligned `label: value` line.
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("    {:<12} {value}", format!("{label}:"));
}

/// Print a success line with a check mark.
pub fn success(message: &str, use_color: bool) {
    if use_color {
        println!("    {} {}", "✓".green(), message.green());
    } else {
        println!("    [OK] {message}");
    }
}

/// The user-facing explanation of `err`.
///
/// A wrong passphrase and a tampered keystore get the same message.
pub fn describe_error(err: &KeysealError) -> String {
    match err {
        KeysealError::IntegrityCheckFailed => {
            "could not decrypt the keystore: wrong passphrase or the file has been modified"
                .to_string()
        }
        KeysealError::MalformedFormat(_) | KeysealError::UnsupportedAlgorithm(_) => {
            format!("the keystore file is not valid: {err}")
        }
        KeysealError::Io { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
            format!(
                "no keystore found at {}. Run `keyseal encrypt` to create one.",
                path.display()
            )
        }
        other => other.to_string(),
    }
}

/// Print `err` to stderr.
pub fn print_error(err: &KeysealError) {
    let message = describe_error(err);
    if std::io::stderr().is_terminal() {
        eprintln!("{} {message}", "error:".red().bold());
    } else {
        eprintln!("error: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        assert_eq!(exit_code(&KeysealError::InvalidSecretFormat("x".into())), 2);
        assert_eq!(exit_code(&KeysealError::InvalidPassphrase("x".into())), 2);
        assert_eq!(exit_code(&KeysealError::IntegrityCheckFailed), 3);
        assert_eq!(exit_code(&KeysealError::MalformedFormat("x".into())), 4);
        assert_eq!(exit_code(&KeysealError::UnsupportedAlgorithm("x".into())), 4);
        assert_eq!(
            exit_code(&KeysealError::io("k.json", std::io::Error::other("x"))),
            74
        );
        assert_eq!(exit_code(&KeysealError::Config("x".into())), 78);
        assert_eq!(exit_code(&KeysealError::Internal("x".into())), 70);
    }

    #[test]
    fn missing_file_gets_its_own_message() {
        let err = KeysealError::io(
            "keystore/encrypted-key.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let message = describe_error(&err);
        assert!(message.contains("no keystore found"));
        assert!(message.contains("keystore/encrypted-key.json"));
    }

    #[test]
    fn three_failure_branches_are_distinct() {
        let integrity = describe_error(&KeysealError::IntegrityCheckFailed);
        let malformed = describe_error(&KeysealError::MalformedFormat("missing field `mac`".into()));
        let missing = describe_error(&KeysealError::io(
            "k.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        ));

        assert!(integrity.contains("wrong passphrase"));
        assert!(malformed.contains("not valid"));
        assert_ne!(integrity, malformed);
        assert_ne!(integrity, missing);
        assert_ne!(malformed, missing);
    }
}
