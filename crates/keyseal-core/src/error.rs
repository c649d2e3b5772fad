// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the keyseal workspace.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// The primary error type used by the key vault and its callers.
///
/// Messages never carry the raw secret, derived key material, or the
/// passphrase.
#[derive(Debug, Error)]
pub enum KeysealError {
    /// The raw secret has the wrong length or is not a usable private key.
    #[error("invalid secret format: {0}")]
    InvalidSecretFormat(String),

    /// The passphrase was rejected before any key derivation (e.g. empty).
    #[error("invalid passphrase: {0}")]
    InvalidPassphrase(String),

    /// The keystore document is not a well-formed encrypted secret.
    #[error("malformed keystore: {0}")]
    MalformedFormat(String),

    /// The keystore names a KDF or cipher this build does not implement.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// MAC verification failed.
    ///
    /// Deliberately carries no detail: a wrong passphrase and a tampered file
    /// are indistinguishable.
    #[error("integrity check failed -- wrong passphrase or corrupted keystore")]
    IntegrityCheckFailed,

    /// Configuration errors (invalid settings, out-of-range work factors).
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors while reading or writing a keystore file.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Internal or unexpected errors (e.g. the system RNG is unavailable).
    #[error("internal error: {0}")]
    Internal(String),
}

impl KeysealError {
    /// The error kind, without any message detail.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSecretFormat(_) => ErrorKind::InvalidSecretFormat,
            Self::InvalidPassphrase(_) => ErrorKind::InvalidPassphrase,
            Self::MalformedFormat(_) => ErrorKind::MalformedFormat,
            Self::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            Self::IntegrityCheckFailed => ErrorKind::IntegrityCheckFailed,
            Self::Config(_) => ErrorKind::Config,
            Self::Io { .. } => ErrorKind::Io,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Discriminant of [`KeysealError`], suitable for matching and reporting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ErrorKind {
    InvalidSecretFormat,
    InvalidPassphrase,
    MalformedFormat,
    UnsupportedAlgorithm,
    IntegrityCheckFailed,
    Config,
    Io,
    Internal,
}
