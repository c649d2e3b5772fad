// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the keyseal tools.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use keyseal_core::{CipherAlgorithm, KdfAlgorithm};
use serde::{Deserialize, Serialize};

/// Top-level keyseal configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeysealConfig {
    /// Key derivation and cipher settings for newly encrypted keystores.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Filesystem locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Key vault settings.
///
/// Only affects encryption. Decryption always follows the parameters recorded
/// in the keystore file itself.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Key-derivation function for new keystores.
    #[serde(default)]
    pub kdf: KdfAlgorithm,

    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,

    /// PBKDF2-HMAC-SHA256 iteration count (default: 600000).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// AEAD cipher for new keystores.
    #[serde(default)]
    pub cipher: CipherAlgorithm,

    /// Store the derived address in the keystore so it can be identified
    /// without decrypting.
    #[serde(default = "default_record_address")]
    pub record_address: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf: KdfAlgorithm::default(),
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            cipher: CipherAlgorithm::default(),
            record_address: default_record_address(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536 // 64 MiB per OWASP recommendation
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

fn default_pbkdf2_iterations() -> u32 {
    600_000 // OWASP 2023 figure for PBKDF2-HMAC-SHA256
}

fn default_record_address() -> bool {
    true
}

/// Filesystem locations used by the CLI.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Default keystore file for `encrypt`, `decrypt`, `inspect`.
    #[serde(default = "default_encrypted_key_path")]
    pub encrypted_key: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            encrypted_key: default_encrypted_key_path(),
        }
    }
}

fn default_encrypted_key_path() -> String {
    "keystore/encrypted-key.json".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
