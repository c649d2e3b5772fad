// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Enforces production minimums for key-derivation work factors. These are
//! stricter than what the vault itself accepts, so keystores written by the
//! CLI are never cheap to brute-force.

use keyseal_core::KdfAlgorithm;

use crate::diagnostic::ConfigError;
use crate::model::KeysealConfig;

/// Minimum Argon2id memory cost in KiB.
pub const MIN_KDF_MEMORY_COST: u32 = 32768;
/// Minimum Argon2id iterations.
pub const MIN_KDF_ITERATIONS: u32 = 2;
/// Minimum PBKDF2 iterations.
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure rather than stopping at the first.
pub fn validate_config(config: &KeysealConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let vault = &config.vault;

    // Argon2 settings are checked even when PBKDF2 is selected, so switching
    // `kdf` never silently activates a weak configuration.
    if vault.kdf_memory_cost < MIN_KDF_MEMORY_COST {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_memory_cost must be at least {MIN_KDF_MEMORY_COST} (32 MiB), got {}",
                vault.kdf_memory_cost
            ),
        });
    }

    if vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                vault.kdf_iterations
            ),
        });
    }

    if vault.kdf_parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_parallelism must be at least 1, got {}",
                vault.kdf_parallelism
            ),
        });
    }

    if vault.kdf == KdfAlgorithm::Pbkdf2Sha256 && vault.pbkdf2_iterations < MIN_PBKDF2_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.pbkdf2_iterations must be at least {MIN_PBKDF2_ITERATIONS}, got {}",
                vault.pbkdf2_iterations
            ),
        });
    }

    if config.paths.encrypted_key.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "paths.encrypted_key must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
