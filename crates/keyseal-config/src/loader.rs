// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./keyseal.toml` > `~/.config/keyseal/keyseal.toml` > `/etc/keyseal/keyseal.toml`
//! with environment variable overrides via `KEYSEAL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::KeysealConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/keyseal/keyseal.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "keyseal.toml";

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "KEYSEAL_";

/// Config sections that may be overridden from the environment.
///
/// Anything else under `KEYSEAL_` (the passphrase and private key variables
/// read by the CLI) is ignored here so it never lands in the config model.
const ENV_SECTIONS: &[&str] = &["vault_", "paths_", "log_"];

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keyseal/keyseal.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/keyseal/keyseal.toml` (system-wide)
/// 3. `~/.config/keyseal/keyseal.toml` (user XDG config)
/// 4. `./keyseal.toml` (local directory)
/// 5. `KEYSEAL_*` environment variables
pub fn load_config() -> Result<KeysealConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<KeysealConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeysealConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KeysealConfig, figment::Error> {
    tracing::debug!(path = %path.display(), "loading config from explicit path");
    Figment::new()
        .merge(Serialized::defaults(KeysealConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(KeysealConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `KEYSEAL_VAULT_KDF_MEMORY_COST` must map to
/// `vault.kdf_memory_cost`, not `vault.kdf.memory.cost`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .filter(|key| {
            let key = key.as_str().to_ascii_lowercase();
            ENV_SECTIONS.iter().any(|section| key.starts_with(section))
        })
        .map(|key| {
            // `key` is the lowercased env var name with prefix stripped.
            // Example: KEYSEAL_PATHS_ENCRYPTED_KEY -> "paths_encrypted_key"
            let key_str = key.as_str().to_ascii_lowercase();
            let mapped = key_str
                .replacen("vault_", "vault.", 1)
                .replacen("paths_", "paths.", 1)
                .replacen("log_", "log.", 1);
            mapped.into()
        })
}
