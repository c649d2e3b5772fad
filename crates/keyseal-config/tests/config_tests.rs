// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the keyseal configuration system.

use keyseal_config::diagnostic::ConfigError;
use keyseal_config::model::KeysealConfig;
use keyseal_config::{load_and_validate_str, load_config_from_str};
use keyseal_core::{CipherAlgorithm, KdfAlgorithm};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_keyseal_config() {
    let toml = r#"
[vault]
kdf = "pbkdf2-sha256"
kdf_memory_cost = 131072
kdf_iterations = 4
kdf_parallelism = 2
pbkdf2_iterations = 900000
cipher = "chacha20-poly1305"
record_address = false

[paths]
encrypted_key = "/var/lib/keyseal/deployer.json"

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.vault.kdf, KdfAlgorithm::Pbkdf2Sha256);
    assert_eq!(config.vault.kdf_memory_cost, 131072);
    assert_eq!(config.vault.kdf_iterations, 4);
    assert_eq!(config.vault.kdf_parallelism, 2);
    assert_eq!(config.vault.pbkdf2_iterations, 900_000);
    assert_eq!(config.vault.cipher, CipherAlgorithm::ChaCha20Poly1305);
    assert!(!config.vault.record_address);
    assert_eq!(config.paths.encrypted_key, "/var/lib/keyseal/deployer.json");
    assert_eq!(config.log.level, "debug");
}

/// Empty TOML falls back to defaults for every section.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.vault.kdf, KdfAlgorithm::Argon2id);
    assert_eq!(config.vault.kdf_memory_cost, 65536);
    assert_eq!(config.vault.kdf_iterations, 3);
    assert_eq!(config.vault.kdf_parallelism, 4);
    assert_eq!(config.vault.pbkdf2_iterations, 600_000);
    assert_eq!(config.vault.cipher, CipherAlgorithm::Aes256Gcm);
    assert!(config.vault.record_address);
    assert_eq!(config.paths.encrypted_key, "keystore/encrypted-key.json");
    assert_eq!(config.log.level, "info");
}

/// Dotted keys merged on top of a TOML layer override it, the way env vars do.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: KeysealConfig = Figment::new()
        .merge(Serialized::defaults(KeysealConfig::default()))
        .merge(Toml::string("[paths]\nencrypted_key = \"from-toml.json\"\n"))
        .merge(("paths.encrypted_key", "from-env.json"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.paths.encrypted_key, "from-env.json");
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let toml = r#"
[network]
rpc_url = "http://localhost:8545"
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("network"),
        "error should mention unknown field, got: {err_str}"
    );
}

#[test]
fn unknown_key_in_vault_gets_suggestion() {
    let toml = r#"
[vault]
kdf_iteratons = 5
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_suggestion = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "kdf_iteratons"
                && suggestion.as_deref() == Some("kdf_iterations")
                && valid_keys.contains("kdf_parallelism")
        })
    });
    assert!(has_suggestion, "expected suggestion for kdf_iteratons, got: {errors:?}");
}

#[test]
fn unsupported_cipher_name_is_rejected() {
    let toml = r#"
[vault]
cipher = "aes-128-ctr"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown cipher");
    assert!(
        errors.iter().any(|e| matches!(e, ConfigError::InvalidValue { .. })),
        "expected InvalidValue, got: {errors:?}"
    );
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[vault]
kdf_memory_cost = "lots"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        errors.iter().any(|e| matches!(e, ConfigError::InvalidValue { key, .. } if key.contains("kdf_memory_cost"))),
        "expected InvalidValue for kdf_memory_cost, got: {errors:?}"
    );
}

#[test]
fn weak_settings_fail_validation_after_parsing() {
    let toml = r#"
[vault]
kdf_memory_cost = 4096
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("kdf_memory_cost"))
    ));
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "ciper".to_string(),
        suggestion: Some("cipher".to_string()),
        valid_keys: "kdf, cipher, record_address".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some(), "should have diagnostic code");
    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `cipher`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("ciper"));
}

#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[log]
level = "warn"
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.log.level, "warn");
}
