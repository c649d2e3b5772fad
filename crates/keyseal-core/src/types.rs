// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Algorithm identifiers shared by the configuration model and the keystore
//! format.
//!
//! The string forms are part of the on-disk format and must not change.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Passphrase key-derivation function.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
pub enum KdfAlgorithm {
    /// Argon2id, version 0x13.
    #[default]
    #[strum(serialize = "argon2id")]
    #[serde(rename = "argon2id")]
    Argon2id,
    /// PBKDF2 with HMAC-SHA256.
    #[strum(serialize = "pbkdf2-sha256")]
    #[serde(rename = "pbkdf2-sha256")]
    Pbkdf2Sha256,
}

/// Symmetric AEAD cipher used to seal the secret.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
pub enum CipherAlgorithm {
    #[default]
    #[strum(serialize = "aes-256-gcm")]
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    #[strum(serialize = "chacha20-poly1305")]
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}
