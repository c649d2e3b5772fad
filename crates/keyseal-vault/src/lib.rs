// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase-encrypted private key storage.
//!
//! A [`KeyVault`] turns a 32-byte secp256k1 private key and a passphrase into
//! an [`EncryptedSecret`] and back. The record carries its own KDF and cipher
//! parameters, an HMAC-SHA256 tag over every field, and optionally the
//! account address so a keystore can be identified without decrypting it.
//!
//! The four core operations perform no I/O; [`file`] holds the helpers that
//! put a keystore on disk.

pub mod address;
pub mod crypto;
pub mod file;
pub mod format;
pub mod kdf;
pub mod mac;
pub mod secret;
pub mod vault;

pub use address::Address;
pub use crypto::CipherParams;
pub use file::{read_keystore, write_keystore};
pub use format::{deserialize, serialize, EncryptedSecret, FORMAT_VERSION};
pub use kdf::{KdfParams, KdfSettings};
pub use secret::RawSecret;
pub use vault::KeyVault;
