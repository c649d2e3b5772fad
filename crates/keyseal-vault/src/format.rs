// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`EncryptedSecret`] keystore record and its JSON document form.
//!
//! Parsing never performs key derivation or decryption. The document is
//! first read as an untyped JSON value so the `version` field can be checked
//! before anything else, then decoded into strict wire structs that reject
//! unknown fields.

use std::str::FromStr;

use keyseal_core::{CipherAlgorithm, KdfAlgorithm, KeysealError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::Address;
use crate::crypto::{CipherParams, NONCE_LEN, TAG_LEN};
use crate::kdf::{KdfParams, KdfSettings};
use crate::mac::MAC_LEN;
use crate::secret::SECRET_LEN;

/// The only keystore format version this crate reads and writes.
pub const FORMAT_VERSION: u32 = 1;

/// Exact ciphertext length: the sealed secret plus its AEAD tag.
pub const CIPHERTEXT_LEN: usize = SECRET_LEN + TAG_LEN;

const HEADER_DOMAIN: &[u8] = b"keyseal-keystore";

/// A passphrase-encrypted private key.
///
/// Contains everything needed to decrypt given the passphrase, and nothing
/// that reveals the key without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    pub version: u32,
    pub id: Uuid,
    pub address: Option<Address>,
    pub kdf: KdfParams,
    pub cipher: CipherParams,
    pub ciphertext: Vec<u8>,
    pub mac: [u8; MAC_LEN],
}

impl EncryptedSecret {
    /// Fixed-layout encoding of every non-ciphertext field.
    ///
    /// Passed to the cipher as associated data and prefixed to the MAC input.
    pub fn authenticated_header(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(128);
        out.extend_from_slice(HEADER_DOMAIN);
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(self.id.as_bytes());
        match &self.address {
            Some(address) => {
                out.push(1);
                out.extend_from_slice(address.as_bytes());
            }
            None => out.push(0),
        }
        self.kdf.encode_into(&mut out);
        self.cipher.encode_into(&mut out);
        out
    }

    /// Header, ciphertext length, then ciphertext.
    pub(crate) fn mac_input(&self) -> Vec<u8> {
        let mut out = self.authenticated_header();
        out.extend_from_slice(&(self.ciphertext.len() as u64).to_be_bytes());
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, KeysealError> {
        let kdfparams = match self.kdf.settings {
            KdfSettings::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => serde_json::to_value(WireArgon2Params {
                salt: hex::encode(self.kdf.salt),
                memory_kib,
                iterations,
                parallelism,
            }),
            KdfSettings::Pbkdf2Sha256 { iterations } => serde_json::to_value(WirePbkdf2Params {
                salt: hex::encode(self.kdf.salt),
                iterations,
            }),
        }
        .map_err(|e| KeysealError::Internal(format!("failed to encode kdf parameters: {e}")))?;

        let wire = WireKeystore {
            version: self.version,
            id: self.id,
            address: self.address.map(|a| a.to_checksum()),
            crypto: WireCrypto {
                kdf: self.kdf.settings.algorithm().to_string(),
                kdfparams,
                cipher: self.cipher.algorithm.to_string(),
                cipherparams: WireCipherParams {
                    nonce: hex::encode(self.cipher.nonce),
                },
                ciphertext: hex::encode(&self.ciphertext),
                mac: hex::encode(self.mac),
            },
        };

        serde_json::to_string_pretty(&wire)
            .map_err(|e| KeysealError::Internal(format!("failed to encode keystore: {e}")))
    }

    /// Parse a JSON document produced by [`EncryptedSecret::to_json`].
    pub fn from_json(text: &str) -> Result<Self, KeysealError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| KeysealError::MalformedFormat(format!("not valid JSON: {e}")))?;

        let version = value
            .as_object()
            .ok_or_else(|| KeysealError::MalformedFormat("expected a JSON object".to_string()))?
            .get("version")
            .ok_or_else(|| KeysealError::MalformedFormat("missing field `version`".to_string()))?;
        match version.as_u64() {
            Some(v) if v == u64::from(FORMAT_VERSION) => {}
            _ => {
                return Err(KeysealError::MalformedFormat(format!(
                    "unsupported keystore version {version} (expected {FORMAT_VERSION})"
                )));
            }
        }

        let wire: WireKeystore = serde_json::from_value(value)
            .map_err(|e| KeysealError::MalformedFormat(e.to_string()))?;
        wire.into_secret()
    }
}

/// Encode `secret` as its JSON document.
pub fn serialize(secret: &EncryptedSecret) -> Result<String, KeysealError> {
    secret.to_json()
}

/// Decode a JSON keystore document.
pub fn deserialize(text: &str) -> Result<EncryptedSecret, KeysealError> {
    EncryptedSecret::from_json(text)
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireKeystore {
    version: u32,
    id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    crypto: WireCrypto,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireCrypto {
    kdf: String,
    kdfparams: serde_json::Value,
    cipher: String,
    cipherparams: WireCipherParams,
    ciphertext: String,
    mac: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireCipherParams {
    nonce: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireArgon2Params {
    salt: String,
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WirePbkdf2Params {
    salt: String,
    iterations: u32,
}

impl WireKeystore {
    fn into_secret(self) -> Result<EncryptedSecret, KeysealError> {
        let crypto = self.crypto;

        let kdf_algorithm = KdfAlgorithm::from_str(&crypto.kdf)
            .map_err(|_| KeysealError::UnsupportedAlgorithm(format!("kdf `{}`", crypto.kdf)))?;
        let cipher_algorithm = CipherAlgorithm::from_str(&crypto.cipher).map_err(|_| {
            KeysealError::UnsupportedAlgorithm(format!("cipher `{}`", crypto.cipher))
        })?;

        let kdf = match kdf_algorithm {
            KdfAlgorithm::Argon2id => {
                let p: WireArgon2Params = kdfparams(crypto.kdfparams)?;
                KdfParams {
                    salt: decode_fixed("kdfparams.salt", &p.salt)?,
                    settings: KdfSettings::Argon2id {
                        memory_kib: p.memory_kib,
                        iterations: p.iterations,
                        parallelism: p.parallelism,
                    },
                }
            }
            KdfAlgorithm::Pbkdf2Sha256 => {
                let p: WirePbkdf2Params = kdfparams(crypto.kdfparams)?;
                KdfParams {
                    salt: decode_fixed("kdfparams.salt", &p.salt)?,
                    settings: KdfSettings::Pbkdf2Sha256 {
                        iterations: p.iterations,
                    },
                }
            }
        };
        kdf.settings.check().map_err(KeysealError::MalformedFormat)?;

        let cipher = CipherParams {
            algorithm: cipher_algorithm,
            nonce: decode_fixed::<NONCE_LEN>("cipherparams.nonce", &crypto.cipherparams.nonce)?,
        };

        let ciphertext: [u8; CIPHERTEXT_LEN] = decode_fixed("ciphertext", &crypto.ciphertext)?;
        let mac = decode_fixed::<MAC_LEN>("mac", &crypto.mac)?;

        let address = self
            .address
            .as_deref()
            .map(Address::from_str)
            .transpose()?;

        Ok(EncryptedSecret {
            version: self.version,
            id: self.id,
            address,
            kdf,
            cipher,
            ciphertext: ciphertext.to_vec(),
            mac,
        })
    }
}

fn kdfparams<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, KeysealError> {
    serde_json::from_value(value)
        .map_err(|e| KeysealError::MalformedFormat(format!("kdfparams: {e}")))
}

fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N], KeysealError> {
    let bytes = hex::decode(value)
        .map_err(|e| KeysealError::MalformedFormat(format!("{field} is not valid hex: {e}")))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        KeysealError::MalformedFormat(format!("{field} must be {N} bytes, got {len}"))
    })
}
