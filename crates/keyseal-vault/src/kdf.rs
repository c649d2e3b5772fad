// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase key derivation (Argon2id or PBKDF2-HMAC-SHA256).
//!
//! Every derivation produces [`DERIVED_KEY_LEN`] bytes: the first half keys
//! the cipher, the second half keys the MAC.

use std::num::NonZeroU32;

use keyseal_core::{KdfAlgorithm, KeysealError};
use ring::pbkdf2;
use zeroize::Zeroizing;

use crate::crypto;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Total derived key length: 32-byte cipher key followed by 32-byte MAC key.
pub const DERIVED_KEY_LEN: usize = 64;

/// Upper bound on Argon2id memory cost accepted from any source (4 GiB).
pub const MAX_ARGON2_MEMORY_KIB: u32 = 4 * 1024 * 1024;
/// Upper bound on Argon2id passes.
pub const MAX_ARGON2_ITERATIONS: u32 = 64;
/// Upper bound on Argon2id lanes.
pub const MAX_ARGON2_PARALLELISM: u32 = 64;
/// Upper bound on PBKDF2 iterations.
pub const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

/// Algorithm and work factors, without a salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfSettings {
    Argon2id {
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },
    Pbkdf2Sha256 {
        iterations: u32,
    },
}

impl KdfSettings {
    /// The algorithm identifier for these settings.
    pub fn algorithm(&self) -> KdfAlgorithm {
        match self {
            Self::Argon2id { .. } => KdfAlgorithm::Argon2id,
            Self::Pbkdf2Sha256 { .. } => KdfAlgorithm::Pbkdf2Sha256,
        }
    }

    /// Check the work factors are usable and within the accepted bounds.
    ///
    /// Returns a human-readable reason on failure; callers pick the error
    /// kind (config vs. malformed file).
    pub fn check(&self) -> Result<(), String> {
        match *self {
            Self::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                if !(1..=MAX_ARGON2_PARALLELISM).contains(&parallelism) {
                    return Err(format!(
                        "argon2id parallelism must be in 1..={MAX_ARGON2_PARALLELISM}, got {parallelism}"
                    ));
                }
                if !(1..=MAX_ARGON2_ITERATIONS).contains(&iterations) {
                    return Err(format!(
                        "argon2id iterations must be in 1..={MAX_ARGON2_ITERATIONS}, got {iterations}"
                    ));
                }
                let min_memory = 8 * parallelism;
                if !(min_memory..=MAX_ARGON2_MEMORY_KIB).contains(&memory_kib) {
                    return Err(format!(
                        "argon2id memory must be in {min_memory}..={MAX_ARGON2_MEMORY_KIB} KiB, got {memory_kib}"
                    ));
                }
                Ok(())
            }
            Self::Pbkdf2Sha256 { iterations } => {
                if !(1..=MAX_PBKDF2_ITERATIONS).contains(&iterations) {
                    return Err(format!(
                        "pbkdf2 iterations must be in 1..={MAX_PBKDF2_ITERATIONS}, got {iterations}"
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Full KDF parameters as recorded in a keystore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfParams {
    pub salt: [u8; SALT_LEN],
    pub settings: KdfSettings,
}

impl KdfParams {
    /// Pair `settings` with a freshly generated salt.
    pub fn with_fresh_salt(settings: KdfSettings) -> Result<Self, KeysealError> {
        Ok(Self {
            salt: crypto::random_array()?,
            settings,
        })
    }

    /// Derive the combined cipher + MAC key from `passphrase`.
    ///
    /// The returned key is wrapped in [`Zeroizing`] for automatic memory
    /// zeroing on drop.
    pub fn derive(&self, passphrase: &[u8]) -> Result<Zeroizing<[u8; DERIVED_KEY_LEN]>, KeysealError> {
        let mut output = Zeroizing::new([0u8; DERIVED_KEY_LEN]);

        match self.settings {
            KdfSettings::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                let params =
                    argon2::Params::new(memory_kib, iterations, parallelism, Some(DERIVED_KEY_LEN))
                        .map_err(|e| {
                            KeysealError::MalformedFormat(format!("invalid argon2id parameters: {e}"))
                        })?;
                let argon2 =
                    argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
                argon2
                    .hash_password_into(passphrase, &self.salt, &mut output[..])
                    .map_err(|e| {
                        KeysealError::Internal(format!("argon2id key derivation failed: {e}"))
                    })?;
            }
            KdfSettings::Pbkdf2Sha256 { iterations } => {
                let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
                    KeysealError::MalformedFormat("pbkdf2 iterations must be non-zero".to_string())
                })?;
                pbkdf2::derive(
                    pbkdf2::PBKDF2_HMAC_SHA256,
                    iterations,
                    &self.salt,
                    passphrase,
                    &mut output[..],
                );
            }
        }

        Ok(output)
    }

    /// Append the unambiguous binary form of these parameters to `out`.
    ///
    /// Used as part of the authenticated header, so every field is covered
    /// by the MAC.
    pub(crate) fn encode_into(&self, out: &mut Vec<u8>) {
        match self.settings {
            KdfSettings::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                out.push(1);
                out.extend_from_slice(&self.salt);
                out.extend_from_slice(&memory_kib.to_be_bytes());
                out.extend_from_slice(&iterations.to_be_bytes());
                out.extend_from_slice(&parallelism.to_be_bytes());
            }
            KdfSettings::Pbkdf2Sha256 { iterations } => {
                out.push(2);
                out.extend_from_slice(&self.salt);
                out.extend_from_slice(&iterations.to_be_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost for fast tests.
    const CHEAP_ARGON2: KdfSettings = KdfSettings::Argon2id {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };

    fn params(salt: [u8; SALT_LEN], settings: KdfSettings) -> KdfParams {
        KdfParams { salt, settings }
    }

    #[test]
    fn derive_key_produces_consistent_output() {
        let p = params([1u8; SALT_LEN], CHEAP_ARGON2);
        let key1 = p.derive(b"test passphrase").unwrap();
        let key2 = p.derive(b"test passphrase").unwrap();
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn different_passphrase_produces_different_output() {
        let p = params([2u8; SALT_LEN], CHEAP_ARGON2);
        let key1 = p.derive(b"passphrase one").unwrap();
        let key2 = p.derive(b"passphrase two").unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_salt_produces_different_output() {
        let key1 = params([1u8; SALT_LEN], CHEAP_ARGON2).derive(b"same").unwrap();
        let key2 = params([2u8; SALT_LEN], CHEAP_ARGON2).derive(b"same").unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn pbkdf2_differs_from_argon2id() {
        let salt = [3u8; SALT_LEN];
        let argon = params(salt, CHEAP_ARGON2).derive(b"pw").unwrap();
        let pbkdf = params(salt, KdfSettings::Pbkdf2Sha256 { iterations: 1000 })
            .derive(b"pw")
            .unwrap();
        assert_ne!(*argon, *pbkdf);
    }

    #[test]
    fn cipher_and_mac_halves_differ() {
        let key = params([4u8; SALT_LEN], CHEAP_ARGON2).derive(b"pw").unwrap();
        assert_ne!(key[..32], key[32..]);
    }

    #[test]
    fn fresh_salts_are_random() {
        let a = KdfParams::with_fresh_salt(CHEAP_ARGON2).unwrap();
        let b = KdfParams::with_fresh_salt(CHEAP_ARGON2).unwrap();
        assert_ne!(a.salt, b.salt);
    }

    #[test]
    fn check_rejects_out_of_range_work_factors() {
        let too_many_lanes = KdfSettings::Argon2id {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 0,
        };
        assert!(too_many_lanes.check().is_err());

        let too_little_memory = KdfSettings::Argon2id {
            memory_kib: 16,
            iterations: 1,
            parallelism: 4,
        };
        assert!(too_little_memory.check().unwrap_err().contains("memory"));

        let too_much_memory = KdfSettings::Argon2id {
            memory_kib: MAX_ARGON2_MEMORY_KIB + 1,
            iterations: 1,
            parallelism: 1,
        };
        assert!(too_much_memory.check().is_err());

        assert!(KdfSettings::Pbkdf2Sha256 { iterations: 0 }.check().is_err());
        assert!(KdfSettings::Pbkdf2Sha256 {
            iterations: MAX_PBKDF2_ITERATIONS + 1
        }
        .check()
        .is_err());

        assert!(CHEAP_ARGON2.check().is_ok());
    }

    #[test]
    fn encoding_distinguishes_algorithms_and_fields() {
        let salt = [5u8; SALT_LEN];
        let encode = |settings| {
            let mut out = Vec::new();
            params(salt, settings).encode_into(&mut out);
            out
        };

        let a = encode(CHEAP_ARGON2);
        let b = encode(KdfSettings::Argon2id {
            memory_kib: 1024,
            iterations: 2,
            parallelism: 1,
        });
        let c = encode(KdfSettings::Pbkdf2Sha256 { iterations: 1 });
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 1 + SALT_LEN + 12);
        assert_eq!(c.len(), 1 + SALT_LEN + 4);
    }
}
