// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keystore lifecycle: encrypt, decrypt, re-encrypt.
//!
//! Each keystore protects one private key:
//! - A 64-byte key is derived from the passphrase and a fresh salt. The first
//!   half keys the AEAD cipher, the second half keys HMAC-SHA256.
//! - The private key is sealed with the authenticated header as associated
//!   data, then the header and ciphertext are MACed.
//! - On decrypt the MAC is checked before the cipher is ever run.

use keyseal_config::model::VaultConfig;
use keyseal_core::{CipherAlgorithm, KdfAlgorithm, KeysealError};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::address::Address;
use crate::crypto::{self, CipherParams, CIPHER_KEY_LEN};
use crate::format::{self, EncryptedSecret, CIPHERTEXT_LEN, FORMAT_VERSION};
use crate::kdf::{KdfParams, KdfSettings};
use crate::mac::{self, MAC_KEY_LEN, MAC_LEN};
use crate::secret::RawSecret;

/// Encrypts and decrypts private keys under a passphrase.
///
/// The settings only govern new keystores; decryption always follows the
/// parameters recorded in the keystore itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVault {
    kdf: KdfSettings,
    cipher: CipherAlgorithm,
    record_address: bool,
}

impl KeyVault {
    /// Build a vault, rejecting work factors outside the accepted bounds.
    pub fn new(kdf: KdfSettings, cipher: CipherAlgorithm) -> Result<Self, KeysealError> {
        kdf.check().map_err(KeysealError::Config)?;
        Ok(Self {
            kdf,
            cipher,
            record_address: true,
        })
    }

    /// Build a vault from the `[vault]` config section.
    pub fn from_config(config: &VaultConfig) -> Result<Self, KeysealError> {
        let kdf = match config.kdf {
            KdfAlgorithm::Argon2id => KdfSettings::Argon2id {
                memory_kib: config.kdf_memory_cost,
                iterations: config.kdf_iterations,
                parallelism: config.kdf_parallelism,
            },
            KdfAlgorithm::Pbkdf2Sha256 => KdfSettings::Pbkdf2Sha256 {
                iterations: config.pbkdf2_iterations,
            },
        };

        let vault = Self::new(kdf, config.cipher)?;
        Ok(if config.record_address {
            vault
        } else {
            vault.without_address()
        })
    }

    /// Do not store the derived address in new keystores.
    pub fn without_address(mut self) -> Self {
        self.record_address = false;
        self
    }

    pub fn kdf_settings(&self) -> KdfSettings {
        self.kdf
    }

    pub fn cipher(&self) -> CipherAlgorithm {
        self.cipher
    }

    /// Encrypt a 32-byte private key under `passphrase`.
    ///
    /// Every call draws a fresh salt, nonce and id, so encrypting the same key
    /// twice never yields the same record.
    pub fn encrypt(
        &self,
        raw_secret: &[u8],
        passphrase: &SecretString,
    ) -> Result<EncryptedSecret, KeysealError> {
        let secret = RawSecret::from_bytes(raw_secret)?;
        require_passphrase(passphrase)?;

        let address = if self.record_address {
            Some(secret.address()?)
        } else {
            None
        };
        let id = uuid::Builder::from_random_bytes(crypto::random_array()?).into_uuid();

        let record = self.seal(&secret, passphrase, id, address)?;
        debug!(
            id = %record.id,
            kdf = %record.kdf.settings.algorithm(),
            cipher = %record.cipher.algorithm,
            "private key encrypted"
        );
        Ok(record)
    }

    /// Recover the private key from `secret`.
    ///
    /// A wrong passphrase and a modified record are indistinguishable: both
    /// fail with [`KeysealError::IntegrityCheckFailed`].
    pub fn decrypt(
        secret: &EncryptedSecret,
        passphrase: &SecretString,
    ) -> Result<RawSecret, KeysealError> {
        if secret.version != FORMAT_VERSION {
            return Err(KeysealError::MalformedFormat(format!(
                "unsupported keystore version {} (expected {FORMAT_VERSION})",
                secret.version
            )));
        }
        secret
            .kdf
            .settings
            .check()
            .map_err(KeysealError::MalformedFormat)?;
        if secret.ciphertext.len() != CIPHERTEXT_LEN {
            return Err(KeysealError::MalformedFormat(format!(
                "ciphertext must be {CIPHERTEXT_LEN} bytes, got {}",
                secret.ciphertext.len()
            )));
        }

        let keys = DerivedKeys::derive(&secret.kdf, passphrase)?;
        mac::verify(&keys.mac, &secret.mac_input(), &secret.mac)?;

        let plaintext =
            secret
                .cipher
                .open(&keys.cipher, &secret.authenticated_header(), &secret.ciphertext)?;
        let raw = RawSecret::from_bytes(&plaintext).map_err(|_| KeysealError::IntegrityCheckFailed)?;

        if let Some(expected) = secret.address {
            if raw.address()? != expected {
                return Err(KeysealError::IntegrityCheckFailed);
            }
        }

        debug!(id = %secret.id, "private key decrypted");
        Ok(raw)
    }

    /// Re-seal `secret` under `new_passphrase` with this vault's settings.
    ///
    /// The id and recorded address carry over; salt, nonce, ciphertext and MAC
    /// are all fresh.
    pub fn reencrypt(
        &self,
        secret: &EncryptedSecret,
        old_passphrase: &SecretString,
        new_passphrase: &SecretString,
    ) -> Result<EncryptedSecret, KeysealError> {
        require_passphrase(new_passphrase)?;
        let raw = Self::decrypt(secret, old_passphrase)?;

        let record = self.seal(&raw, new_passphrase, secret.id, secret.address)?;
        info!(
            id = %record.id,
            kdf = %record.kdf.settings.algorithm(),
            cipher = %record.cipher.algorithm,
            "keystore re-encrypted under new passphrase"
        );
        Ok(record)
    }

    /// Encode a keystore as its JSON document.
    pub fn serialize(secret: &EncryptedSecret) -> Result<String, KeysealError> {
        format::serialize(secret)
    }

    /// Decode a JSON keystore document without any key derivation.
    pub fn deserialize(text: &str) -> Result<EncryptedSecret, KeysealError> {
        format::deserialize(text)
    }

    fn seal(
        &self,
        secret: &RawSecret,
        passphrase: &SecretString,
        id: Uuid,
        address: Option<Address>,
    ) -> Result<EncryptedSecret, KeysealError> {
        let kdf = KdfParams::with_fresh_salt(self.kdf)?;
        let cipher = CipherParams::with_fresh_nonce(self.cipher)?;
        let keys = DerivedKeys::derive(&kdf, passphrase)?;

        let mut record = EncryptedSecret {
            version: FORMAT_VERSION,
            id,
            address,
            kdf,
            cipher,
            ciphertext: Vec::new(),
            mac: [0u8; MAC_LEN],
        };
        record.ciphertext = record.cipher.seal(
            &keys.cipher,
            &record.authenticated_header(),
            secret.expose_secret(),
        )?;
        record.mac = mac::compute(&keys.mac, &record.mac_input())?;

        Ok(record)
    }
}

/// The two halves of a passphrase-derived key.
struct DerivedKeys {
    cipher: Zeroizing<[u8; CIPHER_KEY_LEN]>,
    mac: Zeroizing<[u8; MAC_KEY_LEN]>,
}

impl DerivedKeys {
    fn derive(kdf: &KdfParams, passphrase: &SecretString) -> Result<Self, KeysealError> {
        let derived = kdf.derive(passphrase.expose_secret().as_bytes())?;

        let mut cipher = Zeroizing::new([0u8; CIPHER_KEY_LEN]);
        let mut mac = Zeroizing::new([0u8; MAC_KEY_LEN]);
        cipher.copy_from_slice(&derived[..CIPHER_KEY_LEN]);
        mac.copy_from_slice(&derived[CIPHER_KEY_LEN..]);

        Ok(Self { cipher, mac })
    }
}

fn require_passphrase(passphrase: &SecretString) -> Result<(), KeysealError> {
    if passphrase.expose_secret().is_empty() {
        return Err(KeysealError::InvalidPassphrase(
            "passphrase must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn cheap_vault() -> KeyVault {
        KeyVault::new(
            KdfSettings::Argon2id {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
            CipherAlgorithm::Aes256Gcm,
        )
        .unwrap()
    }

    fn pass(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn encrypt_then_decrypt() {
        let record = cheap_vault().encrypt(&[0x11; 32], &pass("correct-horse")).unwrap();
        let raw = KeyVault::decrypt(&record, &pass("correct-horse")).unwrap();
        assert_eq!(raw.expose_secret(), &[0x11; 32]);
    }

    #[test]
    fn wrong_passphrase_fails_integrity() {
        let record = cheap_vault().encrypt(&[0x11; 32], &pass("correct-horse")).unwrap();
        let err = KeyVault::decrypt(&record, &pass("wrong-horse")).unwrap_err();
        assert!(matches!(err, KeysealError::IntegrityCheckFailed));
    }

    #[test]
    fn empty_passphrase_is_rejected_on_encrypt() {
        let err = cheap_vault().encrypt(&[0x11; 32], &pass("")).unwrap_err();
        assert!(matches!(err, KeysealError::InvalidPassphrase(_)));
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = cheap_vault().encrypt(&[0x11; 31], &pass("pw")).unwrap_err();
        assert!(matches!(err, KeysealError::InvalidSecretFormat(_)));
    }

    #[test]
    fn record_has_expected_shape() {
        let record = cheap_vault().encrypt(&[0x11; 32], &pass("pw")).unwrap();
        assert_eq!(record.version, FORMAT_VERSION);
        assert_eq!(record.id.get_version_num(), 4);
        assert_eq!(record.ciphertext.len(), CIPHERTEXT_LEN);
        assert_eq!(
            record.address,
            Some(RawSecret::from_bytes(&[0x11; 32]).unwrap().address().unwrap())
        );
    }

    #[test]
    fn without_address_omits_it() {
        let record = cheap_vault()
            .without_address()
            .encrypt(&[0x11; 32], &pass("pw"))
            .unwrap();
        assert!(record.address.is_none());
        assert!(KeyVault::decrypt(&record, &pass("pw")).is_ok());
    }

    #[test]
    fn chacha_and_pbkdf2_round_trip() {
        let vault = KeyVault::new(
            KdfSettings::Pbkdf2Sha256 { iterations: 1000 },
            CipherAlgorithm::ChaCha20Poly1305,
        )
        .unwrap();
        let record = vault.encrypt(&[0x22; 32], &pass("pw")).unwrap();
        assert_eq!(KeyVault::decrypt(&record, &pass("pw")).unwrap().expose_secret(), &[0x22; 32]);
    }

    #[test]
    fn new_rejects_out_of_bounds_settings() {
        let err = KeyVault::new(
            KdfSettings::Pbkdf2Sha256 { iterations: 0 },
            CipherAlgorithm::Aes256Gcm,
        )
        .unwrap_err();
        assert!(matches!(err, KeysealError::Config(_)));
    }

    #[test]
    fn from_config_maps_every_field() {
        let config = VaultConfig {
            kdf: KdfAlgorithm::Pbkdf2Sha256,
            pbkdf2_iterations: 200_000,
            cipher: CipherAlgorithm::ChaCha20Poly1305,
            record_address: false,
            ..VaultConfig::default()
        };
        let vault = KeyVault::from_config(&config).unwrap();
        assert_eq!(
            vault.kdf_settings(),
            KdfSettings::Pbkdf2Sha256 { iterations: 200_000 }
        );
        assert_eq!(vault.cipher(), CipherAlgorithm::ChaCha20Poly1305);
        assert!(!vault.record_address);

        let defaults = KeyVault::from_config(&VaultConfig::default()).unwrap();
        assert_eq!(
            defaults.kdf_settings(),
            KdfSettings::Argon2id {
                memory_kib: 65536,
                iterations: 3,
                parallelism: 4
            }
        );
        assert!(defaults.record_address);
    }

    #[test]
    fn unknown_version_is_malformed() {
        let mut record = cheap_vault().encrypt(&[0x11; 32], &pass("pw")).unwrap();
        record.version = 2;
        let err = KeyVault::decrypt(&record, &pass("pw")).unwrap_err();
        assert!(matches!(err, KeysealError::MalformedFormat(_)));
    }

    #[test]
    fn mismatched_address_fails_integrity() {
        let vault = cheap_vault();
        let mut record = vault.encrypt(&[0x11; 32], &pass("pw")).unwrap();
        let other = RawSecret::from_bytes(&[0x22; 32]).unwrap().address().unwrap();
        record.address = Some(other);

        let err = KeyVault::decrypt(&record, &pass("pw")).unwrap_err();
        assert!(matches!(err, KeysealError::IntegrityCheckFailed));
    }

    #[test]
    fn reencrypt_keeps_id_and_address() {
        let vault = cheap_vault();
        let record = vault.encrypt(&[0x11; 32], &pass("old")).unwrap();
        let rotated = vault.reencrypt(&record, &pass("old"), &pass("new")).unwrap();

        assert_eq!(rotated.id, record.id);
        assert_eq!(rotated.address, record.address);
        assert_ne!(rotated.kdf.salt, record.kdf.salt);
        assert_ne!(rotated.cipher.nonce, record.cipher.nonce);
        assert!(KeyVault::decrypt(&rotated, &pass("old")).is_err());
        assert_eq!(
            KeyVault::decrypt(&rotated, &pass("new")).unwrap().expose_secret(),
            &[0x11; 32]
        );
    }

    #[test]
    fn reencrypt_with_wrong_old_passphrase_fails() {
        let vault = cheap_vault();
        let record = vault.encrypt(&[0x11; 32], &pass("old")).unwrap();
        let err = vault.reencrypt(&record, &pass("nope"), &pass("new")).unwrap_err();
        assert!(matches!(err, KeysealError::IntegrityCheckFailed));
    }

    #[traced_test]
    #[test]
    fn logs_never_contain_key_material() {
        let record = cheap_vault().encrypt(&[0x11; 32], &pass("correct-horse")).unwrap();
        KeyVault::decrypt(&record, &pass("correct-horse")).unwrap();

        assert!(logs_contain("private key encrypted"));
        assert!(logs_contain("private key decrypted"));
        assert!(!logs_contain(&"11".repeat(32)));
        assert!(!logs_contain("correct-horse"));
    }
}
