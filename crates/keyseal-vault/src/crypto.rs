// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AEAD seal/open operations and randomness.
//!
//! Randomness comes from [`SystemRandom`], which is safe to use from any
//! number of threads; every salt, nonce and id is drawn fresh.

use keyseal_core::{CipherAlgorithm, KeysealError};
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// AEAD nonce length (96 bits for both supported ciphers).
pub const NONCE_LEN: usize = 12;

/// AEAD authentication tag length appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// Cipher key length in bytes.
pub const CIPHER_KEY_LEN: usize = 32;

/// Cipher algorithm plus the nonce used for one keystore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherParams {
    pub algorithm: CipherAlgorithm,
    pub nonce: [u8; NONCE_LEN],
}

impl CipherParams {
    /// Pair `algorithm` with a freshly generated nonce.
    pub fn with_fresh_nonce(algorithm: CipherAlgorithm) -> Result<Self, KeysealError> {
        Ok(Self {
            algorithm,
            nonce: random_array()?,
        })
    }

    /// Append the unambiguous binary form of these parameters to `out`.
    pub(crate) fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(match self.algorithm {
            CipherAlgorithm::Aes256Gcm => 1,
            CipherAlgorithm::ChaCha20Poly1305 => 2,
        });
        out.extend_from_slice(&self.nonce);
    }

    fn key(&self, key: &[u8; CIPHER_KEY_LEN]) -> Result<LessSafeKey, KeysealError> {
        let algorithm = match self.algorithm {
            CipherAlgorithm::Aes256Gcm => &aead::AES_256_GCM,
            CipherAlgorithm::ChaCha20Poly1305 => &aead::CHACHA20_POLY1305,
        };
        let unbound = UnboundKey::new(algorithm, key).map_err(|_| {
            KeysealError::Internal(format!("failed to create {} key", self.algorithm))
        })?;
        Ok(LessSafeKey::new(unbound))
    }

    /// Encrypt `plaintext`, binding `aad` into the tag.
    ///
    /// Returns the ciphertext with the 16-byte tag appended.
    pub fn seal(
        &self,
        key: &[u8; CIPHER_KEY_LEN],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, KeysealError> {
        let less_safe = self.key(key)?;
        let nonce = Nonce::assume_unique_for_key(self.nonce);

        let mut in_out = plaintext.to_vec();
        less_safe
            .seal_in_place_append_tag(nonce, Aad::from(aad), &mut in_out)
            .map_err(|_| KeysealError::Internal(format!("{} encryption failed", self.algorithm)))?;

        Ok(in_out)
    }

    /// Decrypt `ciphertext` (tag included) produced by [`CipherParams::seal`].
    ///
    /// Any failure is reported as [`KeysealError::IntegrityCheckFailed`]; the
    /// working buffer is zeroized whether or not the tag verifies.
    pub fn open(
        &self,
        key: &[u8; CIPHER_KEY_LEN],
        aad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, KeysealError> {
        let less_safe = self.key(key)?;
        let nonce = Nonce::assume_unique_for_key(self.nonce);

        let mut in_out = Zeroizing::new(ciphertext.to_vec());
        let plaintext_len = less_safe
            .open_in_place(nonce, Aad::from(aad), in_out.as_mut_slice())
            .map_err(|_| KeysealError::IntegrityCheckFailed)?
            .len();
        in_out.truncate(plaintext_len);

        Ok(in_out)
    }
}

/// Fill a fixed-size array from the system CSPRNG.
pub fn random_array<const N: usize>() -> Result<[u8; N], KeysealError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; N];
    rng.fill(&mut bytes)
        .map_err(|_| KeysealError::Internal("system random number generator failed".to_string()))?;
    Ok(bytes)
}
