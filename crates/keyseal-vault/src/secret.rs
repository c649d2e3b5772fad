// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plaintext private key, held only in zeroizing memory.

use std::fmt;

use keyseal_core::KeysealError;
use zeroize::Zeroizing;

use crate::address::Address;

/// Raw private key length in bytes.
pub const SECRET_LEN: usize = 32;

/// A validated secp256k1 private key.
///
/// The bytes are zeroed when the value is dropped. `Debug` never prints them.
#[derive(Clone)]
pub struct RawSecret(Zeroizing<[u8; SECRET_LEN]>);

impl RawSecret {
    /// Accept exactly 32 bytes forming a non-zero scalar below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeysealError> {
        // `SecretKey::from_slice` left-pads short input, so check the length first.
        if bytes.len() != SECRET_LEN {
            return Err(KeysealError::InvalidSecretFormat(format!(
                "expected {SECRET_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        k256::SecretKey::from_slice(bytes).map_err(|_| {
            KeysealError::InvalidSecretFormat("not a valid secp256k1 private key".to_string())
        })?;

        let mut out = Zeroizing::new([0u8; SECRET_LEN]);
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Parse a `0x`-prefixed 64-digit hex key as typed by a human.
    ///
    /// Surrounding whitespace and one pair of matching quotes are ignored.
    pub fn from_hex(input: &str) -> Result<Self, KeysealError> {
        let mut value = input.trim();
        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                value = value[1..value.len() - 1].trim();
                break;
            }
        }

        let digits = value.strip_prefix("0x").ok_or_else(|| {
            KeysealError::InvalidSecretFormat("private key must start with 0x".to_string())
        })?;
        if digits.len() != SECRET_LEN * 2 {
            return Err(KeysealError::InvalidSecretFormat(format!(
                "private key must have {} hex digits, got {}",
                SECRET_LEN * 2,
                digits.len()
            )));
        }

        let mut bytes = Zeroizing::new([0u8; SECRET_LEN]);
        hex::decode_to_slice(digits, &mut bytes[..]).map_err(|_| {
            KeysealError::InvalidSecretFormat("private key is not valid hex".to_string())
        })?;
        Self::from_bytes(&bytes[..])
    }

    pub fn expose_secret(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex, zeroed on drop.
    pub fn to_hex(&self) -> Zeroizing<String> {
        let mut out = Zeroizing::new(String::with_capacity(2 + SECRET_LEN * 2));
        out.push_str("0x");
        out.push_str(&Zeroizing::new(hex::encode(&self.0[..])));
        out
    }

    /// The account address controlled by this key.
    pub fn address(&self) -> Result<Address, KeysealError> {
        let key = k256::SecretKey::from_slice(&self.0[..]).map_err(|_| {
            KeysealError::InvalidSecretFormat("not a valid secp256k1 private key".to_string())
        })?;
        Ok(Address::from_secret_key(&key))
    }
}

impl fmt::Debug for RawSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawSecret([REDACTED])")
    }
}
