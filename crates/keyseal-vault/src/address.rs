// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ethereum-style addresses derived from secp256k1 private keys.
//!
//! The address is the last 20 bytes of the Keccak-256 hash of the
//! uncompressed public key (without its 0x04 tag), displayed with the
//! EIP-55 mixed-case checksum.

use std::fmt;
use std::str::FromStr;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use keyseal_core::KeysealError;
use sha3::{Digest, Keccak256};

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Derive the address of a validated secp256k1 secret key.
    pub fn from_secret_key(secret: &k256::SecretKey) -> Self {
        let point = secret.public_key().to_encoded_point(false);
        let hash = Keccak256::digest(&point.as_bytes()[1..]);
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&hash[32 - ADDRESS_LEN..]);
        Self(out)
    }

    /// EIP-55 checksummed hex form, `0x`-prefixed.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = KeysealError;

    /// Parse `0x` + 40 hex digits.
    ///
    /// All-lowercase and all-uppercase inputs carry no checksum and are
    /// accepted as-is; mixed case must match EIP-55 exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| KeysealError::MalformedFormat("address must start with 0x".to_string()))?;
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(KeysealError::MalformedFormat(format!(
                "address must have {} hex digits, got {}",
                ADDRESS_LEN * 2,
                digits.len()
            )));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| KeysealError::MalformedFormat(format!("address is not valid hex: {e}")))?;
        let address = Self(bytes);

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum() != s {
            return Err(KeysealError::MalformedFormat(
                "address checksum mismatch".to_string(),
            ));
        }

        Ok(address)
    }
}
