// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HMAC-SHA256 over the keystore header and ciphertext.

use hmac::{Hmac, Mac};
use keyseal_core::KeysealError;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// MAC tag length in bytes.
pub const MAC_LEN: usize = 32;

/// MAC key length in bytes.
pub const MAC_KEY_LEN: usize = 32;

fn keyed(key: &[u8; MAC_KEY_LEN], data: &[u8]) -> Result<HmacSha256, KeysealError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|_| KeysealError::Internal("failed to create HMAC-SHA256 key".to_string()))?;
    mac.update(data);
    Ok(mac)
}

/// Compute the tag for `data`.
pub fn compute(key: &[u8; MAC_KEY_LEN], data: &[u8]) -> Result<[u8; MAC_LEN], KeysealError> {
    Ok(keyed(key, data)?.finalize().into_bytes().into())
}

/// Verify `tag` over `data` in constant time.
pub fn verify(key: &[u8; MAC_KEY_LEN], data: &[u8], tag: &[u8; MAC_LEN]) -> Result<(), KeysealError> {
    keyed(key, data)?
        .verify_slice(tag)
        .map_err(|_| KeysealError::IntegrityCheckFailed)
}
