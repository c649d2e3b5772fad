// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading and writing keystore files.
//!
//! Writes go to a temporary file in the destination directory which is then
//! renamed into place, so a reader never sees a half-written keystore.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use keyseal_core::KeysealError;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::format::EncryptedSecret;

/// Largest keystore file accepted by [`read_keystore`].
pub const MAX_KEYSTORE_BYTES: u64 = 64 * 1024;

/// Write `secret` to `path`, creating parent directories as needed.
///
/// Without `overwrite`, an existing file at `path` is left untouched and an
/// [`io::ErrorKind::AlreadyExists`] error is returned.
pub fn write_keystore(
    path: &Path,
    secret: &EncryptedSecret,
    overwrite: bool,
) -> Result<(), KeysealError> {
    let mut json = secret.to_json()?;
    json.push('\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| KeysealError::io(dir, e))?;

    if !overwrite && path.exists() {
        return Err(KeysealError::io(
            path,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "keystore already exists (pass --force to replace it)",
            ),
        ));
    }

    // NamedTempFile is created with mode 0600 on unix.
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| KeysealError::io(dir, e))?;
    tmp.write_all(json.as_bytes())
        .map_err(|e| KeysealError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| KeysealError::io(tmp.path(), e))?;

    let persisted = if overwrite {
        tmp.persist(path)
    } else {
        tmp.persist_noclobber(path)
    };
    persisted.map_err(|e| KeysealError::io(path, e.error))?;

    info!(path = %path.display(), id = %secret.id, "keystore written");
    Ok(())
}

/// Read and parse the keystore at `path`.
pub fn read_keystore(path: &Path) -> Result<EncryptedSecret, KeysealError> {
    let file = File::open(path).map_err(|e| KeysealError::io(path, e))?;

    let mut bytes = Vec::new();
    file.take(MAX_KEYSTORE_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| KeysealError::io(path, e))?;
    if bytes.len() as u64 > MAX_KEYSTORE_BYTES {
        return Err(KeysealError::MalformedFormat(format!(
            "keystore file exceeds {MAX_KEYSTORE_BYTES} bytes"
        )));
    }

    let text = String::from_utf8(bytes)
        .map_err(|_| KeysealError::MalformedFormat("keystore is not UTF-8 text".to_string()))?;
    let secret = EncryptedSecret::from_json(&text)?;

    debug!(path = %path.display(), id = %secret.id, "keystore read");
    Ok(secret)
}
