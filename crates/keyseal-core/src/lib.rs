// SPDX-FileCopyrightText: 2026 Keyseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the keyseal workspace.
//!
//! Provides the shared error type and the algorithm identifiers used by both
//! the configuration model and the encrypted keystore format.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, KeysealError};
pub use types::{CipherAlgorithm, KdfAlgorithm};
