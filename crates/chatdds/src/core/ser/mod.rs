// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR2 (little-endian) serialization helpers.
//!
//! Used both by the wire frame codec and by hand-written [`crate::DDS`]
//! implementations of user types.

pub mod cursor;

pub use cursor::{Cursor, CursorMut};

use std::fmt;

/// Serialization error used within core::ser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerError {
    WriteFailed { offset: usize, reason: String },
    ReadFailed { offset: usize, reason: String },
    InvalidData { reason: String },
}

/// Result alias for cursor operations.
pub type SerResult<T> = Result<T, SerError>;

impl fmt::Display for SerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerError::WriteFailed { offset, reason } => {
                write!(f, "write failed at offset {}: {}", offset, reason)
            }
            SerError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            SerError::InvalidData { reason } => write!(f, "invalid data: {}", reason),
        }
    }
}

impl std::error::Error for SerError {}

impl From<SerError> for crate::dds::Error {
    fn from(err: SerError) -> Self {
        match err {
            SerError::WriteFailed { .. } => crate::dds::Error::BufferTooSmall,
            other => crate::dds::Error::SerializationError(other.to_string()),
        }
    }
}

/// Build a 16-byte instance key hash from the CDR big-endian serialized key.
///
/// Keys of 16 bytes or less are zero-padded; longer keys are MD5 digested
/// (DDS key hash rule).
pub fn key_hash(key_be: &[u8]) -> [u8; 16] {
    use md5::{Digest, Md5};
    let mut out = [0u8; 16];
    if key_be.len() <= 16 {
        out[..key_be.len()].copy_from_slice(key_be);
        return out;
    }
    out.copy_from_slice(&Md5::digest(key_be));
    out
}
