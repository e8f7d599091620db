// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entity GUIDs.
//!
//! Layout (16 bytes):
//!
//! ```text
//! [0..4)   process id (big-endian)
//! [4..8)   per-process nonce
//! [8..12)  participant counter
//! [12..16) entity counter
//! ```
//!
//! The first 8 bytes identify the process; the UDP listener uses them to
//! drop its own multicast loopback.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_PARTICIPANT: AtomicU32 = AtomicU32::new(1);

/// 8-byte process prefix, computed once.
pub(crate) fn process_prefix() -> [u8; 8] {
    static PREFIX: OnceLock<[u8; 8]> = OnceLock::new();
    *PREFIX.get_or_init(|| {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(0);
        let mut prefix = [0u8; 8];
        prefix[..4].copy_from_slice(&pid.to_be_bytes());
        prefix[4..].copy_from_slice(&nanos.to_be_bytes());
        prefix
    })
}

/// 16-byte entity identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub(crate) struct Guid(pub [u8; 16]);

impl Guid {
    /// GUID of a new participant (entity counter 0).
    pub(crate) fn new_participant() -> Self {
        let counter = NEXT_PARTICIPANT.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&process_prefix());
        bytes[8..12].copy_from_slice(&counter.to_be_bytes());
        Self(bytes)
    }

    /// GUID of an entity created by this participant.
    pub(crate) fn child(&self, entity: u32) -> Self {
        let mut bytes = self.0;
        bytes[12..].copy_from_slice(&entity.to_be_bytes());
        Self(bytes)
    }

    pub(crate) fn is_local_process(&self) -> bool {
        self.0[..8] == process_prefix()
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i == 8 || i == 12 {
                write!(f, ".")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
