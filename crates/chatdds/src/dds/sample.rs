// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instance handles, sample/view/instance states and `SampleInfo`.
//!
//! State masks follow DDS v1.4 Sec.2.2.2.5.4 and are used by
//! `DataReader::take_samples` / `read_samples` to select samples.

use super::time::Time;
use std::fmt;

/// Instance handle for keyed topics (16-byte key hash).
///
/// For keyless topics, this is all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct InstanceHandle(pub [u8; 16]);

impl InstanceHandle {
    /// Create a new instance handle from a key hash.
    pub const fn new(key_hash: [u8; 16]) -> Self {
        Self(key_hash)
    }

    /// Create a nil (all zeros) instance handle (`HANDLE_NIL`).
    pub const fn nil() -> Self {
        Self([0u8; 16])
    }

    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 16]
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Sample state (NOT_READ vs READ).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleState {
    NotRead,
    Read,
}

/// View state of an instance as seen by one reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No sample of this instance generation has been accessed yet.
    New,
    NotNew,
}

/// Instance state as seen by one reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Alive,
    /// A writer disposed the instance.
    NotAliveDisposed,
    /// Every known writer unregistered the instance without disposing it.
    NotAliveNoWriters,
}

impl InstanceState {
    pub fn is_alive(&self) -> bool {
        matches!(self, InstanceState::Alive)
    }
}

macro_rules! state_mask {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(u32);

        impl $name {
            /// Create from raw bits
            pub const fn from_bits(bits: u32) -> Self {
                $name(bits)
            }

            /// Get raw bits
            pub const fn bits(&self) -> u32 {
                self.0
            }

            /// Check if contains state
            pub const fn contains(&self, other: $name) -> bool {
                (self.0 & other.0) == other.0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                $name(self.0 | rhs.0)
            }
        }
    };
}

state_mask!(
    /// Sample state mask
    SampleStateMask
);
state_mask!(
    /// View state mask
    ViewStateMask
);
state_mask!(
    /// Instance state mask
    InstanceStateMask
);

impl SampleStateMask {
    pub const READ: SampleStateMask = SampleStateMask(1 << 0);
    pub const NOT_READ: SampleStateMask = SampleStateMask(1 << 1);
    pub const ANY: SampleStateMask = SampleStateMask(Self::READ.0 | Self::NOT_READ.0);

    pub const fn matches(&self, state: SampleState) -> bool {
        match state {
            SampleState::Read => self.contains(Self::READ),
            SampleState::NotRead => self.contains(Self::NOT_READ),
        }
    }
}

impl ViewStateMask {
    pub const NEW: ViewStateMask = ViewStateMask(1 << 0);
    pub const NOT_NEW: ViewStateMask = ViewStateMask(1 << 1);
    pub const ANY: ViewStateMask = ViewStateMask(Self::NEW.0 | Self::NOT_NEW.0);

    pub const fn matches(&self, state: ViewState) -> bool {
        match state {
            ViewState::New => self.contains(Self::NEW),
            ViewState::NotNew => self.contains(Self::NOT_NEW),
        }
    }
}

impl InstanceStateMask {
    pub const ALIVE: InstanceStateMask = InstanceStateMask(1 << 0);
    pub const NOT_ALIVE_DISPOSED: InstanceStateMask = InstanceStateMask(1 << 1);
    pub const NOT_ALIVE_NO_WRITERS: InstanceStateMask = InstanceStateMask(1 << 2);
    pub const NOT_ALIVE: InstanceStateMask =
        InstanceStateMask(Self::NOT_ALIVE_DISPOSED.0 | Self::NOT_ALIVE_NO_WRITERS.0);
    pub const ANY: InstanceStateMask = InstanceStateMask(Self::ALIVE.0 | Self::NOT_ALIVE.0);

    pub const fn matches(&self, state: InstanceState) -> bool {
        match state {
            InstanceState::Alive => self.contains(Self::ALIVE),
            InstanceState::NotAliveDisposed => self.contains(Self::NOT_ALIVE_DISPOSED),
            InstanceState::NotAliveNoWriters => self.contains(Self::NOT_ALIVE_NO_WRITERS),
        }
    }
}

/// Metadata delivered alongside each sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleInfo {
    pub sample_state: SampleState,
    pub view_state: ViewState,
    pub instance_state: InstanceState,
    /// `false` for dispose/unregister notifications (no data).
    pub valid_data: bool,
    pub source_timestamp: Time,
    pub instance_handle: InstanceHandle,
    /// GUID of the writer that produced the sample.
    pub publication_handle: InstanceHandle,
    /// Writer sequence number (starts at 1).
    pub sequence_number: u64,
}

/// A sample returned by `take`/`read`: data (if valid) plus its info.
#[derive(Debug, Clone)]
pub struct Sample<T> {
    pub data: Option<T>,
    pub info: SampleInfo,
}

impl<T> Sample<T> {
    /// Data of a valid sample; `None` for lifecycle notifications.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_mask_any_matches_all() {
        for state in [
            InstanceState::Alive,
            InstanceState::NotAliveDisposed,
            InstanceState::NotAliveNoWriters,
        ] {
            assert!(InstanceStateMask::ANY.matches(state));
        }
        assert!(!InstanceStateMask::ALIVE.matches(InstanceState::NotAliveDisposed));
        assert!(InstanceStateMask::NOT_ALIVE.matches(InstanceState::NotAliveNoWriters));
    }

    #[test]
    fn test_mask_bitor() {
        let mask = SampleStateMask::READ | SampleStateMask::NOT_READ;
        assert_eq!(mask, SampleStateMask::ANY);
        assert!(ViewStateMask::ANY.matches(ViewState::New));
        assert!(!ViewStateMask::NOT_NEW.matches(ViewState::New));
    }

    #[test]
    fn test_nil_handle() {
        assert!(InstanceHandle::nil().is_nil());
        assert!(!InstanceHandle::new([1; 16]).is_nil());
        assert_eq!(InstanceHandle::new([0xab; 16]).to_string().len(), 32);
    }
}
