// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! LIFESPAN QoS policy (DDS v1.4 Sec.2.2.3.9)
//!
//! The writer's lifespan travels with every sample. Readers drop samples
//! whose source timestamp plus lifespan lies in the past before handing
//! them out.

use super::DURATION_INFINITE;
use std::time::Duration;

/// LIFESPAN QoS policy. Default: infinite (samples never expire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifespan {
    /// Maximum sample validity duration
    pub duration: Duration,
}

impl Default for Lifespan {
    fn default() -> Self {
        Self {
            duration: DURATION_INFINITE,
        }
    }
}

impl Lifespan {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn infinite() -> Self {
        Self::default()
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn is_infinite(&self) -> bool {
        self.duration == DURATION_INFINITE
    }

    /// Lifespan in nanoseconds as carried on the wire (`u64::MAX` = infinite).
    pub fn as_wire_nanos(&self) -> u64 {
        if self.is_infinite() {
            u64::MAX
        } else {
            u64::try_from(self.duration.as_nanos()).unwrap_or(u64::MAX)
        }
    }

    pub fn from_wire_nanos(nanos: u64) -> Self {
        if nanos == u64::MAX {
            Self::infinite()
        } else {
            Self::new(Duration::from_nanos(nanos))
        }
    }

    /// Whether a sample written at `source_ns` has expired at `now_ns`
    /// (both in nanoseconds since the UNIX epoch).
    pub fn is_expired(&self, source_ns: u64, now_ns: u64) -> bool {
        if self.is_infinite() {
            return false;
        }
        let ttl = u64::try_from(self.duration.as_nanos()).unwrap_or(u64::MAX);
        now_ns.saturating_sub(source_ns) > ttl
    }
}
