// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! LIVELINESS QoS policy (DDS v1.4 Sec.2.2.3.10).
//!
//! Carried on every endpoint and checked during matching. Lease expiry is
//! not monitored.

use super::DURATION_INFINITE;
use std::time::Duration;

/// LIVELINESS QoS kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LivelinessKind {
    /// DDS infrastructure automatically asserts liveliness.
    #[default]
    Automatic,
    /// Application must assert per participant.
    ManualByParticipant,
    /// Application must assert per writer/topic.
    ManualByTopic,
}

impl LivelinessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LivelinessKind::Automatic => "AUTOMATIC",
            LivelinessKind::ManualByParticipant => "MANUAL_BY_PARTICIPANT",
            LivelinessKind::ManualByTopic => "MANUAL_BY_TOPIC",
        }
    }
}

/// LIVELINESS QoS policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Liveliness {
    pub kind: LivelinessKind,
    pub lease_duration: Duration,
}

impl Default for Liveliness {
    fn default() -> Self {
        Self {
            kind: LivelinessKind::Automatic,
            lease_duration: DURATION_INFINITE,
        }
    }
}

impl Liveliness {
    #[must_use]
    pub fn new(kind: LivelinessKind, lease_duration: Duration) -> Self {
        Self {
            kind,
            lease_duration,
        }
    }

    #[must_use]
    pub fn automatic(lease_duration: Duration) -> Self {
        Self::new(LivelinessKind::Automatic, lease_duration)
    }

    #[must_use]
    pub fn manual_by_participant(lease_duration: Duration) -> Self {
        Self::new(LivelinessKind::ManualByParticipant, lease_duration)
    }

    #[must_use]
    pub fn manual_by_topic(lease_duration: Duration) -> Self {
        Self::new(LivelinessKind::ManualByTopic, lease_duration)
    }

    #[must_use]
    pub fn infinite() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.lease_duration == DURATION_INFINITE
    }

    /// RxO: offered kind must be at least as strict, offered lease at most as long.
    #[must_use]
    pub fn is_compatible_with(&self, requested: &Liveliness) -> bool {
        self.kind >= requested.kind && self.lease_duration <= requested.lease_duration
    }
}
