// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Quality of Service policies.
//!
//! Policies follow the DDS v1.4 names. The aggregate [`QoS`] profile is what
//! entities are created with; individual policies live in submodules.
//!
//! Request-vs-offered (RxO) matching is implemented by [`QoS::matches`]:
//! a writer and a reader communicate only when every RxO policy offered by
//! the writer satisfies what the reader requests and their partitions
//! intersect.

pub mod latency_budget;
pub mod lifecycle;
pub mod lifespan;
pub mod liveliness;
pub mod partition;
mod profile;

pub use latency_budget::LatencyBudget;
pub use lifecycle::{ReaderDataLifecycle, WriterDataLifecycle};
pub use lifespan::Lifespan;
pub use liveliness::{Liveliness, LivelinessKind};
pub use partition::Partition;
pub use profile::{QoS, QosMismatch};

use std::time::Duration;

/// Sentinel used for "infinite" durations (DDS `DURATION_INFINITE`).
pub const DURATION_INFINITE: Duration = Duration::from_secs(u64::MAX);

/// Default RELIABILITY max_blocking_time (DDS default: 100ms).
pub const DEFAULT_MAX_BLOCKING_TIME: Duration = Duration::from_millis(100);

/// Reliability policy
///
/// Determines delivery guarantees for samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Reliability {
    /// Fire-and-forget (no retransmission).
    #[default]
    BestEffort,
    /// Every sample accepted by the writer must reach matched readers.
    ///
    /// In-process delivery is always complete. Over UDP, gaps are detected
    /// and counted as lost samples (see `ReaderStats::samples_lost`).
    Reliable,
}

impl Reliability {
    /// DDS spelling of the kind, as printed in QoS reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reliability::BestEffort => "BEST_EFFORT",
            Reliability::Reliable => "RELIABLE",
        }
    }
}

/// History policy
///
/// Determines how many samples are kept per instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum History {
    /// Keep last N samples per instance (bounded queue, drops oldest).
    KeepLast(u32),
    /// Keep all samples within resource limits; inserts beyond them are rejected.
    KeepAll,
}

impl Default for History {
    fn default() -> Self {
        Self::KeepLast(100)
    }
}

/// Durability policy
///
/// Ordered from weakest to strongest; a writer offering a stronger kind
/// satisfies a reader requesting a weaker one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Durability {
    /// No history for late joiners.
    #[default]
    Volatile,
    /// Writer keeps its history for late-joining readers while it lives.
    TransientLocal,
    /// Same delivery as `TransientLocal`; no separate durability service.
    Transient,
    /// Same delivery as `TransientLocal`; nothing is written to disk.
    Persistent,
}

impl Durability {
    /// Whether late-joining readers get the writer's history.
    pub fn is_durable(&self) -> bool {
        !matches!(self, Durability::Volatile)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Durability::Volatile => "VOLATILE",
            Durability::TransientLocal => "TRANSIENT_LOCAL",
            Durability::Transient => "TRANSIENT",
            Durability::Persistent => "PERSISTENT",
        }
    }
}

/// Resource limits for Writer/Reader caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum total samples across all instances.
    pub max_samples: usize,
    /// Maximum live instances.
    pub max_instances: usize,
    /// Maximum samples per instance.
    pub max_samples_per_instance: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_samples: 100_000,
            max_instances: 10_000,
            max_samples_per_instance: 100_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reliability_default() {
        assert_eq!(Reliability::default(), Reliability::BestEffort);
    }

    #[test]
    fn test_history_default() {
        assert_eq!(History::default(), History::KeepLast(100));
    }

    #[test]
    fn test_durability_ordering() {
        assert!(Durability::Volatile < Durability::TransientLocal);
        assert!(Durability::TransientLocal < Durability::Transient);
        assert!(Durability::Transient < Durability::Persistent);
        assert!(!Durability::Volatile.is_durable());
        assert!(Durability::Transient.is_durable());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Reliability::Reliable.as_str(), "RELIABLE");
        assert_eq!(Reliability::BestEffort.as_str(), "BEST_EFFORT");
        assert_eq!(Durability::Transient.as_str(), "TRANSIENT");
    }
}
