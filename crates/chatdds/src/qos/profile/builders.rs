// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! QoS builder methods.

use super::super::{
    Durability, History, LatencyBudget, Lifespan, Liveliness, LivelinessKind, Partition,
    Reliability,
};
use super::structs::QoS;
use std::time::Duration;

impl QoS {
    /// Set RELIABLE reliability.
    pub fn reliable_kind(mut self) -> Self {
        self.reliability = Reliability::Reliable;
        self
    }

    /// Set BEST_EFFORT reliability.
    pub fn best_effort_kind(mut self) -> Self {
        self.reliability = Reliability::BestEffort;
        self
    }

    pub fn max_blocking_time(mut self, duration: Duration) -> Self {
        self.max_blocking_time = duration;
        self
    }

    /// Set KEEP_LAST history depth.
    pub fn keep_last(mut self, depth: u32) -> Self {
        self.history = History::KeepLast(depth);
        self
    }

    /// Set KEEP_ALL history policy.
    pub fn keep_all(mut self) -> Self {
        self.history = History::KeepAll;
        self
    }

    pub fn volatile(mut self) -> Self {
        self.durability = Durability::Volatile;
        self
    }

    pub fn transient_local(mut self) -> Self {
        self.durability = Durability::TransientLocal;
        self
    }

    pub fn transient(mut self) -> Self {
        self.durability = Durability::Transient;
        self
    }

    pub fn persistent(mut self) -> Self {
        self.durability = Durability::Persistent;
        self
    }

    /// Set LATENCY_BUDGET in milliseconds.
    pub fn latency_budget_millis(mut self, ms: u64) -> Self {
        self.latency_budget = LatencyBudget::from_millis(ms);
        self
    }

    /// Set LIFESPAN in milliseconds.
    pub fn lifespan_millis(mut self, ms: u64) -> Self {
        self.lifespan = Lifespan::from_millis(ms);
        self
    }

    /// Set LIFESPAN in seconds.
    pub fn lifespan_secs(mut self, secs: u64) -> Self {
        self.lifespan = Lifespan::from_secs(secs);
        self
    }

    pub fn liveliness(mut self, liveliness: Liveliness) -> Self {
        self.liveliness = liveliness;
        self
    }

    /// Set AUTOMATIC liveliness with a lease in milliseconds.
    pub fn liveliness_automatic_millis(mut self, ms: u64) -> Self {
        self.liveliness = Liveliness::new(LivelinessKind::Automatic, Duration::from_millis(ms));
        self
    }

    /// Set the partition to a single name.
    pub fn partition_single(mut self, name: &str) -> Self {
        self.partition = Partition::single(name);
        self
    }

    pub fn partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    /// Set WRITER_DATA_LIFECYCLE.autodispose_unregistered_instances.
    pub fn autodispose_unregistered(mut self, enabled: bool) -> Self {
        self.writer_data_lifecycle.autodispose_unregistered_instances = enabled;
        self
    }

    pub fn max_samples(mut self, max: usize) -> Self {
        self.resource_limits.max_samples = max;
        self
    }

    pub fn max_instances(mut self, max: usize) -> Self {
        self.resource_limits.max_instances = max;
        self
    }

    pub fn max_samples_per_instance(mut self, max: usize) -> Self {
        self.resource_limits.max_samples_per_instance = max;
        self
    }
}
