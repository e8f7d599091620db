// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! QoS struct definition.

use super::super::{
    Durability, History, LatencyBudget, Lifespan, Liveliness, Partition, ReaderDataLifecycle,
    Reliability, ResourceLimits, WriterDataLifecycle, DEFAULT_MAX_BLOCKING_TIME,
};
use crate::dds::{Error, Result};
use std::time::Duration;

/// Aggregated QoS profile used by the public API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QoS {
    pub reliability: Reliability,
    /// RELIABILITY max_blocking_time (reported, writes never block).
    pub max_blocking_time: Duration,
    pub history: History,
    pub durability: Durability,
    pub latency_budget: LatencyBudget,
    pub lifespan: Lifespan,
    pub liveliness: Liveliness,
    pub partition: Partition,
    pub resource_limits: ResourceLimits,
    pub writer_data_lifecycle: WriterDataLifecycle,
    pub reader_data_lifecycle: ReaderDataLifecycle,
}

impl QoS {
    /// Create BestEffort QoS profile (default baseline).
    pub fn best_effort() -> Self {
        Self {
            reliability: Reliability::BestEffort,
            max_blocking_time: DEFAULT_MAX_BLOCKING_TIME,
            history: History::KeepLast(100),
            durability: Durability::Volatile,
            latency_budget: LatencyBudget::zero(),
            lifespan: Lifespan::infinite(),
            liveliness: Liveliness::infinite(),
            partition: Partition::default(),
            resource_limits: ResourceLimits::default(),
            writer_data_lifecycle: WriterDataLifecycle::default(),
            reader_data_lifecycle: ReaderDataLifecycle::default(),
        }
    }

    /// Create Reliable QoS profile.
    pub fn reliable() -> Self {
        Self {
            reliability: Reliability::Reliable,
            ..Self::best_effort()
        }
    }

    /// Check internal consistency.
    ///
    /// Rejects a zero history depth, a depth larger than
    /// `max_samples_per_instance`, and zero resource limits.
    pub fn validate(&self) -> Result<()> {
        if let History::KeepLast(depth) = self.history {
            if depth == 0 {
                log::debug!("[qos] rejected KEEP_LAST(0)");
                return Err(Error::InvalidQos);
            }
            if depth as usize > self.resource_limits.max_samples_per_instance {
                log::debug!(
                    "[qos] rejected KEEP_LAST({}) > max_samples_per_instance {}",
                    depth,
                    self.resource_limits.max_samples_per_instance
                );
                return Err(Error::InvalidQos);
            }
        }
        let limits = &self.resource_limits;
        if limits.max_samples == 0 || limits.max_instances == 0 || limits.max_samples_per_instance == 0
        {
            return Err(Error::InvalidQos);
        }
        if limits.max_samples_per_instance > limits.max_samples {
            return Err(Error::InvalidQos);
        }
        Ok(())
    }

    /// Overwrite the policies shared with a topic (`copy_from_topic_qos`).
    ///
    /// Partition and data lifecycle are publisher/writer level policies and
    /// are left untouched.
    #[must_use]
    pub fn copy_from_topic_qos(mut self, topic_qos: &QoS) -> Self {
        self.reliability = topic_qos.reliability;
        self.max_blocking_time = topic_qos.max_blocking_time;
        self.history = topic_qos.history;
        self.durability = topic_qos.durability;
        self.latency_budget = topic_qos.latency_budget;
        self.lifespan = topic_qos.lifespan;
        self.liveliness = topic_qos.liveliness;
        self.resource_limits = topic_qos.resource_limits;
        self
    }

    /// Depth used by per-instance caches (KEEP_ALL is bounded by resource limits).
    pub fn history_depth(&self) -> usize {
        match self.history {
            History::KeepLast(depth) => depth as usize,
            History::KeepAll => self.resource_limits.max_samples_per_instance,
        }
    }
}

impl Default for QoS {
    fn default() -> Self {
        Self::best_effort()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_best_effort_volatile() {
        let qos = QoS::default();
        assert_eq!(qos.reliability, Reliability::BestEffort);
        assert_eq!(qos.durability, Durability::Volatile);
        assert_eq!(qos.max_blocking_time, Duration::from_millis(100));
        assert!(qos.lifespan.is_infinite());
        assert!(qos.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let qos = QoS::reliable().keep_last(0);
        assert!(matches!(qos.validate(), Err(Error::InvalidQos)));
    }

    #[test]
    fn test_validate_rejects_depth_over_limit() {
        let mut qos = QoS::reliable().keep_last(50);
        qos.resource_limits.max_samples_per_instance = 10;
        assert!(matches!(qos.validate(), Err(Error::InvalidQos)));
    }

    #[test]
    fn test_copy_from_topic_qos_keeps_partition_and_lifecycle() {
        let topic = QoS::reliable().transient().keep_last(7);
        let writer = QoS::best_effort()
            .partition_single("ChatRoom")
            .autodispose_unregistered(false)
            .copy_from_topic_qos(&topic);

        assert_eq!(writer.reliability, Reliability::Reliable);
        assert_eq!(writer.durability, Durability::Transient);
        assert_eq!(writer.history, History::KeepLast(7));
        assert_eq!(writer.partition, Partition::single("ChatRoom"));
        assert!(!writer.writer_data_lifecycle.autodispose_unregistered_instances);
    }

    #[test]
    fn test_history_depth_keep_all_uses_limits() {
        let qos = QoS::reliable().keep_all();
        assert_eq!(qos.history_depth(), qos.resource_limits.max_samples_per_instance);
    }
}
