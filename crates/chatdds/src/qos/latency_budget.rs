// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! LATENCY_BUDGET QoS policy (DDS v1.4 Sec.2.2.3.15)
//!
//! A hint about the acceptable delay from write to receive. It does not
//! take part in matching and is not enforced.

use std::time::Duration;

/// LATENCY_BUDGET QoS policy. Default: zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencyBudget {
    /// Maximum acceptable delay from write to receive
    pub duration: Duration,
}

impl LatencyBudget {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn is_zero(&self) -> bool {
        self.duration.is_zero()
    }
}
