// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request-vs-offered matching between a writer and a reader QoS.

use super::super::Reliability;
use super::structs::QoS;
use std::fmt;

/// First policy that prevented a writer/reader pair from matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QosMismatch {
    Reliability,
    Durability,
    Liveliness,
    Partition,
}

impl fmt::Display for QosMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QosMismatch::Reliability => "RELIABILITY",
            QosMismatch::Durability => "DURABILITY",
            QosMismatch::Liveliness => "LIVELINESS",
            QosMismatch::Partition => "PARTITION",
        };
        f.write_str(name)
    }
}

impl QoS {
    /// Check whether `self` (offered, writer side) satisfies `requested`
    /// (reader side).
    ///
    /// Rules:
    /// - a BEST_EFFORT writer cannot serve a RELIABLE reader
    /// - offered durability must be at least the requested durability
    /// - offered liveliness kind at least as strict, lease at most as long
    /// - partitions must intersect
    pub fn matches(&self, requested: &QoS) -> Result<(), QosMismatch> {
        if self.reliability == Reliability::BestEffort
            && requested.reliability == Reliability::Reliable
        {
            return Err(QosMismatch::Reliability);
        }
        if self.durability < requested.durability {
            return Err(QosMismatch::Durability);
        }
        if !self.liveliness.is_compatible_with(&requested.liveliness) {
            return Err(QosMismatch::Liveliness);
        }
        if !self.partition.is_compatible_with(&requested.partition) {
            return Err(QosMismatch::Partition);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qos::Liveliness;
    use std::time::Duration;

    #[test]
    fn test_reliable_writer_serves_best_effort_reader() {
        assert_eq!(QoS::reliable().matches(&QoS::best_effort()), Ok(()));
    }

    #[test]
    fn test_best_effort_writer_rejects_reliable_reader() {
        assert_eq!(
            QoS::best_effort().matches(&QoS::reliable()),
            Err(QosMismatch::Reliability)
        );
    }

    #[test]
    fn test_durability_rxo() {
        let writer = QoS::reliable().transient_local();
        assert_eq!(writer.matches(&QoS::reliable().volatile()), Ok(()));
        assert_eq!(
            writer.matches(&QoS::reliable().transient()),
            Err(QosMismatch::Durability)
        );
    }

    #[test]
    fn test_liveliness_rxo() {
        let writer = QoS::reliable().liveliness_automatic_millis(5_000);
        let reader = QoS::reliable().liveliness(Liveliness::automatic(Duration::from_secs(1)));
        assert_eq!(writer.matches(&reader), Err(QosMismatch::Liveliness));
    }

    #[test]
    fn test_partition_mismatch() {
        let writer = QoS::reliable().partition_single("ChatRoom");
        assert_eq!(
            writer.matches(&QoS::reliable()),
            Err(QosMismatch::Partition)
        );
        assert_eq!(
            writer.matches(&QoS::reliable().partition_single("ChatRoom")),
            Ok(())
        );
    }

    #[test]
    fn test_mismatch_display() {
        assert_eq!(QosMismatch::Durability.to_string(), "DURABILITY");
    }
}
