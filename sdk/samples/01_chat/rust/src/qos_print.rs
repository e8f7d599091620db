// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Human-readable QoS dump.
//!
//! ```text
//!
//! --Qos Policy for topic Chat_ChatMessage
//! Reliability:
//!   kind:RELIABLE
//!   max_blocking_time (sec): 0.1
//! Liveliness:
//!   kind: AUTOMATIC
//!   lease duration: INFINITE
//! Latency Budget: 0
//! Lifespan: INFINITE
//!
//! ```
//!
//! Readers have no LIFESPAN policy, so their report stops after the
//! latency budget.

use chatdds::qos::{LivelinessKind, Reliability, DURATION_INFINITE};
use chatdds::QoS;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::time::Duration;

/// Which entity a QoS belongs to (decides the policies shown).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QosScope {
    Topic,
    DataWriter,
    DataReader,
}

/// The subset of a QoS the tutorial prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QosReport {
    pub reliability: Reliability,
    pub max_blocking_time: Duration,
    pub liveliness: LivelinessKind,
    pub lease_duration: Duration,
    pub latency_budget: Duration,
    /// `None` for readers.
    pub lifespan: Option<Duration>,
}

impl QosReport {
    pub fn new(scope: QosScope, qos: &QoS) -> Self {
        Self {
            reliability: qos.reliability,
            max_blocking_time: qos.max_blocking_time,
            liveliness: qos.liveliness.kind,
            lease_duration: qos.liveliness.lease_duration,
            latency_budget: qos.latency_budget.duration,
            lifespan: match scope {
                QosScope::DataReader => None,
                QosScope::Topic | QosScope::DataWriter => Some(qos.lifespan.duration),
            },
        }
    }

    /// Render the report; `label` names the entity in the heading.
    pub fn render(&self, label: &str) -> String {
        let mut text = String::new();
        let _ = writeln!(text);
        let _ = writeln!(text, "--Qos Policy for {}", label);
        let _ = writeln!(text, "Reliability:");
        let _ = writeln!(text, "  kind:{}", self.reliability.as_str());
        let _ = writeln!(
            text,
            "  max_blocking_time (sec): {}",
            seconds(self.max_blocking_time)
        );
        let _ = writeln!(text, "Liveliness:");
        let _ = writeln!(text, "  kind: {}", self.liveliness.as_str());
        let _ = writeln!(text, "  lease duration: {}", seconds(self.lease_duration));
        let _ = writeln!(text, "Latency Budget: {}", seconds(self.latency_budget));
        if let Some(lifespan) = self.lifespan {
            let _ = writeln!(text, "Lifespan: {}", seconds(lifespan));
        }
        let _ = writeln!(text);
        text
    }
}

/// Seconds as a decimal, or `INFINITE`.
pub fn seconds(duration: Duration) -> String {
    if duration == DURATION_INFINITE {
        "INFINITE".to_string()
    } else {
        format!("{}", duration.as_secs_f64())
    }
}

/// Write the report for `qos` to `out`.
pub fn print_qos(
    out: &mut dyn Write,
    scope: QosScope,
    label: &str,
    qos: &QoS,
) -> io::Result<()> {
    out.write_all(QosReport::new(scope, qos).render(label).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_report_layout() {
        let text = QosReport::new(QosScope::Topic, &QoS::reliable()).render("topic T");
        let expected = "\n--Qos Policy for topic T\n\
                        Reliability:\n  kind:RELIABLE\n  max_blocking_time (sec): 0.1\n\
                        Liveliness:\n  kind: AUTOMATIC\n  lease duration: INFINITE\n\
                        Latency Budget: 0\nLifespan: INFINITE\n\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_reader_report_has_no_lifespan() {
        let qos = QoS::best_effort().lifespan_secs(5);
        let text = QosReport::new(QosScope::DataReader, &qos).render("reader");
        assert!(text.contains("kind:BEST_EFFORT"));
        assert!(!text.contains("Lifespan"));

        let writer = QosReport::new(QosScope::DataWriter, &qos).render("writer");
        assert!(writer.contains("Lifespan: 5\n"));
    }

    #[test]
    fn test_seconds_formatting() {
        assert_eq!(seconds(Duration::from_millis(1500)), "1.5");
        assert_eq!(seconds(Duration::ZERO), "0");
        assert_eq!(seconds(DURATION_INFINITE), "INFINITE");
    }

    #[test]
    fn test_print_qos_writes_report() {
        let mut out = Vec::new();
        print_qos(&mut out, QosScope::Topic, "x", &QoS::default()).expect("write to Vec");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("\n--Qos Policy for x\n"));
    }
}
