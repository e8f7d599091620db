// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DDS `Time_t`: wall-clock seconds and nanoseconds.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock timestamp relative to the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Time {
    pub sec: i64,
    pub nanosec: u32,
}

impl Time {
    pub const fn new(sec: i64, nanosec: u32) -> Self {
        Self { sec, nanosec }
    }

    /// Current wall-clock time. A clock before 1970 reads as zero.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            sec: i64::try_from(since_epoch.as_secs()).unwrap_or(i64::MAX),
            nanosec: since_epoch.subsec_nanos(),
        }
    }

    pub fn from_nanos(nanos: u64) -> Self {
        Self {
            sec: (nanos / 1_000_000_000) as i64,
            nanosec: (nanos % 1_000_000_000) as u32,
        }
    }

    /// Nanoseconds since the epoch (saturating, negative times clamp to 0).
    pub fn as_nanos(&self) -> u64 {
        if self.sec < 0 {
            return 0;
        }
        (self.sec as u64)
            .saturating_mul(1_000_000_000)
            .saturating_add(u64::from(self.nanosec))
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.sec as f64 + f64::from(self.nanosec) / 1e9
    }
}

/// `sec.usec`, six fractional digits.
impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.sec, self.nanosec / 1_000)
    }
}

pub(crate) fn now_nanos() -> u64 {
    Time::now().as_nanos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_nanos_split() {
        let t = Time::from_nanos(3_250_000_001);
        assert_eq!(t.sec, 3);
        assert_eq!(t.nanosec, 250_000_001);
        assert_eq!(t.as_nanos(), 3_250_000_001);
    }

    #[test]
    fn test_display_microseconds() {
        assert_eq!(Time::new(12, 5_000).to_string(), "12.000005");
        assert_eq!(Time::new(1, 999_999_999).to_string(), "1.999999");
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(Time::now().sec > 1_577_836_800);
    }
}
