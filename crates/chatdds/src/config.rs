// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Global configuration - protocol constants and environment overrides.
//!
//! Every port, address and limit used by the transport is defined here.
//!
//! # Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `CHATDDS_MULTICAST_IFACE` | IPv4 address of the interface used for multicast |
//! | `CHATDDS_MULTICAST_TTL` | Multicast TTL (default 1, same subnet) |
//! | `CHATDDS_REUSEPORT` | `0` disables `SO_REUSEPORT` on Unix |

use std::net::Ipv4Addr;

/// Base port (IANA registered DDS range 7400-7469).
pub const PORT_BASE: u16 = 7400;

/// Maximum domain ID (valid range is `0..=232`).
pub const MAX_DOMAIN_ID: u32 = 232;

/// Port distance between two consecutive domains.
///
/// Formula: `PORT_BASE + DOMAIN_ID_GAIN * domain_id + USER_MULTICAST_OFFSET`.
/// Domain 0 -> 7401, domain 1 -> 7651.
pub const DOMAIN_ID_GAIN: u16 = 250;

/// Offset of the user-data multicast port inside a domain's port block.
pub const USER_MULTICAST_OFFSET: u16 = 1;

/// Multicast group shared by all participants.
pub const MULTICAST_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 0, 1);

/// Largest datagram the transport will send or accept.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Size of the scratch buffer used to serialize one sample.
pub const MAX_SAMPLE_SIZE: usize = 64 * 1024;

/// Receive timeout of the listener thread; bounds shutdown latency.
pub const LISTENER_POLL_MS: u64 = 100;

/// Default multicast TTL (1 = stay on the local subnet).
pub const DEFAULT_MULTICAST_TTL: u32 = 1;

/// Compute the user-data multicast port for `domain_id`.
///
/// Caller is expected to have validated `domain_id <= MAX_DOMAIN_ID`.
pub fn user_multicast_port(domain_id: u32) -> u16 {
    PORT_BASE + DOMAIN_ID_GAIN * domain_id as u16 + USER_MULTICAST_OFFSET
}

/// Interface override from `CHATDDS_MULTICAST_IFACE`, if set and parseable.
pub fn multicast_iface_override() -> Option<Ipv4Addr> {
    let raw = std::env::var("CHATDDS_MULTICAST_IFACE").ok()?;
    match raw.trim().parse::<Ipv4Addr>() {
        Ok(addr) => Some(addr),
        Err(_) => {
            log::warn!(
                "[config] ignoring CHATDDS_MULTICAST_IFACE='{}' (not an IPv4 address)",
                raw
            );
            None
        }
    }
}

/// Multicast TTL from `CHATDDS_MULTICAST_TTL`, falling back to the default.
pub fn multicast_ttl() -> u32 {
    std::env::var("CHATDDS_MULTICAST_TTL")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|ttl| *ttl > 0 && *ttl <= 255)
        .unwrap_or(DEFAULT_MULTICAST_TTL)
}

/// Whether `SO_REUSEPORT` should be set (enabled unless `CHATDDS_REUSEPORT=0`).
pub fn reuseport_enabled() -> bool {
    std::env::var("CHATDDS_REUSEPORT")
        .map(|v| v != "0")
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_multicast_port_domain0() {
        assert_eq!(user_multicast_port(0), 7401);
    }

    #[test]
    fn test_user_multicast_port_domain_gain() {
        assert_eq!(user_multicast_port(1), 7651);
        assert_eq!(user_multicast_port(2), 7901);
    }

    #[test]
    fn test_user_multicast_port_max_domain_fits_u16() {
        let port = u32::from(PORT_BASE)
            + u32::from(DOMAIN_ID_GAIN) * MAX_DOMAIN_ID
            + u32::from(USER_MULTICAST_OFFSET);
        assert!(port <= u32::from(u16::MAX));
    }

    #[test]
    fn test_multicast_group_is_multicast() {
        assert!(MULTICAST_GROUP.is_multicast());
    }
}
