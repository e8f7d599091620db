// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multicast interface selection.

use crate::config;
use std::net::{IpAddr, Ipv4Addr};

/// Pick the IPv4 interface used to join and send on the multicast group.
///
/// Order: `CHATDDS_MULTICAST_IFACE`, the primary interface reported by
/// `local_ip_address`, then `UNSPECIFIED` (kernel default route).
pub fn select_interface() -> Ipv4Addr {
    if let Some(addr) = config::multicast_iface_override() {
        log::debug!("[UDP] Using CHATDDS_MULTICAST_IFACE override: {}", addr);
        return addr;
    }

    match local_ip_address::local_ip() {
        Ok(IpAddr::V4(addr)) => {
            log::debug!("[UDP] Using primary interface IP: {}", addr);
            addr
        }
        Ok(IpAddr::V6(addr)) => {
            log::debug!(
                "[UDP] primary interface is IPv6 ({}), using UNSPECIFIED",
                addr
            );
            Ipv4Addr::UNSPECIFIED
        }
        Err(e) => {
            log::debug!(
                "[UDP] WARNING: interface discovery failed ({}), using UNSPECIFIED",
                e
            );
            Ipv4Addr::UNSPECIFIED
        }
    }
}
