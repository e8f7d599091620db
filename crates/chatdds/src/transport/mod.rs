// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport layer for cross-process delivery.
//!
//! # Modules
//!
//! - `frame` - datagram layout for samples, lifecycle changes and replay requests
//! - `multicast` - interface selection for the multicast group
//! - `udp` - socket setup, send path and listener thread

/// Datagram codec.
pub mod frame;
/// Multicast interface discovery.
pub mod multicast;
/// UDP multicast socket and listener thread.
pub mod udp;

pub use frame::{Frame, FrameKind};
pub use udp::{FrameHandler, UdpTransport};
