// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # chatdds - compact DDS-style publish/subscribe
//!
//! A small implementation of the DDS entity model (participant, topic,
//! publisher/subscriber, typed writer/reader, keyed instances and QoS) that
//! is just large enough to run the classic Chatter/MessageBoard tutorial
//! between processes on one host or a LAN.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatdds::{Participant, QoS, Result, TransportMode};
//! # use chatdds::DDS;
//! # struct Ping;
//! # impl DDS for Ping {
//! #     fn type_name() -> &'static str { "Ping" }
//! #     fn encode_cdr2(&self, _buf: &mut [u8]) -> Result<usize> { Ok(0) }
//! #     fn decode_cdr2(_buf: &[u8]) -> Result<Self> { Ok(Ping) }
//! # }
//!
//! fn main() -> Result<()> {
//!     let participant = Participant::builder("pinger")
//!         .domain_id(0)
//!         .with_transport(TransportMode::UdpMulticast)
//!         .build()?;
//!
//!     let topic = participant.create_topic::<Ping>("ping", QoS::reliable())?;
//!     let publisher = participant.create_publisher(QoS::default())?;
//!     let writer = publisher.create_writer_with_topic_qos(&topic)?;
//!     writer.write(&Ping)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |   Participant -> Publisher/Subscriber -> DataWriter/DataReader |
//! +---------------------------------------------------------------+
//! |   QoS Policies | Instance Lifecycle | Conditions / WaitSets    |
//! +---------------------------------------------------------------+
//! |   Domain registry (intra-process routing, durable replay)      |
//! +---------------------------------------------------------------+
//! |   UDP multicast frames (optional, cross-process)               |
//! +---------------------------------------------------------------+
//! ```

/// Protocol constants and environment-driven runtime settings.
pub mod config;
/// CDR cursors shared by the wire codec and user type support.
pub mod core;
/// Core DDS API (Participant, Topic, Publisher, Subscriber, DataWriter, DataReader).
pub mod dds;
/// `QoS` (Quality of Service) policies for DDS entities.
pub mod qos;
/// Wire framing and UDP multicast transport.
pub mod transport;

pub use dds::{
    Condition, DataReader, DataWriter, Error, GuardCondition, InstanceHandle, InstanceState,
    InstanceStateMask, Participant, ParticipantBuilder, Publisher, QoS, ReaderStats, Result,
    Sample, SampleInfo, SampleState, SampleStateMask, StatusCondition, StatusMask, Subscriber,
    Time, Topic, TransportMode, ViewState, ViewStateMask, WaitSet, WriterStats, DDS,
};
