// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # DDS Core API
//!
//! Entity model of the publish/subscribe layer.
//!
//! - **Participant**: Entry point to a domain, factory for topics, publishers and subscribers
//! - **Topic**: Named data channel with an associated type
//! - **Publisher/Subscriber**: Grouping entities carrying the PARTITION
//! - **DataWriter/DataReader**: Endpoints that send/receive typed data
//! - **QoS**: Quality of Service policies controlling behavior
//!
//! ## Entity Hierarchy
//!
//! ```text
//! DomainParticipant
//! +-- Topic<T>
//! +-- Publisher
//! |   +-- DataWriter<T>  ------> Topic<T>
//! +-- Subscriber
//!     +-- DataReader<T>  <------ Topic<T>
//! ```
//!
//! Entities must be deleted bottom-up: a publisher with writers, a topic
//! with endpoints or a participant with children refuse deletion with
//! [`Error::PreconditionNotMet`].

mod condition;
mod domain_registry;
mod guid;
mod ledger;
mod participant;
mod publisher;
mod reader;
mod sample;
mod subscriber;
mod time;
mod topic;
mod waitset;
mod writer;

pub use crate::qos::QoS;
pub use condition::{Condition, GuardCondition, StatusCondition, StatusMask, WaitsetSignal};
pub use domain_registry::TypeId;
pub use participant::{Participant, ParticipantBuilder, TransportMode};
pub use publisher::Publisher;
pub use reader::{DataReader, ReaderStats};
pub use sample::{
    InstanceHandle, InstanceState, InstanceStateMask, Sample, SampleInfo, SampleState,
    SampleStateMask, ViewState, ViewStateMask,
};
pub use subscriber::Subscriber;
pub use time::Time;
pub use topic::Topic;
pub use waitset::WaitSet;
pub use writer::{DataWriter, WriterStats};

pub(crate) use domain_registry::{Change, ChangeKind, DomainState};
pub(crate) use guid::Guid;

/// Errors returned by DDS operations.
///
/// # Example
///
/// ```rust,no_run
/// use chatdds::{Participant, Error};
///
/// let result = Participant::builder("test")
///     .domain_id(999) // Invalid!
///     .build();
///
/// match result {
///     Err(Error::InvalidDomainId(id)) => println!("Bad domain: {}", id),
///     Err(e) => println!("Other error: {}", e),
///     Ok(_) => println!("Success"),
/// }
/// ```
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// QoS policy is invalid (zero depth, inconsistent resource limits).
    InvalidQos,
    /// Domain ID out of range (0-232).
    InvalidDomainId(u32),

    // ========================================================================
    // Entity Errors
    // ========================================================================
    /// Operation not allowed in the entity's current state
    /// (deleting an entity that still has children, duplicate topic name,
    /// disposing an unknown instance).
    PreconditionNotMet(String),
    /// Argument is invalid (instance handle does not match the sample key,
    /// entity belongs to another participant).
    BadParameter(String),
    /// Entity was already deleted.
    AlreadyDeleted,

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// I/O error with underlying cause.
    IoError(std::io::Error),
    /// Failed to bind socket to address.
    BindFailed(String),
    /// Failed to join multicast group.
    MulticastJoinFailed(String),
    /// Send operation failed.
    SendFailed(String),

    // ========================================================================
    // Data Errors
    // ========================================================================
    /// CDR serialization failed (encoding error, invalid data).
    SerializationError(String),
    /// Buffer too small for encoding.
    BufferTooSmall,

    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// Nothing available before the timeout expired.
    WouldBlock,
    /// Resource limit exceeded (max_instances, max_samples).
    ResourceLimitExceeded(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Configuration
            Error::InvalidQos => write!(f, "Invalid QoS"),
            Error::InvalidDomainId(id) => write!(f, "Invalid domain_id: {} (must be 0-232)", id),
            // Entity
            Error::PreconditionNotMet(msg) => write!(f, "Precondition not met: {}", msg),
            Error::BadParameter(msg) => write!(f, "Bad parameter: {}", msg),
            Error::AlreadyDeleted => write!(f, "Entity already deleted"),
            // Transport
            Error::IoError(e) => write!(f, "I/O error: {}", e),
            Error::BindFailed(msg) => write!(f, "Bind failed: {}", msg),
            Error::MulticastJoinFailed(msg) => write!(f, "Multicast join failed: {}", msg),
            Error::SendFailed(msg) => write!(f, "Send failed: {}", msg),
            // Data
            Error::SerializationError(msg) => write!(f, "CDR serialization failed: {}", msg),
            Error::BufferTooSmall => write!(f, "Buffer too small for encoding"),
            // Resource
            Error::WouldBlock => write!(f, "Operation would block"),
            Error::ResourceLimitExceeded(msg) => write!(f, "Resource limit exceeded: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e)
    }
}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;

/// DDS trait: encode/decode contract for topic types.
///
/// Implementations write the CDR little-endian body (no encapsulation
/// header) using [`crate::core::ser::CursorMut`] and read it back with
/// [`crate::core::ser::Cursor`].
pub trait DDS: Sized + Send + Sync + 'static {
    /// Registered type name (e.g. `"Chat::ChatMessage"`).
    ///
    /// Writers and readers only match when their type names agree.
    fn type_name() -> &'static str;

    /// Encode to CDR2 LE buffer
    ///
    /// # Errors
    ///
    /// Returns `Err` if the buffer is too small or encoding fails.
    fn encode_cdr2(&self, buf: &mut [u8]) -> Result<usize>;

    /// Decode from CDR2 LE buffer
    ///
    /// # Errors
    ///
    /// Returns `Err` if the buffer is truncated or contains invalid data.
    fn decode_cdr2(buf: &[u8]) -> Result<Self>;

    /// Compute instance key hash from @key fields (16 bytes)
    ///
    /// Returns zeroed hash (no key fields) by default. Types with @key
    /// fields should override it, typically through
    /// [`crate::core::ser::key_hash`].
    fn compute_key(&self) -> [u8; 16] {
        [0u8; 16]
    }

    /// Returns true if this type has @key fields
    fn has_key() -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::InvalidDomainId(300).to_string(),
            "Invalid domain_id: 300 (must be 0-232)"
        );
        assert_eq!(
            Error::PreconditionNotMet("publisher still has 1 data writer(s)".into()).to_string(),
            "Precondition not met: publisher still has 1 data writer(s)"
        );
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(err.source().is_some());
        assert!(Error::WouldBlock.source().is_none());
    }
}
