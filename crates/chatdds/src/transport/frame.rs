// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Datagram layout.
//!
//! ```text
//! 0       4    5    6     7
//! +-------+----+----+-----+----------+
//! | CDDS  | v1 |kind|flags| reserved |
//! +-------+----+----+-----+----------+
//! | writer guid (16)                 |
//! | sequence number (u64)            |
//! | key hash (16)                    |
//! | source timestamp ns (u64)        |
//! | lifespan ns (u64, MAX=infinite)  |
//! | reliability u8 | durability u8 | liveliness u8 | pad |
//! | lease ns (u64, MAX=infinite)     |
//! | topic (CDR string)               |
//! | type name (CDR string)           |
//! | partition count u32 + strings    |
//! | payload (u32 length + bytes)     |
//! +----------------------------------+
//! ```
//!
//! All integers are little-endian. For `ReplayRequest` the GUID is the
//! requesting reader's, the QoS bytes are its requested policies and the
//! payload is empty.

use crate::config::MAX_DATAGRAM_SIZE;
use crate::core::ser::{Cursor, CursorMut, SerError, SerResult};
use crate::qos::{Durability, LivelinessKind, Reliability};

pub const MAGIC: [u8; 4] = *b"CDDS";
pub const VERSION: u8 = 1;

/// Frame carries history replayed for a late-joining reader.
pub const FLAG_REPLAY: u8 = 0x01;

/// Upper bound on partitions per frame.
const MAX_PARTITIONS: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Data = 1,
    Dispose = 2,
    Unregister = 3,
    ReplayRequest = 4,
}

impl FrameKind {
    fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(FrameKind::Data),
            2 => Some(FrameKind::Dispose),
            3 => Some(FrameKind::Unregister),
            4 => Some(FrameKind::ReplayRequest),
            _ => None,
        }
    }
}

/// Decoded datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub flags: u8,
    pub guid: [u8; 16],
    pub seq: u64,
    pub key_hash: [u8; 16],
    pub source_ns: u64,
    pub lifespan_ns: u64,
    pub reliability: Reliability,
    pub durability: Durability,
    pub liveliness: LivelinessKind,
    pub lease_ns: u64,
    pub topic: String,
    pub type_name: String,
    pub partitions: Vec<String>,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn is_replay(&self) -> bool {
        self.flags & FLAG_REPLAY != 0
    }

    /// Serialize into a freshly allocated datagram.
    pub fn encode(&self) -> SerResult<Vec<u8>> {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let len = {
            let mut w = CursorMut::new(&mut buf);
            w.write_bytes(&MAGIC)?;
            w.write_u8(VERSION)?;
            w.write_u8(self.kind as u8)?;
            w.write_u8(self.flags)?;
            w.write_u8(0)?;
            w.write_bytes(&self.guid)?;
            w.write_u64_le(self.seq)?;
            w.write_bytes(&self.key_hash)?;
            w.write_u64_le(self.source_ns)?;
            w.write_u64_le(self.lifespan_ns)?;
            w.write_u8(reliability_to_u8(self.reliability))?;
            w.write_u8(durability_to_u8(self.durability))?;
            w.write_u8(liveliness_to_u8(self.liveliness))?;
            w.write_u8(0)?;
            w.write_u64_le(self.lease_ns)?;
            w.write_string(&self.topic)?;
            w.write_string(&self.type_name)?;
            w.align(4)?;
            let count = u32::try_from(self.partitions.len())
                .ok()
                .filter(|n| *n <= MAX_PARTITIONS)
                .ok_or_else(|| SerError::InvalidData {
                    reason: format!("too many partitions ({})", self.partitions.len()),
                })?;
            w.write_u32_le(count)?;
            for name in &self.partitions {
                w.write_string(name)?;
            }
            w.write_octets(&self.payload)?;
            w.offset()
        };
        buf.truncate(len);
        Ok(buf)
    }

    /// Parse a datagram. Any malformed input yields an error, never a panic.
    pub fn decode(buf: &[u8]) -> SerResult<Self> {
        let mut r = Cursor::new(buf);
        if r.read_bytes(4)? != MAGIC {
            return Err(SerError::InvalidData {
                reason: "bad magic".into(),
            });
        }
        let version = r.read_u8()?;
        if version != VERSION {
            return Err(SerError::InvalidData {
                reason: format!("unsupported version {}", version),
            });
        }
        let kind_raw = r.read_u8()?;
        let kind = FrameKind::from_u8(kind_raw).ok_or_else(|| SerError::InvalidData {
            reason: format!("unknown frame kind {}", kind_raw),
        })?;
        let flags = r.read_u8()?;
        let _reserved = r.read_u8()?;
        let guid = read_array16(&mut r)?;
        let seq = r.read_u64_le()?;
        let key_hash = read_array16(&mut r)?;
        let source_ns = r.read_u64_le()?;
        let lifespan_ns = r.read_u64_le()?;
        let reliability = reliability_from_u8(r.read_u8()?)?;
        let durability = durability_from_u8(r.read_u8()?)?;
        let liveliness = liveliness_from_u8(r.read_u8()?)?;
        let _pad = r.read_u8()?;
        let lease_ns = r.read_u64_le()?;
        let topic = r.read_string()?;
        let type_name = r.read_string()?;
        r.align(4)?;
        let count = r.read_u32_le()?;
        if count > MAX_PARTITIONS {
            return Err(SerError::InvalidData {
                reason: format!("too many partitions ({})", count),
            });
        }
        let mut partitions = Vec::with_capacity(count as usize);
        for _ in 0..count {
            partitions.push(r.read_string()?);
        }
        let payload = r.read_octets()?.to_vec();

        Ok(Self {
            kind,
            flags,
            guid,
            seq,
            key_hash,
            source_ns,
            lifespan_ns,
            reliability,
            durability,
            liveliness,
            lease_ns,
            topic,
            type_name,
            partitions,
            payload,
        })
    }
}

fn read_array16(r: &mut Cursor<'_>) -> SerResult<[u8; 16]> {
    let mut out = [0u8; 16];
    out.copy_from_slice(r.read_bytes(16)?);
    Ok(out)
}

fn reliability_to_u8(value: Reliability) -> u8 {
    match value {
        Reliability::BestEffort => 1,
        Reliability::Reliable => 2,
    }
}

fn reliability_from_u8(value: u8) -> SerResult<Reliability> {
    match value {
        1 => Ok(Reliability::BestEffort),
        2 => Ok(Reliability::Reliable),
        other => Err(SerError::InvalidData {
            reason: format!("unknown reliability {}", other),
        }),
    }
}

fn durability_to_u8(value: Durability) -> u8 {
    match value {
        Durability::Volatile => 0,
        Durability::TransientLocal => 1,
        Durability::Transient => 2,
        Durability::Persistent => 3,
    }
}

fn durability_from_u8(value: u8) -> SerResult<Durability> {
    match value {
        0 => Ok(Durability::Volatile),
        1 => Ok(Durability::TransientLocal),
        2 => Ok(Durability::Transient),
        3 => Ok(Durability::Persistent),
        other => Err(SerError::InvalidData {
            reason: format!("unknown durability {}", other),
        }),
    }
}

fn liveliness_to_u8(value: LivelinessKind) -> u8 {
    match value {
        LivelinessKind::Automatic => 0,
        LivelinessKind::ManualByParticipant => 1,
        LivelinessKind::ManualByTopic => 2,
    }
}

fn liveliness_from_u8(value: u8) -> SerResult<LivelinessKind> {
    match value {
        0 => Ok(LivelinessKind::Automatic),
        1 => Ok(LivelinessKind::ManualByParticipant),
        2 => Ok(LivelinessKind::ManualByTopic),
        other => Err(SerError::InvalidData {
            reason: format!("unknown liveliness kind {}", other),
        }),
    }
}
