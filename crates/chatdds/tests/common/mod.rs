// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared test type and participant helpers.

#![allow(dead_code)]

use chatdds::core::ser::{key_hash, Cursor, CursorMut};
use chatdds::{Participant, QoS, Result, TransportMode, DDS};
use std::sync::Arc;

/// Keyed test sample: one instance per `sensor`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub sensor: i32,
    pub value: i64,
    pub label: String,
}

impl Reading {
    pub fn new(sensor: i32, value: i64) -> Self {
        Self {
            sensor,
            value,
            label: format!("sensor-{}", sensor),
        }
    }
}

impl DDS for Reading {
    fn type_name() -> &'static str {
        "Test::Reading"
    }

    fn encode_cdr2(&self, buf: &mut [u8]) -> Result<usize> {
        let mut cursor = CursorMut::new(buf);
        cursor.write_i32_le(self.sensor)?;
        cursor.align(8)?;
        cursor.write_i64_le(self.value)?;
        cursor.write_string(&self.label)?;
        Ok(cursor.offset())
    }

    fn decode_cdr2(buf: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(buf);
        let sensor = cursor.read_i32_le()?;
        cursor.align(8)?;
        let value = cursor.read_i64_le()?;
        let label = cursor.read_string()?;
        Ok(Self {
            sensor,
            value,
            label,
        })
    }

    fn compute_key(&self) -> [u8; 16] {
        key_hash(&self.sensor.to_be_bytes())
    }

    fn has_key() -> bool {
        true
    }
}

/// Same wire layout as [`Reading`] under another type name.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherReading(pub Reading);

impl DDS for OtherReading {
    fn type_name() -> &'static str {
        "Test::OtherReading"
    }

    fn encode_cdr2(&self, buf: &mut [u8]) -> Result<usize> {
        self.0.encode_cdr2(buf)
    }

    fn decode_cdr2(buf: &[u8]) -> Result<Self> {
        Reading::decode_cdr2(buf).map(OtherReading)
    }

    fn compute_key(&self) -> [u8; 16] {
        self.0.compute_key()
    }

    fn has_key() -> bool {
        true
    }
}

pub fn participant(name: &str, domain_id: u32) -> Arc<Participant> {
    Participant::builder(name)
        .domain_id(domain_id)
        .with_transport(TransportMode::IntraProcess)
        .build()
        .expect("participant should build")
}

pub fn reliable() -> QoS {
    QoS::reliable()
}
