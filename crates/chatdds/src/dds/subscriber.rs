// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DDS Subscriber entity - creates and manages DataReader instances
//!
//! Mirror image of `publisher.rs`.

use super::ledger::{Ledger, Membership};
use super::participant::Participant;
use super::{DataReader, Error, QoS, Result, Topic, DDS};
use parking_lot::Mutex;
use std::sync::Arc;

/// DDS Subscriber - intermediate entity between Participant and DataReader
///
/// Readers created without an explicit PARTITION inherit the subscriber's.
pub struct Subscriber {
    qos: QoS,
    default_reader_qos: Mutex<QoS>,
    participant: Arc<Participant>,
    /// Children: data readers.
    pub(crate) ledger: Arc<Ledger>,
    pub(crate) membership: Membership,
}

impl Subscriber {
    pub(crate) fn new(participant: Arc<Participant>, qos: QoS, membership: Membership) -> Self {
        Self {
            qos,
            default_reader_qos: Mutex::new(QoS::default()),
            participant,
            ledger: Ledger::new(),
            membership,
        }
    }

    pub fn qos(&self) -> &QoS {
        &self.qos
    }

    pub fn participant(&self) -> &Arc<Participant> {
        &self.participant
    }

    pub fn get_default_reader_qos(&self) -> QoS {
        self.default_reader_qos.lock().clone()
    }

    pub fn set_default_reader_qos(&self, qos: QoS) -> Result<()> {
        qos.validate()?;
        *self.default_reader_qos.lock() = qos;
        Ok(())
    }

    /// Create a DataReader on `topic`.
    ///
    /// A durable reader receives the retained history of every matching
    /// durable writer before this call returns (local writers) or shortly
    /// after (remote writers).
    pub fn create_reader<T: DDS>(&self, topic: &Topic<T>, qos: QoS) -> Result<DataReader<T>> {
        if !Arc::ptr_eq(&topic.inner.participant, &self.participant) {
            return Err(Error::BadParameter(format!(
                "topic '{}' belongs to another participant",
                topic.name()
            )));
        }
        qos.validate()?;
        let mut qos = qos;
        if qos.partition.is_default() {
            qos.partition = self.qos.partition.clone();
        }

        let subscriber_membership = self.ledger.enroll()?;
        let topic_membership = topic.inner.ledger.enroll()?;
        let guid = self.participant.next_guid();
        log::debug!(
            "[subscriber] creating reader {} on '{}' ({} / {})",
            guid,
            topic.name(),
            qos.reliability.as_str(),
            qos.durability.as_str()
        );
        Ok(DataReader::new(
            guid,
            topic,
            qos,
            &self.participant.domain,
            subscriber_membership,
            topic_membership,
        ))
    }

    /// Create a DataReader whose QoS is the default reader QoS overlaid with
    /// the topic QoS.
    pub fn create_reader_with_topic_qos<T: DDS>(&self, topic: &Topic<T>) -> Result<DataReader<T>> {
        let qos = self.get_default_reader_qos().copy_from_topic_qos(topic.qos());
        self.create_reader(topic, qos)
    }

    pub fn delete_reader<T: DDS>(&self, reader: DataReader<T>) -> Result<()> {
        if !reader.subscriber_membership.belongs_to(&self.ledger) {
            return Err(Error::BadParameter(
                "reader was created by another subscriber".into(),
            ));
        }
        log::debug!("[subscriber] deleting reader {}", reader.guid());
        drop(reader);
        Ok(())
    }

    pub fn reader_count(&self) -> usize {
        self.ledger.children()
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("partition", &self.qos.partition)
            .field("readers", &self.ledger.children())
            .finish()
    }
}
