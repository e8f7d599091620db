// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DDS Publisher entity - creates and manages DataWriter instances
//!
//! Publisher and Subscriber are deliberately symmetric; see `subscriber.rs`.

use super::ledger::{Ledger, Membership};
use super::participant::Participant;
use super::{DataWriter, Error, QoS, Result, Topic, DDS};
use parking_lot::Mutex;
use std::sync::Arc;

/// DDS Publisher - intermediate entity between Participant and DataWriter
///
/// Writers created without an explicit PARTITION inherit the publisher's.
///
/// # Example
///
/// ```ignore
/// let publisher = participant.create_publisher(QoS::default())?;
/// let writer = publisher.create_writer(&topic, QoS::reliable())?;
/// ```
pub struct Publisher {
    qos: QoS,
    default_writer_qos: Mutex<QoS>,
    participant: Arc<Participant>,
    /// Children: data writers.
    pub(crate) ledger: Arc<Ledger>,
    pub(crate) membership: Membership,
}

impl Publisher {
    pub(crate) fn new(participant: Arc<Participant>, qos: QoS, membership: Membership) -> Self {
        Self {
            qos,
            default_writer_qos: Mutex::new(QoS::default()),
            participant,
            ledger: Ledger::new(),
            membership,
        }
    }

    /// Get Publisher QoS
    pub fn qos(&self) -> &QoS {
        &self.qos
    }

    pub fn participant(&self) -> &Arc<Participant> {
        &self.participant
    }

    pub fn get_default_writer_qos(&self) -> QoS {
        self.default_writer_qos.lock().clone()
    }

    pub fn set_default_writer_qos(&self, qos: QoS) -> Result<()> {
        qos.validate()?;
        *self.default_writer_qos.lock() = qos;
        Ok(())
    }

    /// Create a DataWriter on `topic`.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyDeleted`] if this publisher or the topic was deleted
    /// - [`Error::BadParameter`] if the topic belongs to another participant
    /// - [`Error::InvalidQos`] if `qos` fails validation
    pub fn create_writer<T: DDS>(&self, topic: &Topic<T>, qos: QoS) -> Result<DataWriter<T>> {
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

        let publisher_membership = self.ledger.enroll()?;
        let topic_membership = topic.inner.ledger.enroll()?;
        let guid = self.participant.next_guid();
        log::debug!(
            "[publisher] creating writer {} on '{}' ({} / {})",
            guid,
            topic.name(),
            qos.reliability.as_str(),
            qos.durability.as_str()
        );
        Ok(DataWriter::new(
            guid,
            topic,
            qos,
            Arc::clone(&self.participant.domain),
            publisher_membership,
            topic_membership,
        ))
    }

    /// Create a DataWriter whose QoS is the default writer QoS overlaid with
    /// the topic QoS.
    pub fn create_writer_with_topic_qos<T: DDS>(&self, topic: &Topic<T>) -> Result<DataWriter<T>> {
        let qos = self.get_default_writer_qos().copy_from_topic_qos(topic.qos());
        self.create_writer(topic, qos)
    }

    /// Delete a DataWriter created by this publisher.
    ///
    /// Live instances are unregistered before the writer leaves the domain.
    pub fn delete_writer<T: DDS>(&self, writer: DataWriter<T>) -> Result<()> {
        if !writer.publisher_membership.belongs_to(&self.ledger) {
            return Err(Error::BadParameter(
                "writer was created by another publisher".into(),
            ));
        }
        log::debug!("[publisher] deleting writer {}", writer.guid());
        drop(writer);
        Ok(())
    }

    pub fn writer_count(&self) -> usize {
        self.ledger.children()
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("partition", &self.qos.partition)
            .field("writers", &self.ledger.children())
            .finish()
    }
}
