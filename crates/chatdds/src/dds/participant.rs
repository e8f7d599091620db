// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DDS Domain Participant and its builder.

use super::domain_registry::{DomainRegistry, DomainState};
use super::guid::Guid;
use super::ledger::Ledger;
use super::publisher::Publisher;
use super::subscriber::Subscriber;
use super::time::Time;
use super::topic::{Topic, TopicInner};
use super::{Error, InstanceHandle, QoS, Result, DDS};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Weak};

/// Transport used by a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// In-process delivery only.
    ///
    /// Best for: tests, single-process applications.
    IntraProcess,

    /// In-process delivery plus UDP multicast to other processes.
    UdpMulticast,
}

/// Builder for configuring and creating a [`Participant`].
pub struct ParticipantBuilder {
    name: String,
    domain_id: u32,
    transport_mode: TransportMode,
}

impl ParticipantBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            domain_id: 0,
            transport_mode: TransportMode::IntraProcess,
        }
    }

    /// Set the domain (valid range `0..=232`).
    pub fn domain_id(mut self, domain_id: u32) -> Self {
        self.domain_id = domain_id;
        self
    }

    pub fn with_transport(mut self, mode: TransportMode) -> Self {
        self.transport_mode = mode;
        self
    }

    /// Create the participant and join its domain.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDomainId`] for a domain above 232
    /// - [`Error::BindFailed`] / [`Error::MulticastJoinFailed`] when the UDP
    ///   transport cannot be started
    pub fn build(self) -> Result<Arc<Participant>> {
        let domain = DomainRegistry::global().domain(self.domain_id)?;
        if self.transport_mode == TransportMode::UdpMulticast {
            domain.enable_udp()?;
        }
        let guid = Guid::new_participant();
        log::info!(
            "[participant] '{}' joined domain {} ({:?}) guid={}",
            self.name,
            self.domain_id,
            self.transport_mode,
            guid
        );
        Ok(Arc::new(Participant {
            name: self.name,
            domain_id: self.domain_id,
            transport_mode: self.transport_mode,
            guid,
            domain,
            next_entity: AtomicU32::new(1),
            default_topic_qos: Mutex::new(QoS::default()),
            default_publisher_qos: Mutex::new(QoS::default()),
            default_subscriber_qos: Mutex::new(QoS::default()),
            topic_names: Mutex::new(HashMap::new()),
            topics: Ledger::new(),
            publishers: Ledger::new(),
            subscribers: Ledger::new(),
            closed: AtomicBool::new(false),
        }))
    }
}

/// DDS Domain Participant - entry point to a domain.
///
/// The participant is the factory for topics, publishers and subscribers.
/// Its children must be deleted before [`Participant::close`] succeeds.
pub struct Participant {
    name: String,
    domain_id: u32,
    transport_mode: TransportMode,
    pub(crate) guid: Guid,
    pub(crate) domain: Arc<DomainState>,
    next_entity: AtomicU32,
    default_topic_qos: Mutex<QoS>,
    default_publisher_qos: Mutex<QoS>,
    default_subscriber_qos: Mutex<QoS>,
    topic_names: Mutex<HashMap<String, Weak<TopicInner>>>,
    topics: Arc<Ledger>,
    publishers: Arc<Ledger>,
    subscribers: Arc<Ledger>,
    closed: AtomicBool,
}

impl Participant {
    /// Create a new participant builder.
    ///
    /// # Example
    /// ```no_run
    /// use chatdds::Participant;
    /// let participant = Participant::builder("my_app")
    ///     .domain_id(0)
    ///     .build()?;
    /// # Ok::<(), chatdds::Error>(())
    /// ```
    pub fn builder(name: &str) -> ParticipantBuilder {
        ParticipantBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain_id(&self) -> u32 {
        self.domain_id
    }

    pub fn transport_mode(&self) -> TransportMode {
        self.transport_mode
    }

    pub fn instance_handle(&self) -> InstanceHandle {
        InstanceHandle(self.guid.0)
    }

    /// Wall-clock time as seen by the participant.
    pub fn current_time(&self) -> Time {
        Time::now()
    }

    pub(crate) fn next_guid(&self) -> Guid {
        self.guid
            .child(self.next_entity.fetch_add(1, Ordering::Relaxed))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(Error::AlreadyDeleted)
        } else {
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Default QoS
    // ------------------------------------------------------------------

    pub fn get_default_topic_qos(&self) -> QoS {
        self.default_topic_qos.lock().clone()
    }

    /// Replace the default topic QoS (validated first).
    pub fn set_default_topic_qos(&self, qos: QoS) -> Result<()> {
        qos.validate()?;
        *self.default_topic_qos.lock() = qos;
        Ok(())
    }

    pub fn get_default_publisher_qos(&self) -> QoS {
        self.default_publisher_qos.lock().clone()
    }

    pub fn set_default_publisher_qos(&self, qos: QoS) -> Result<()> {
        qos.validate()?;
        *self.default_publisher_qos.lock() = qos;
        Ok(())
    }

    pub fn get_default_subscriber_qos(&self) -> QoS {
        self.default_subscriber_qos.lock().clone()
    }

    pub fn set_default_subscriber_qos(&self, qos: QoS) -> Result<()> {
        qos.validate()?;
        *self.default_subscriber_qos.lock() = qos;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    /// Create a topic named `name` carrying `T`.
    ///
    /// # Errors
    ///
    /// - [`Error::PreconditionNotMet`] if a live topic with this name exists
    /// - [`Error::InvalidQos`] if `qos` fails validation
    /// - [`Error::AlreadyDeleted`] after [`Participant::close`]
    pub fn create_topic<T: DDS>(self: &Arc<Self>, name: &str, qos: QoS) -> Result<Topic<T>> {
        self.ensure_open()?;
        if name.is_empty() {
            return Err(Error::BadParameter("topic name is empty".into()));
        }
        qos.validate()?;

        let mut names = self.topic_names.lock();
        if let Some(existing) = names.get(name).and_then(Weak::upgrade) {
            if !existing.ledger.is_deleted() {
                return Err(Error::PreconditionNotMet(format!(
                    "topic '{}' already exists (type {})",
                    name, existing.type_name
                )));
            }
        }
        let membership = self.topics.enroll()?;
        let inner = Arc::new(TopicInner {
            name: name.to_string(),
            type_name: T::type_name().to_string(),
            qos,
            participant: Arc::clone(self),
            ledger: Ledger::new(),
            membership,
        });
        names.insert(name.to_string(), Arc::downgrade(&inner));
        log::debug!(
            "[participant] '{}' created topic '{}' type={}",
            self.name,
            name,
            T::type_name()
        );
        Ok(Topic::from_inner(inner))
    }

    /// Create a publisher. Its PARTITION is inherited by its writers.
    pub fn create_publisher(self: &Arc<Self>, qos: QoS) -> Result<Publisher> {
        self.ensure_open()?;
        qos.validate()?;
        let membership = self.publishers.enroll()?;
        Ok(Publisher::new(Arc::clone(self), qos, membership))
    }

    /// Create a subscriber. Its PARTITION is inherited by its readers.
    pub fn create_subscriber(self: &Arc<Self>, qos: QoS) -> Result<Subscriber> {
        self.ensure_open()?;
        qos.validate()?;
        let membership = self.subscribers.enroll()?;
        Ok(Subscriber::new(Arc::clone(self), qos, membership))
    }

    // ------------------------------------------------------------------
    // Ordered teardown
    // ------------------------------------------------------------------

    /// Delete a publisher that no longer has data writers.
    pub fn delete_publisher(&self, publisher: &Publisher) -> Result<()> {
        if !publisher.membership.belongs_to(&self.publishers) {
            return Err(Error::BadParameter(
                "publisher was created by another participant".into(),
            ));
        }
        if publisher.ledger.is_deleted() {
            return Err(Error::AlreadyDeleted);
        }
        publisher.ledger.ensure_empty("publisher", "data writer(s)")?;
        publisher.ledger.mark_deleted();
        publisher.membership.release();
        log::debug!("[participant] '{}' deleted publisher", self.name);
        Ok(())
    }

    /// Delete a subscriber that no longer has data readers.
    pub fn delete_subscriber(&self, subscriber: &Subscriber) -> Result<()> {
        if !subscriber.membership.belongs_to(&self.subscribers) {
            return Err(Error::BadParameter(
                "subscriber was created by another participant".into(),
            ));
        }
        if subscriber.ledger.is_deleted() {
            return Err(Error::AlreadyDeleted);
        }
        subscriber
            .ledger
            .ensure_empty("subscriber", "data reader(s)")?;
        subscriber.ledger.mark_deleted();
        subscriber.membership.release();
        log::debug!("[participant] '{}' deleted subscriber", self.name);
        Ok(())
    }

    /// Delete a topic that no writer or reader uses any more.
    pub fn delete_topic<T: DDS>(&self, topic: &Topic<T>) -> Result<()> {
        let inner = &topic.inner;
        if !inner.membership.belongs_to(&self.topics) {
            return Err(Error::BadParameter(format!(
                "topic '{}' was created by another participant",
                inner.name
            )));
        }
        if inner.ledger.is_deleted() {
            return Err(Error::AlreadyDeleted);
        }
        inner
            .ledger
            .ensure_empty(&format!("topic '{}'", inner.name), "endpoint(s)")?;
        inner.ledger.mark_deleted();
        inner.membership.release();
        let mut names = self.topic_names.lock();
        if names
            .get(&inner.name)
            .is_some_and(|w| std::ptr::eq(w.as_ptr(), Arc::as_ptr(inner)))
        {
            names.remove(&inner.name);
        }
        log::debug!("[participant] '{}' deleted topic '{}'", self.name, inner.name);
        Ok(())
    }

    /// Delete the participant itself (`delete_participant`).
    ///
    /// Fails with [`Error::PreconditionNotMet`] while topics, publishers or
    /// subscribers remain. Afterwards every factory call fails with
    /// [`Error::AlreadyDeleted`].
    pub fn close(&self) -> Result<()> {
        self.ensure_open()?;
        self.publishers.ensure_empty("participant", "publisher(s)")?;
        self.subscribers
            .ensure_empty("participant", "subscriber(s)")?;
        self.topics.ensure_empty("participant", "topic(s)")?;
        self.publishers.mark_deleted();
        self.subscribers.mark_deleted();
        self.topics.mark_deleted();
        self.closed.store(true, Ordering::Release);
        log::info!(
            "[participant] '{}' left domain {}",
            self.name,
            self.domain_id
        );
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of live (topics, publishers, subscribers).
    pub fn child_counts(&self) -> (usize, usize, usize) {
        (
            self.topics.children(),
            self.publishers.children(),
            self.subscribers.children(),
        )
    }
}

impl std::fmt::Debug for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .field("domain_id", &self.domain_id)
            .field("transport_mode", &self.transport_mode)
            .field("guid", &self.guid)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_domain_rejected() {
        let result = Participant::builder("bad").domain_id(233).build();
        assert!(matches!(result, Err(Error::InvalidDomainId(233))));
    }

    #[test]
    fn test_default_topic_qos_roundtrip_and_validation() {
        let participant = Participant::builder("qos")
            .domain_id(210)
            .build()
            .expect("participant should build");
        assert_eq!(participant.get_default_topic_qos(), QoS::default());

        participant
            .set_default_topic_qos(QoS::reliable())
            .expect("valid qos should be accepted");
        assert_eq!(participant.get_default_topic_qos(), QoS::reliable());

        assert!(matches!(
            participant.set_default_topic_qos(QoS::reliable().keep_last(0)),
            Err(Error::InvalidQos)
        ));
        assert_eq!(participant.get_default_topic_qos(), QoS::reliable());
    }

    #[test]
    fn test_close_requires_empty_participant() {
        let participant = Participant::builder("close")
            .domain_id(211)
            .build()
            .expect("participant should build");
        let publisher = participant
            .create_publisher(QoS::default())
            .expect("publisher should be created");

        assert!(matches!(
            participant.close(),
            Err(Error::PreconditionNotMet(_))
        ));
        participant
            .delete_publisher(&publisher)
            .expect("empty publisher should be deleted");
        participant.close().expect("empty participant should close");
        assert!(participant.is_closed());
        assert!(matches!(
            participant.create_publisher(QoS::default()),
            Err(Error::AlreadyDeleted)
        ));
    }

    #[test]
    fn test_entity_guids_share_participant_prefix() {
        let participant = Participant::builder("guid")
            .domain_id(212)
            .build()
            .expect("participant should build");
        let a = participant.next_guid();
        let b = participant.next_guid();
        assert_ne!(a, b);
        assert_eq!(a.0[..12], participant.guid.0[..12]);
    }
}
