// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # DDS DataWriter
//!
//! The [`DataWriter`] publishes typed samples and manages the lifecycle of
//! the keyed instances it writes.
//!
//! ## Instance lifecycle
//!
//! ```text
//! register_instance / write --> ALIVE --dispose--> DISPOSED
//!                                 |                   |
//!                                 +---unregister------+--> (forgotten)
//! ```
//!
//! Every change (write, dispose, unregister) consumes one sequence number,
//! starting at 1. Readers use the numbers to drop duplicates and count gaps.
//!
//! ## Delivery Path
//!
//! ```text
//! write() -+-> DomainState -> matched local readers
//!          |
//!          +-> UDP multicast frame (TransportMode::UdpMulticast)
//! ```

use super::domain_registry::{BindToken, EndpointInfo, WriterEntry};
use super::ledger::Membership;
use super::time::{now_nanos, Time};
use super::topic::Topic;
use super::{Change, ChangeKind, DomainState, Error, Guid, InstanceHandle, QoS, Result, DDS};
use crate::config::MAX_SAMPLE_SIZE;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters of the changes a writer has emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    pub registers: u64,
    pub writes: u64,
    pub disposes: u64,
    pub unregisters: u64,
}

#[derive(Debug, Default)]
struct Counters {
    registers: AtomicU64,
    writes: AtomicU64,
    disposes: AtomicU64,
    unregisters: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstanceStatus {
    Alive,
    Disposed,
}

/// A typed DDS DataWriter that publishes samples to a topic.
///
/// Dropping the writer unregisters every instance it still holds, which
/// also disposes them when `autodispose_unregistered_instances` is set.
pub struct DataWriter<T: DDS> {
    entry: Arc<WriterEntry>,
    domain: Arc<DomainState>,
    topic_name: String,
    instances: Mutex<HashMap<[u8; 16], InstanceStatus>>,
    next_seq: AtomicU64,
    counters: Counters,
    token: Option<BindToken>,
    pub(crate) publisher_membership: Membership,
    topic_membership: Membership,
    _phantom: PhantomData<fn(&T)>,
}

impl<T: DDS> DataWriter<T> {
    pub(crate) fn new(
        guid: Guid,
        topic: &Topic<T>,
        qos: QoS,
        domain: Arc<DomainState>,
        publisher_membership: Membership,
        topic_membership: Membership,
    ) -> Self {
        let info = EndpointInfo::new(guid, topic.name(), topic.type_name(), qos);
        let entry = Arc::new(WriterEntry::new(info));
        let token = domain.register_writer(Arc::clone(&entry));
        Self {
            entry,
            domain,
            topic_name: topic.name().to_string(),
            instances: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(1),
            counters: Counters::default(),
            token: Some(token),
            publisher_membership,
            topic_membership,
            _phantom: PhantomData,
        }
    }

    pub fn qos(&self) -> &QoS {
        &self.entry.info.qos
    }

    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    pub(crate) fn guid(&self) -> Guid {
        self.entry.info.guid
    }

    pub fn instance_handle(&self) -> InstanceHandle {
        InstanceHandle(self.entry.info.guid.0)
    }

    #[must_use]
    pub fn stats(&self) -> WriterStats {
        WriterStats {
            registers: self.counters.registers.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
            disposes: self.counters.disposes.load(Ordering::Relaxed),
            unregisters: self.counters.unregisters.load(Ordering::Relaxed),
        }
    }

    /// Number of instances currently registered by this writer.
    pub fn instance_count(&self) -> usize {
        self.instances.lock().len()
    }

    /// Handle of the instance `sample` belongs to, if registered.
    pub fn lookup_instance(&self, sample: &T) -> InstanceHandle {
        let key = sample.compute_key();
        if self.instances.lock().contains_key(&key) {
            InstanceHandle::new(key)
        } else {
            InstanceHandle::nil()
        }
    }

    /// Declare the instance of `sample` and return its handle.
    ///
    /// Registering an already registered instance returns the same handle.
    /// A disposed instance becomes alive again.
    pub fn register_instance(&self, sample: &T) -> Result<InstanceHandle> {
        let key = sample.compute_key();
        self.ensure_registered(key)?;
        Ok(InstanceHandle::new(key))
    }

    /// Publish a sample, registering its instance implicitly.
    pub fn write(&self, sample: &T) -> Result<()> {
        self.write_w_timestamp(sample, InstanceHandle::nil(), Time::now())
    }

    /// Publish a sample for an instance obtained from `register_instance`.
    ///
    /// A nil handle behaves like [`DataWriter::write`]. A handle that does
    /// not match the sample's key is a [`Error::BadParameter`].
    pub fn write_w_handle(&self, sample: &T, handle: InstanceHandle) -> Result<()> {
        self.write_w_timestamp(sample, handle, Time::now())
    }

    /// Publish a sample with an explicit source timestamp.
    pub fn write_w_timestamp(
        &self,
        sample: &T,
        handle: InstanceHandle,
        timestamp: Time,
    ) -> Result<()> {
        let key = self.resolve_key(sample, handle)?;
        self.ensure_registered(key)?;
        let payload = encode(sample)?;
        self.counters.writes.fetch_add(1, Ordering::Relaxed);
        self.emit(ChangeKind::Alive, key, payload, timestamp.as_nanos())
    }

    /// Mark the instance of `sample` as disposed for every reader.
    ///
    /// Fails with [`Error::PreconditionNotMet`] if the instance was never
    /// registered by this writer.
    pub fn dispose(&self, sample: &T, handle: InstanceHandle) -> Result<()> {
        let key = self.resolve_key(sample, handle)?;
        {
            let mut instances = self.instances.lock();
            match instances.get_mut(&key) {
                Some(status) => *status = InstanceStatus::Disposed,
                None => return Err(unknown_instance("dispose")),
            }
        }
        self.entry.history.lock().forget(&key);
        self.counters.disposes.fetch_add(1, Ordering::Relaxed);
        self.emit(ChangeKind::Disposed, key, encode(sample)?, now_nanos())
    }

    /// Withdraw this writer from the instance of `sample`.
    ///
    /// With `autodispose_unregistered_instances` the instance is disposed
    /// first unless it already is.
    pub fn unregister_instance(&self, sample: &T, handle: InstanceHandle) -> Result<()> {
        let key = self.resolve_key(sample, handle)?;
        let status = self
            .instances
            .lock()
            .remove(&key)
            .ok_or_else(|| unknown_instance("unregister_instance"))?;
        self.entry.history.lock().forget(&key);
        let payload = encode(sample)?;
        self.retire(key, status, payload)
    }

    fn resolve_key(&self, sample: &T, handle: InstanceHandle) -> Result<[u8; 16]> {
        let key = sample.compute_key();
        if !handle.is_nil() && handle.as_bytes() != &key {
            return Err(Error::BadParameter(format!(
                "instance handle {} does not match sample key on '{}'",
                handle, self.topic_name
            )));
        }
        Ok(key)
    }

    fn ensure_registered(&self, key: [u8; 16]) -> Result<()> {
        let mut instances = self.instances.lock();
        if let Some(status) = instances.get_mut(&key) {
            *status = InstanceStatus::Alive;
            return Ok(());
        }
        let limit = self.qos().resource_limits.max_instances;
        if instances.len() >= limit {
            return Err(Error::ResourceLimitExceeded(format!(
                "writer on '{}' already holds {} instance(s)",
                self.topic_name, limit
            )));
        }
        instances.insert(key, InstanceStatus::Alive);
        self.counters.registers.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn retire(&self, key: [u8; 16], status: InstanceStatus, payload: Vec<u8>) -> Result<()> {
        let payload: Arc<[u8]> = Arc::from(payload);
        if status == InstanceStatus::Alive
            && self.qos().writer_data_lifecycle.is_auto_dispose()
        {
            self.counters.disposes.fetch_add(1, Ordering::Relaxed);
            self.emit_shared(ChangeKind::Disposed, key, Arc::clone(&payload), now_nanos())?;
        }
        self.counters.unregisters.fetch_add(1, Ordering::Relaxed);
        self.emit_shared(ChangeKind::Unregistered, key, payload, now_nanos())
    }

    fn emit(&self, kind: ChangeKind, key: [u8; 16], payload: Vec<u8>, source_ns: u64) -> Result<()> {
        self.emit_shared(kind, key, Arc::from(payload), source_ns)
    }

    fn emit_shared(
        &self,
        kind: ChangeKind,
        key: [u8; 16],
        payload: Arc<[u8]>,
        source_ns: u64,
    ) -> Result<()> {
        let change = Change {
            kind,
            writer: self.entry.info.guid,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            key,
            source_ns,
            lifespan: self.qos().lifespan,
            payload,
            replay: false,
        };
        log::trace!(
            "[writer] {} {:?} seq={} on '{}'",
            change.writer,
            kind,
            change.seq,
            self.topic_name
        );
        self.domain.publish(&self.entry, &change)
    }
}

fn encode<T: DDS>(sample: &T) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; MAX_SAMPLE_SIZE];
    let len = sample.encode_cdr2(&mut buf)?;
    buf.truncate(len);
    Ok(buf)
}

fn unknown_instance(op: &str) -> Error {
    Error::PreconditionNotMet(format!("{}: instance is not registered", op))
}

impl<T: DDS> Drop for DataWriter<T> {
    fn drop(&mut self) {
        let remaining: Vec<([u8; 16], InstanceStatus)> =
            self.instances.lock().drain().collect();
        for (key, status) in remaining {
            // The payload of a lifecycle change only carries the key, which
            // readers already hold.
            if let Err(e) = self.retire(key, status, Vec::new()) {
                log::warn!(
                    "[writer] {} failed to unregister instance on '{}': {}",
                    self.entry.info.guid,
                    self.topic_name,
                    e
                );
            }
        }
        // Leave the domain before releasing the parents.
        self.token.take();
        self.topic_membership.release();
        self.publisher_membership.release();
        log::debug!(
            "[writer] {} on '{}' closed after {:?}",
            self.entry.info.guid,
            self.topic_name,
            self.stats()
        );
    }
}
