// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Domain Registry - endpoint matching and change routing
//!
//! Every writer and reader of a process registers in the [`DomainState`] of
//! its domain. Writers hand each change to the domain, which delivers it to
//! every matched local reader and, when UDP is enabled, multicasts it to
//! other processes.
//!
//! # Architecture
//!
//! ```text
//! DomainRegistry (static global)
//! +-- domains: Mutex<HashMap<DomainId, Weak<DomainState>>>
//!
//! DomainState (one per domain, per process)
//! +-- writers: RwLock<Vec<Arc<WriterEntry>>>
//! +-- readers: RwLock<Vec<ReaderEntry>>
//! +-- transport: Mutex<Option<Arc<UdpTransport>>>
//! +-- [strong ref held by Participant and every endpoint]
//!
//! MatchKey
//! +-- topic_name: Arc<str>
//! +-- type_id: TypeId  (MD5-14 of the type name)
//! ```
//!
//! A writer and a reader match when their `MatchKey`s are equal and the
//! writer's QoS satisfies the reader's (see `QoS::matches`).
//!
//! # Durable replay
//!
//! Writers whose durability is not VOLATILE keep the last `depth` samples of
//! every live instance. A newly registered durable reader receives the
//! history of every matched local writer, and broadcasts a replay request
//! that remote durable writers answer with their history.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Mutex, RwLock};

use super::guid::Guid;
use super::{Error, Result};
use crate::qos::{Lifespan, Liveliness, Partition, QoS};
use crate::transport::frame::{Frame, FrameKind, FLAG_REPLAY};
use crate::transport::{FrameHandler, UdpTransport};

/// Domain ID type (0-232)
pub type DomainId = u32;

/// Type identifier for matching endpoints (MD5 of the type name, 14 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId([u8; 14]);

impl TypeId {
    /// Create TypeId from type name using MD5
    pub fn from_type_name(type_name: &str) -> Self {
        use md5::{Digest, Md5};
        let mut hasher = Md5::new();
        hasher.update(type_name.as_bytes());
        let result = hasher.finalize();
        let mut bytes = [0u8; 14];
        bytes.copy_from_slice(&result[..14]);
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 14] {
        &self.0
    }
}

impl std::fmt::Debug for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeId(")?;
        for byte in &self.0[..4] {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "...)")
    }
}

/// Match key for endpoint lookup
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct MatchKey {
    pub topic_name: Arc<str>,
    pub type_id: TypeId,
}

impl MatchKey {
    pub(crate) fn from_names(topic_name: &str, type_name: &str) -> Self {
        Self {
            topic_name: Arc::from(topic_name),
            type_id: TypeId::from_type_name(type_name),
        }
    }
}

impl std::fmt::Debug for MatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchKey")
            .field("topic", &self.topic_name)
            .field("type_id", &self.type_id)
            .finish()
    }
}

/// What a change does to its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    Alive,
    Disposed,
    Unregistered,
}

/// One writer-side change, already serialized.
#[derive(Debug, Clone)]
pub(crate) struct Change {
    pub kind: ChangeKind,
    pub writer: Guid,
    pub seq: u64,
    pub key: [u8; 16],
    pub source_ns: u64,
    pub lifespan: Lifespan,
    pub payload: Arc<[u8]>,
    /// Delivered from durable history rather than live.
    pub replay: bool,
}

/// Reader-side receiver of routed changes.
pub(crate) trait ChangeSink: Send + Sync {
    fn on_change(&self, change: &Change);
}

/// Identity and QoS of one endpoint.
#[derive(Debug, Clone)]
pub(crate) struct EndpointInfo {
    pub guid: Guid,
    pub key: MatchKey,
    pub type_name: Arc<str>,
    pub qos: QoS,
}

impl EndpointInfo {
    pub(crate) fn new(guid: Guid, topic_name: &str, type_name: &str, qos: QoS) -> Self {
        Self {
            guid,
            key: MatchKey::from_names(topic_name, type_name),
            type_name: Arc::from(type_name),
            qos,
        }
    }
}

/// Writer-side retained samples for late joiners.
#[derive(Debug)]
pub(crate) struct WriterHistory {
    depth: usize,
    enabled: bool,
    instances: HashMap<[u8; 16], VecDeque<Change>>,
}

impl WriterHistory {
    pub(crate) fn new(qos: &QoS) -> Self {
        Self {
            depth: qos.history_depth().max(1),
            enabled: qos.durability.is_durable(),
            instances: HashMap::new(),
        }
    }

    pub(crate) fn record(&mut self, change: &Change) {
        if !self.enabled || change.kind != ChangeKind::Alive {
            return;
        }
        let queue = self.instances.entry(change.key).or_default();
        queue.push_back(change.clone());
        while queue.len() > self.depth {
            queue.pop_front();
        }
    }

    pub(crate) fn forget(&mut self, key: &[u8; 16]) {
        self.instances.remove(key);
    }

    /// Retained changes in write order, flagged as replay.
    pub(crate) fn replay(&self) -> Vec<Change> {
        let mut changes: Vec<Change> = self
            .instances
            .values()
            .flatten()
            .map(|c| Change {
                replay: true,
                ..c.clone()
            })
            .collect();
        changes.sort_by_key(|c| c.seq);
        changes
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.values().map(VecDeque::len).sum()
    }
}

pub(crate) struct WriterEntry {
    pub info: EndpointInfo,
    pub history: Mutex<WriterHistory>,
}

impl WriterEntry {
    pub(crate) fn new(info: EndpointInfo) -> Self {
        let history = WriterHistory::new(&info.qos);
        Self {
            info,
            history: Mutex::new(history),
        }
    }
}

#[derive(Clone)]
pub(crate) struct ReaderEntry {
    pub info: EndpointInfo,
    pub sink: Arc<dyn ChangeSink>,
}

fn endpoints_match(writer: &EndpointInfo, reader: &EndpointInfo) -> bool {
    if writer.key != reader.key {
        return false;
    }
    match writer.qos.matches(&reader.qos) {
        Ok(()) => true,
        Err(policy) => {
            log::trace!(
                "[DomainRegistry] writer {} / reader {} on '{}' incompatible: {}",
                writer.guid,
                reader.guid,
                writer.key.topic_name,
                policy
            );
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndpointKind {
    Reader,
    Writer,
}

/// Token returned when registering an endpoint
///
/// When dropped, automatically unregisters the endpoint from the domain.
pub(crate) struct BindToken {
    domain: Weak<DomainState>,
    guid: Guid,
    kind: EndpointKind,
}

impl Drop for BindToken {
    fn drop(&mut self) {
        if let Some(domain) = self.domain.upgrade() {
            domain.unregister(self.kind, self.guid);
        }
    }
}

/// Domain state - holds all endpoints for a single domain
pub(crate) struct DomainState {
    pub domain_id: DomainId,
    writers: RwLock<Vec<Arc<WriterEntry>>>,
    readers: RwLock<Vec<ReaderEntry>>,
    transport: Mutex<Option<Arc<UdpTransport>>>,
}

impl DomainState {
    fn new(domain_id: DomainId) -> Self {
        Self {
            domain_id,
            writers: RwLock::new(Vec::new()),
            readers: RwLock::new(Vec::new()),
            transport: Mutex::new(None),
        }
    }

    /// Start the UDP transport for this domain if not yet running.
    pub(crate) fn enable_udp(self: &Arc<Self>) -> Result<()> {
        let mut transport = self.transport.lock();
        if transport.is_none() {
            let handler: Weak<dyn FrameHandler> = Arc::downgrade(self) as Weak<dyn FrameHandler>;
            *transport = Some(UdpTransport::start(self.domain_id, handler)?);
        }
        Ok(())
    }

    fn transport(&self) -> Option<Arc<UdpTransport>> {
        self.transport.lock().clone()
    }

    /// Register a writer endpoint
    pub(crate) fn register_writer(self: &Arc<Self>, entry: Arc<WriterEntry>) -> BindToken {
        let guid = entry.info.guid;
        let matched = self
            .readers
            .read()
            .iter()
            .filter(|r| endpoints_match(&entry.info, &r.info))
            .count();
        log::debug!(
            "[DomainRegistry] writer {} on '{}' registered, {} local reader(s) matched",
            guid,
            entry.info.key.topic_name,
            matched
        );
        self.writers.write().push(entry);
        BindToken {
            domain: Arc::downgrade(self),
            guid,
            kind: EndpointKind::Writer,
        }
    }

    /// Register a reader endpoint and replay durable history to it.
    pub(crate) fn register_reader(self: &Arc<Self>, entry: ReaderEntry) -> BindToken {
        let guid = entry.info.guid;
        self.readers.write().push(entry.clone());

        if entry.info.qos.durability.is_durable() {
            let replay: Vec<Change> = self
                .writers
                .read()
                .iter()
                .filter(|w| endpoints_match(&w.info, &entry.info))
                .flat_map(|w| w.history.lock().replay())
                .collect();
            log::debug!(
                "[DomainRegistry] reader {} on '{}' registered, replaying {} local change(s)",
                guid,
                entry.info.key.topic_name,
                replay.len()
            );
            for change in &replay {
                entry.sink.on_change(change);
            }

            if let Some(transport) = self.transport() {
                let request = replay_request_frame(&entry.info);
                if let Err(e) = transport.send(&request) {
                    log::warn!("[DomainRegistry] replay request for {} failed: {}", guid, e);
                }
            }
        } else {
            log::debug!(
                "[DomainRegistry] reader {} on '{}' registered",
                guid,
                entry.info.key.topic_name
            );
        }

        BindToken {
            domain: Arc::downgrade(self),
            guid,
            kind: EndpointKind::Reader,
        }
    }

    fn unregister(&self, kind: EndpointKind, guid: Guid) {
        match kind {
            EndpointKind::Writer => self.writers.write().retain(|w| w.info.guid != guid),
            EndpointKind::Reader => self.readers.write().retain(|r| r.info.guid != guid),
        }
        log::debug!("[DomainRegistry] unregistered {:?} {}", kind, guid);
    }

    /// Route a change from a local writer.
    ///
    /// Local readers always receive it. A UDP send failure is reported to
    /// the caller after local delivery.
    pub(crate) fn publish(&self, writer: &WriterEntry, change: &Change) -> Result<()> {
        writer.history.lock().record(change);

        let targets: Vec<Arc<dyn ChangeSink>> = self
            .readers
            .read()
            .iter()
            .filter(|r| endpoints_match(&writer.info, &r.info))
            .map(|r| Arc::clone(&r.sink))
            .collect();
        for sink in &targets {
            sink.on_change(change);
        }

        match self.transport() {
            Some(transport) => transport.send(&change_frame(&writer.info, change)),
            None => Ok(()),
        }
    }

    pub(crate) fn endpoint_counts(&self) -> (usize, usize) {
        (self.writers.read().len(), self.readers.read().len())
    }

    fn deliver_remote(&self, writer: &EndpointInfo, change: &Change) {
        let targets: Vec<Arc<dyn ChangeSink>> = self
            .readers
            .read()
            .iter()
            .filter(|r| endpoints_match(writer, &r.info))
            .map(|r| Arc::clone(&r.sink))
            .collect();
        for sink in &targets {
            sink.on_change(change);
        }
    }

    /// History frames owed to a remote durable reader, oldest first per
    /// writer.
    fn replay_frames(&self, reader: &EndpointInfo) -> Vec<Frame> {
        let writers: Vec<Arc<WriterEntry>> = self
            .writers
            .read()
            .iter()
            .filter(|w| w.info.qos.durability.is_durable() && endpoints_match(&w.info, reader))
            .cloned()
            .collect();
        let mut frames = Vec::new();
        for writer in writers {
            let changes = writer.history.lock().replay();
            log::debug!(
                "[DomainRegistry] replay request from {}: {} change(s) of {}",
                reader.guid,
                changes.len(),
                writer.info.guid
            );
            frames.extend(changes.iter().map(|c| change_frame(&writer.info, c)));
        }
        frames
    }

    fn answer_replay(&self, reader: &EndpointInfo) {
        let Some(transport) = self.transport() else {
            return;
        };
        for frame in self.replay_frames(reader) {
            if let Err(e) = transport.send(&frame) {
                log::warn!("[DomainRegistry] replay send failed: {}", e);
                return;
            }
        }
    }
}

impl FrameHandler for DomainState {
    fn on_frame(&self, frame: Frame, from: SocketAddr) {
        let info = remote_endpoint(&frame);
        match frame.kind {
            FrameKind::ReplayRequest => self.answer_replay(&info),
            FrameKind::Data | FrameKind::Dispose | FrameKind::Unregister => {
                let kind = match frame.kind {
                    FrameKind::Dispose => ChangeKind::Disposed,
                    FrameKind::Unregister => ChangeKind::Unregistered,
                    _ => ChangeKind::Alive,
                };
                log::trace!(
                    "[DomainRegistry] {:?} seq={} on '{}' from {}",
                    kind,
                    frame.seq,
                    frame.topic,
                    from
                );
                let change = Change {
                    kind,
                    writer: info.guid,
                    seq: frame.seq,
                    key: frame.key_hash,
                    source_ns: frame.source_ns,
                    lifespan: Lifespan::from_wire_nanos(frame.lifespan_ns),
                    payload: Arc::from(frame.payload),
                    replay: frame.flags & FLAG_REPLAY != 0,
                };
                self.deliver_remote(&info, &change);
            }
        }
    }
}

fn duration_to_wire(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

fn duration_from_wire(nanos: u64) -> std::time::Duration {
    if nanos == u64::MAX {
        crate::qos::DURATION_INFINITE
    } else {
        std::time::Duration::from_nanos(nanos)
    }
}

fn base_frame(kind: FrameKind, info: &EndpointInfo) -> Frame {
    Frame {
        kind,
        flags: 0,
        guid: info.guid.0,
        seq: 0,
        key_hash: [0; 16],
        source_ns: 0,
        lifespan_ns: u64::MAX,
        reliability: info.qos.reliability,
        durability: info.qos.durability,
        liveliness: info.qos.liveliness.kind,
        lease_ns: duration_to_wire(info.qos.liveliness.lease_duration),
        topic: info.key.topic_name.to_string(),
        type_name: info.type_name.to_string(),
        partitions: info.qos.partition.names.clone(),
        payload: Vec::new(),
    }
}

fn change_frame(writer: &EndpointInfo, change: &Change) -> Frame {
    let kind = match change.kind {
        ChangeKind::Alive => FrameKind::Data,
        ChangeKind::Disposed => FrameKind::Dispose,
        ChangeKind::Unregistered => FrameKind::Unregister,
    };
    Frame {
        flags: if change.replay { FLAG_REPLAY } else { 0 },
        seq: change.seq,
        key_hash: change.key,
        source_ns: change.source_ns,
        lifespan_ns: change.lifespan.as_wire_nanos(),
        payload: change.payload.to_vec(),
        ..base_frame(kind, writer)
    }
}

fn replay_request_frame(reader: &EndpointInfo) -> Frame {
    Frame {
        flags: FLAG_REPLAY,
        ..base_frame(FrameKind::ReplayRequest, reader)
    }
}

/// Endpoint description of the remote side of a frame.
fn remote_endpoint(frame: &Frame) -> EndpointInfo {
    let mut qos = QoS::best_effort();
    qos.reliability = frame.reliability;
    qos.durability = frame.durability;
    qos.liveliness = Liveliness::new(frame.liveliness, duration_from_wire(frame.lease_ns));
    qos.partition = Partition::new(frame.partitions.clone());
    EndpointInfo::new(Guid(frame.guid), &frame.topic, &frame.type_name, qos)
}

/// Process-wide map of live domains.
pub(crate) struct DomainRegistry {
    domains: Mutex<HashMap<DomainId, Weak<DomainState>>>,
}

impl DomainRegistry {
    pub(crate) fn global() -> &'static DomainRegistry {
        static REGISTRY: OnceLock<DomainRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| DomainRegistry {
            domains: Mutex::new(HashMap::new()),
        })
    }

    /// Shared state of `domain_id`, created on first use.
    pub(crate) fn domain(&self, domain_id: DomainId) -> Result<Arc<DomainState>> {
        if domain_id > crate::config::MAX_DOMAIN_ID {
            return Err(Error::InvalidDomainId(domain_id));
        }
        let mut domains = self.domains.lock();
        if let Some(state) = domains.get(&domain_id).and_then(Weak::upgrade) {
            return Ok(state);
        }
        domains.retain(|_, weak| weak.strong_count() > 0);
        let state = Arc::new(DomainState::new(domain_id));
        domains.insert(domain_id, Arc::downgrade(&state));
        log::debug!("[DomainRegistry] created domain {}", domain_id);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Collect(Mutex<Vec<Change>>);

    impl ChangeSink for Collect {
        fn on_change(&self, change: &Change) {
            self.0.lock().push(change.clone());
        }
    }

    fn change(seq: u64, key: u8) -> Change {
        Change {
            kind: ChangeKind::Alive,
            writer: Guid([1; 16]),
            seq,
            key: [key; 16],
            source_ns: 0,
            lifespan: Lifespan::infinite(),
            payload: Arc::from(vec![seq as u8]),
            replay: false,
        }
    }

    fn reader_entry(guid_byte: u8, qos: QoS) -> (ReaderEntry, Arc<Collect>) {
        let sink = Arc::new(Collect(Mutex::new(Vec::new())));
        let entry = ReaderEntry {
            info: EndpointInfo::new(Guid([guid_byte; 16]), "t", "T", qos),
            sink: sink.clone(),
        };
        (entry, sink)
    }

    #[test]
    fn test_type_id_is_stable() {
        assert_eq!(
            TypeId::from_type_name("Chat::ChatMessage"),
            TypeId::from_type_name("Chat::ChatMessage")
        );
        assert_ne!(
            TypeId::from_type_name("Chat::ChatMessage"),
            TypeId::from_type_name("Chat::NameService")
        );
    }

    #[test]
    fn test_domain_is_shared_per_id() {
        let registry = DomainRegistry::global();
        let a = registry.domain(201).expect("domain should be created");
        let b = registry.domain(201).expect("domain should be shared");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(matches!(registry.domain(500), Err(Error::InvalidDomainId(500))));
    }

    #[test]
    fn test_publish_reaches_only_matching_readers() {
        let domain = DomainRegistry::global().domain(202).expect("domain");
        let writer = Arc::new(WriterEntry::new(EndpointInfo::new(
            Guid([1; 16]),
            "t",
            "T",
            QoS::best_effort(),
        )));
        let _w = domain.register_writer(writer.clone());

        let (ok, ok_sink) = reader_entry(2, QoS::best_effort());
        let (strict, strict_sink) = reader_entry(3, QoS::reliable());
        let _r1 = domain.register_reader(ok);
        let _r2 = domain.register_reader(strict);

        domain.publish(&writer, &change(1, 9)).expect("publish");
        assert_eq!(ok_sink.0.lock().len(), 1);
        assert!(strict_sink.0.lock().is_empty());
    }

    #[test]
    fn test_durable_reader_gets_history_replay() {
        let domain = DomainRegistry::global().domain(203).expect("domain");
        let qos = QoS::reliable().transient_local().keep_last(2);
        let writer = Arc::new(WriterEntry::new(EndpointInfo::new(
            Guid([1; 16]),
            "t",
            "T",
            qos.clone(),
        )));
        let _w = domain.register_writer(writer.clone());
        for seq in 1..=3 {
            domain.publish(&writer, &change(seq, 4)).expect("publish");
        }

        let (late, sink) = reader_entry(5, qos);
        let _r = domain.register_reader(late);
        let seen: Vec<u64> = sink.0.lock().iter().map(|c| c.seq).collect();
        assert_eq!(seen, vec![2, 3]);
        assert!(sink.0.lock().iter().all(|c| c.replay));
    }

    #[test]
    fn test_bind_token_unregisters() {
        let domain = DomainRegistry::global().domain(204).expect("domain");
        let (entry, _sink) = reader_entry(6, QoS::default());
        let token = domain.register_reader(entry);
        assert_eq!(domain.endpoint_counts(), (0, 1));
        drop(token);
        assert_eq!(domain.endpoint_counts(), (0, 0));
    }

    #[test]
    fn test_history_forget_and_volatile() {
        let mut durable = WriterHistory::new(&QoS::reliable().transient());
        durable.record(&change(1, 1));
        durable.record(&change(2, 2));
        durable.forget(&[1; 16]);
        assert_eq!(durable.len(), 1);

        let mut volatile = WriterHistory::new(&QoS::reliable());
        volatile.record(&change(1, 1));
        assert_eq!(volatile.len(), 0);
    }

    #[test]
    fn test_remote_endpoint_from_frame() {
        let info = EndpointInfo::new(
            Guid([3; 16]),
            "Chat_NameService",
            "Chat::NameService",
            QoS::reliable().transient().partition_single("ChatRoom"),
        );
        let frame = change_frame(&info, &change(7, 1));
        let remote = remote_endpoint(&frame);
        assert_eq!(remote.key, info.key);
        assert_eq!(remote.qos.durability, info.qos.durability);
        assert_eq!(remote.qos.partition, info.qos.partition);
        assert!(remote.qos.liveliness.is_infinite());
    }

    fn remote_writer(guid_byte: u8, qos: QoS) -> EndpointInfo {
        EndpointInfo::new(Guid([guid_byte; 16]), "t", "T", qos)
    }

    fn from_addr() -> SocketAddr {
        "192.0.2.10:7651".parse().expect("valid socket address")
    }

    #[test]
    fn test_remote_frame_reaches_matching_reader() {
        let domain = DomainRegistry::global().domain(205).expect("domain");
        let room = QoS::reliable().transient().partition_single("ChatRoom");
        let (entry, sink) = reader_entry(7, room.clone());
        let _r = domain.register_reader(entry);

        let writer = remote_writer(0xA0, room.clone());
        let mut live = change_frame(&writer, &change(1, 2));
        live.payload = vec![0xAB];
        domain.on_frame(live, from_addr());

        let replayed = change_frame(
            &writer,
            &Change {
                replay: true,
                ..change(2, 2)
            },
        );
        domain.on_frame(replayed, from_addr());

        let dispose = change_frame(
            &writer,
            &Change {
                kind: ChangeKind::Disposed,
                ..change(3, 2)
            },
        );
        domain.on_frame(dispose, from_addr());

        let seen = sink.0.lock();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].writer, Guid([0xA0; 16]));
        assert_eq!(seen[0].key, [2; 16]);
        assert_eq!(&*seen[0].payload, &[0xAB]);
        assert!(!seen[0].replay);
        assert!(seen[1].replay);
        assert_eq!(seen[2].kind, ChangeKind::Disposed);
    }

    #[test]
    fn test_remote_frame_filtered_by_partition_and_qos() {
        let domain = DomainRegistry::global().domain(206).expect("domain");
        let (entry, sink) = reader_entry(8, QoS::reliable().partition_single("ChatRoom"));
        let _r = domain.register_reader(entry);

        let lobby = remote_writer(0xB0, QoS::reliable().partition_single("Lobby"));
        domain.on_frame(change_frame(&lobby, &change(1, 1)), from_addr());

        let best_effort = remote_writer(0xB1, QoS::best_effort().partition_single("ChatRoom"));
        domain.on_frame(change_frame(&best_effort, &change(1, 1)), from_addr());

        let other_topic = EndpointInfo::new(
            Guid([0xB2; 16]),
            "u",
            "T",
            QoS::reliable().partition_single("ChatRoom"),
        );
        domain.on_frame(change_frame(&other_topic, &change(1, 1)), from_addr());
        assert!(sink.0.lock().is_empty());

        let room = remote_writer(0xB3, QoS::reliable().partition_single("ChatRoom"));
        domain.on_frame(change_frame(&room, &change(1, 1)), from_addr());
        assert_eq!(sink.0.lock().len(), 1);
    }

    #[test]
    fn test_replay_request_yields_history_frames() {
        let domain = DomainRegistry::global().domain(207).expect("domain");
        let durable = QoS::reliable().transient().keep_last(2).partition_single("ChatRoom");
        let writer = Arc::new(WriterEntry::new(EndpointInfo::new(
            Guid([1; 16]),
            "t",
            "T",
            durable.clone(),
        )));
        let _w = domain.register_writer(writer.clone());
        let volatile = Arc::new(WriterEntry::new(EndpointInfo::new(
            Guid([2; 16]),
            "t",
            "T",
            QoS::reliable().partition_single("ChatRoom"),
        )));
        let _v = domain.register_writer(volatile.clone());
        for seq in 1..=3 {
            domain.publish(&writer, &change(seq, 4)).expect("publish");
            domain.publish(&volatile, &change(seq, 4)).expect("publish");
        }

        let request = replay_request_frame(&remote_writer(0xC0, durable));
        let frames = domain.replay_frames(&remote_endpoint(&request));
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.kind == FrameKind::Data && f.is_replay()));
        assert!(frames.iter().all(|f| f.guid == [1; 16]));
        assert_eq!(frames.iter().map(|f| f.seq).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(frames[0].partitions, vec!["ChatRoom".to_string()]);

        let elsewhere = replay_request_frame(&remote_writer(
            0xC1,
            QoS::reliable().transient().partition_single("Lobby"),
        ));
        assert!(domain.replay_frames(&remote_endpoint(&elsewhere)).is_empty());

        // Without a transport the request is dropped quietly.
        domain.on_frame(request, from_addr());
    }
}
