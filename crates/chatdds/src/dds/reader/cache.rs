// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sample cache for DataReader with read/take semantics.
//!
//! # Architecture
//!
//! ```text
//! samples:   [S0][S1][M2][S3]...   arrival order, M = lifecycle marker
//! instances: key -> { instance_state, view_state, writers, queued }
//! writers:   guid -> { last_live, seen window }
//!
//! read()  -> copies matching samples, marks them READ
//! take()  -> removes matching samples
//! ```
//!
//! Any access marks the touched instances NOT_NEW. Not-alive instances are
//! forgotten once they have neither queued samples nor writers.

use super::super::sample::{
    InstanceHandle, InstanceState, InstanceStateMask, Sample, SampleInfo, SampleState,
    SampleStateMask, ViewState, ViewStateMask,
};
use super::super::time::Time;
use super::super::{ChangeKind, Guid};
use crate::qos::{History, Lifespan, QoS};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Sequence numbers remembered per writer for duplicate detection.
pub(super) const DEDUP_WINDOW: u64 = 4096;

/// Reader-side delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Changes accepted into the cache (data and lifecycle).
    pub samples_received: u64,
    /// Live sequence numbers that never arrived.
    pub samples_lost: u64,
    /// Samples refused because of RESOURCE_LIMITS / KEEP_ALL.
    pub samples_rejected: u64,
    /// Samples dropped because their LIFESPAN elapsed.
    pub samples_expired: u64,
    pub duplicates_dropped: u64,
    pub decode_errors: u64,
}

/// Per-writer sequence tracking.
#[derive(Debug, Default)]
pub(super) struct WriterTrack {
    last_live: u64,
    highest: u64,
    seen: BTreeSet<u64>,
}

impl WriterTrack {
    /// Record `seq`; returns `None` for a duplicate, otherwise the number of
    /// live sequence numbers skipped since the previous live change.
    pub(super) fn accept(&mut self, seq: u64, replay: bool) -> Option<u64> {
        let floor = self.highest.saturating_sub(DEDUP_WINDOW);
        if self.seen.contains(&seq) || (floor > 0 && seq <= floor) {
            return None;
        }
        self.seen.insert(seq);
        self.highest = self.highest.max(seq);
        let floor = self.highest.saturating_sub(DEDUP_WINDOW);
        if floor > 0 {
            self.seen = self.seen.split_off(&(floor + 1));
        }

        if replay {
            return Some(0);
        }
        let gap = if self.last_live != 0 && seq > self.last_live + 1 {
            seq - self.last_live - 1
        } else {
            0
        };
        self.last_live = self.last_live.max(seq);
        Some(gap)
    }
}

struct CachedSample<T> {
    key: [u8; 16],
    data: Option<T>,
    state: SampleState,
    writer: Guid,
    seq: u64,
    source_ns: u64,
    lifespan: Lifespan,
}

struct InstanceRecord {
    state: InstanceState,
    view: ViewState,
    writers: HashSet<Guid>,
    queued: usize,
}

impl InstanceRecord {
    fn new(state: InstanceState) -> Self {
        Self {
            state,
            view: ViewState::New,
            writers: HashSet::new(),
            queued: 0,
        }
    }

    fn reclaimable(&self) -> bool {
        !self.state.is_alive() && self.queued == 0 && self.writers.is_empty()
    }
}

/// Which samples an access returns.
#[derive(Debug, Clone, Copy)]
pub(super) struct Selection {
    pub max: usize,
    pub samples: SampleStateMask,
    pub views: ViewStateMask,
    pub instances: InstanceStateMask,
    /// Skip `valid_data = false` markers (they stay queued).
    pub valid_only: bool,
}

impl Selection {
    pub(super) fn any(max: usize) -> Self {
        Self {
            max,
            samples: SampleStateMask::ANY,
            views: ViewStateMask::ANY,
            instances: InstanceStateMask::ANY,
            valid_only: false,
        }
    }

    pub(super) fn valid(max: usize) -> Self {
        Self {
            valid_only: true,
            ..Self::any(max)
        }
    }
}

/// How an access treats the selected samples.
pub(super) enum Access<'a, T> {
    /// Remove them from the cache.
    Take,
    /// Keep them, mark them READ and return copies.
    Read(&'a dyn Fn(&T) -> T),
}

/// Outcome of offering a change to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Offer {
    Queued,
    Ignored,
    Rejected,
}

/// A decoded change as the cache sees it.
pub(super) struct Incoming<T> {
    pub kind: ChangeKind,
    pub key: [u8; 16],
    pub writer: Guid,
    pub seq: u64,
    pub source_ns: u64,
    pub lifespan: Lifespan,
    pub data: Option<T>,
}

pub(super) struct ReaderCache<T> {
    history: History,
    max_samples: usize,
    max_instances: usize,
    max_samples_per_instance: usize,
    samples: VecDeque<CachedSample<T>>,
    instances: HashMap<[u8; 16], InstanceRecord>,
    pub(super) writers: HashMap<Guid, WriterTrack>,
    pub(super) stats: ReaderStats,
}

impl<T> ReaderCache<T> {
    pub(super) fn new(qos: &QoS) -> Self {
        Self {
            history: qos.history,
            max_samples: qos.resource_limits.max_samples,
            max_instances: qos.resource_limits.max_instances,
            max_samples_per_instance: qos.resource_limits.max_samples_per_instance,
            samples: VecDeque::new(),
            instances: HashMap::new(),
            writers: HashMap::new(),
            stats: ReaderStats::default(),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.samples.len()
    }

    pub(super) fn has_unread(&self) -> bool {
        self.samples.iter().any(|s| s.state == SampleState::NotRead)
    }

    pub(super) fn instance_state(&self, key: &[u8; 16]) -> Option<InstanceState> {
        self.instances.get(key).map(|i| i.state)
    }

    /// Apply one change to the cache.
    pub(super) fn offer(&mut self, change: Incoming<T>) -> Offer {
        match change.kind {
            ChangeKind::Alive => self.offer_data(change),
            ChangeKind::Disposed => self.offer_dispose(change),
            ChangeKind::Unregistered => self.offer_unregister(change),
        }
    }

    fn offer_data(&mut self, change: Incoming<T>) -> Offer {
        let existing = self.instances.get(&change.key);
        if existing.is_none() && self.instances.len() >= self.max_instances {
            return Offer::Rejected;
        }
        let queued = existing.map_or(0, |i| i.queued);
        match self.history {
            History::KeepAll if queued >= self.max_samples_per_instance => {
                return Offer::Rejected;
            }
            History::KeepLast(depth) if queued >= depth as usize => {
                self.evict_oldest_of(&change.key);
            }
            _ => {}
        }
        if self.samples.len() >= self.max_samples {
            return Offer::Rejected;
        }

        let record = self
            .instances
            .entry(change.key)
            .or_insert_with(|| InstanceRecord::new(InstanceState::Alive));
        if !record.state.is_alive() {
            record.state = InstanceState::Alive;
            record.view = ViewState::New;
        }
        record.writers.insert(change.writer);
        self.push(change);
        Offer::Queued
    }

    fn offer_dispose(&mut self, change: Incoming<T>) -> Offer {
        if !self.instances.contains_key(&change.key) && self.instances.len() >= self.max_instances
        {
            return Offer::Rejected;
        }
        let record = self
            .instances
            .entry(change.key)
            .or_insert_with(|| InstanceRecord::new(InstanceState::Alive));
        record.writers.insert(change.writer);
        if record.state == InstanceState::NotAliveDisposed {
            return Offer::Ignored;
        }
        record.state = InstanceState::NotAliveDisposed;
        self.push(Incoming { data: None, ..change });
        Offer::Queued
    }

    fn offer_unregister(&mut self, change: Incoming<T>) -> Offer {
        let Some(record) = self.instances.get_mut(&change.key) else {
            return Offer::Ignored;
        };
        record.writers.remove(&change.writer);
        if !record.writers.is_empty() || !record.state.is_alive() {
            if record.reclaimable() {
                self.instances.remove(&change.key);
            }
            return Offer::Ignored;
        }
        record.state = InstanceState::NotAliveNoWriters;
        self.push(Incoming { data: None, ..change });
        Offer::Queued
    }

    fn push(&mut self, change: Incoming<T>) {
        if let Some(record) = self.instances.get_mut(&change.key) {
            record.queued += 1;
        }
        self.samples.push_back(CachedSample {
            key: change.key,
            data: change.data,
            state: SampleState::NotRead,
            writer: change.writer,
            seq: change.seq,
            source_ns: change.source_ns,
            lifespan: change.lifespan,
        });
    }

    fn evict_oldest_of(&mut self, key: &[u8; 16]) {
        if let Some(pos) = self.samples.iter().position(|s| &s.key == key) {
            self.samples.remove(pos);
            if let Some(record) = self.instances.get_mut(key) {
                record.queued = record.queued.saturating_sub(1);
            }
        }
    }

    /// Drop data samples whose lifespan elapsed. Markers never expire.
    pub(super) fn purge_expired(&mut self, now_ns: u64) -> usize {
        let instances = &mut self.instances;
        let before = self.samples.len();
        self.samples.retain(|s| {
            let expired = s.data.is_some() && s.lifespan.is_expired(s.source_ns, now_ns);
            if expired {
                if let Some(record) = instances.get_mut(&s.key) {
                    record.queued = record.queued.saturating_sub(1);
                }
            }
            !expired
        });
        let purged = before - self.samples.len();
        self.stats.samples_expired += purged as u64;
        self.reclaim();
        purged
    }

    fn reclaim(&mut self) {
        self.instances.retain(|_, record| !record.reclaimable());
    }

    /// Return the samples matching `selection`, oldest first.
    pub(super) fn access(&mut self, selection: Selection, mode: Access<'_, T>) -> Vec<Sample<T>> {
        let mut out = Vec::new();
        let mut touched = Vec::new();
        let mut idx = 0;
        while idx < self.samples.len() && out.len() < selection.max {
            let sample = &self.samples[idx];
            let Some(record) = self.instances.get(&sample.key) else {
                idx += 1;
                continue;
            };
            let selected = selection.samples.matches(sample.state)
                && selection.views.matches(record.view)
                && selection.instances.matches(record.state)
                && (!selection.valid_only || sample.data.is_some());
            if !selected {
                idx += 1;
                continue;
            }

            let info = SampleInfo {
                sample_state: sample.state,
                view_state: record.view,
                instance_state: record.state,
                valid_data: sample.data.is_some(),
                source_timestamp: Time::from_nanos(sample.source_ns),
                instance_handle: InstanceHandle::new(sample.key),
                publication_handle: InstanceHandle(sample.writer.0),
                sequence_number: sample.seq,
            };
            touched.push(sample.key);

            let data = match &mode {
                Access::Take => {
                    let Some(removed) = self.samples.remove(idx) else {
                        break;
                    };
                    if let Some(record) = self.instances.get_mut(&removed.key) {
                        record.queued = record.queued.saturating_sub(1);
                    }
                    removed.data
                }
                Access::Read(copy) => {
                    let sample = &mut self.samples[idx];
                    sample.state = SampleState::Read;
                    idx += 1;
                    sample.data.as_ref().map(*copy)
                }
            };
            out.push(Sample { data, info });
        }

        for key in touched {
            if let Some(record) = self.instances.get_mut(&key) {
                record.view = ViewState::NotNew;
            }
        }
        self.reclaim();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incoming(kind: ChangeKind, key: u8, writer: u8, seq: u64, data: Option<u32>) -> Incoming<u32> {
        Incoming {
            kind,
            key: [key; 16],
            writer: Guid([writer; 16]),
            seq,
            source_ns: 1_000,
            lifespan: Lifespan::infinite(),
            data,
        }
    }

    fn alive(key: u8, seq: u64, value: u32) -> Incoming<u32> {
        incoming(ChangeKind::Alive, key, 1, seq, Some(value))
    }

    fn take_all(cache: &mut ReaderCache<u32>) -> Vec<Sample<u32>> {
        cache.access(Selection::any(usize::MAX), Access::Take)
    }

    #[test]
    fn test_writer_track_drops_duplicates_and_counts_gaps() {
        let mut track = WriterTrack::default();
        assert_eq!(track.accept(1, false), Some(0));
        assert_eq!(track.accept(1, false), None);
        assert_eq!(track.accept(4, false), Some(2));
        assert_eq!(track.accept(2, false), Some(0));
        assert_eq!(track.accept(2, true), None);
    }

    #[test]
    fn test_writer_track_replay_does_not_count_gaps() {
        let mut track = WriterTrack::default();
        assert_eq!(track.accept(3, true), Some(0));
        assert_eq!(track.accept(7, true), Some(0));
        assert_eq!(track.accept(9, false), Some(0));
        assert_eq!(track.accept(10, false), Some(0));
    }

    #[test]
    fn test_writer_track_forgets_beyond_window() {
        let mut track = WriterTrack::default();
        track.accept(1, false);
        track.accept(DEDUP_WINDOW + 10, false);
        assert_eq!(track.accept(1, false), None);
        assert!(track.seen.len() <= DEDUP_WINDOW as usize);
    }

    #[test]
    fn test_keep_last_evicts_oldest_of_instance() {
        let mut cache = ReaderCache::new(&QoS::default().keep_last(2));
        assert_eq!(cache.offer(alive(1, 1, 10)), Offer::Queued);
        assert_eq!(cache.offer(alive(1, 2, 11)), Offer::Queued);
        assert_eq!(cache.offer(alive(2, 3, 20)), Offer::Queued);
        assert_eq!(cache.offer(alive(1, 4, 12)), Offer::Queued);

        let values: Vec<u32> = take_all(&mut cache)
            .into_iter()
            .filter_map(Sample::into_data)
            .collect();
        assert_eq!(values, vec![11, 20, 12]);
    }

    #[test]
    fn test_keep_all_rejects_when_instance_full() {
        let qos = QoS::default().keep_all().max_samples_per_instance(2);
        let mut cache = ReaderCache::new(&qos);
        assert_eq!(cache.offer(alive(1, 1, 10)), Offer::Queued);
        assert_eq!(cache.offer(alive(1, 2, 11)), Offer::Queued);
        assert_eq!(cache.offer(alive(1, 3, 12)), Offer::Rejected);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_max_instances_rejects_new_keys() {
        let qos = QoS::default().max_instances(1);
        let mut cache = ReaderCache::new(&qos);
        assert_eq!(cache.offer(alive(1, 1, 10)), Offer::Queued);
        assert_eq!(cache.offer(alive(2, 2, 20)), Offer::Rejected);
        assert_eq!(cache.offer(alive(1, 3, 11)), Offer::Queued);
    }

    #[test]
    fn test_read_marks_read_and_keeps_samples() {
        let mut cache = ReaderCache::new(&QoS::default());
        cache.offer(alive(1, 1, 10));

        let first = cache.access(Selection::any(usize::MAX), Access::Read(&|v: &u32| *v));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].info.sample_state, SampleState::NotRead);
        assert_eq!(first[0].info.view_state, ViewState::New);
        assert!(!cache.has_unread());

        let second = cache.access(Selection::any(usize::MAX), Access::Read(&|v: &u32| *v));
        assert_eq!(second[0].info.sample_state, SampleState::Read);
        assert_eq!(second[0].info.view_state, ViewState::NotNew);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_dispose_produces_marker_and_state() {
        let mut cache = ReaderCache::new(&QoS::default());
        cache.offer(alive(1, 1, 10));
        assert_eq!(
            cache.offer(incoming(ChangeKind::Disposed, 1, 1, 2, None)),
            Offer::Queued
        );
        assert_eq!(
            cache.offer(incoming(ChangeKind::Disposed, 1, 1, 3, None)),
            Offer::Ignored
        );
        assert_eq!(
            cache.instance_state(&[1; 16]),
            Some(InstanceState::NotAliveDisposed)
        );

        let samples = take_all(&mut cache);
        assert_eq!(samples.len(), 2);
        assert!(samples[0].info.valid_data);
        assert_eq!(samples[0].info.instance_state, InstanceState::NotAliveDisposed);
        assert!(!samples[1].info.valid_data);
        assert!(samples[1].data.is_none());
    }

    #[test]
    fn test_last_unregister_makes_no_writers_and_reclaims() {
        let mut cache = ReaderCache::new(&QoS::default());
        cache.offer(incoming(ChangeKind::Alive, 1, 1, 1, Some(10)));
        cache.offer(incoming(ChangeKind::Alive, 1, 2, 1, Some(20)));

        assert_eq!(
            cache.offer(incoming(ChangeKind::Unregistered, 1, 1, 2, None)),
            Offer::Ignored
        );
        assert_eq!(cache.instance_state(&[1; 16]), Some(InstanceState::Alive));
        assert_eq!(
            cache.offer(incoming(ChangeKind::Unregistered, 1, 2, 2, None)),
            Offer::Queued
        );
        assert_eq!(
            cache.instance_state(&[1; 16]),
            Some(InstanceState::NotAliveNoWriters)
        );

        assert_eq!(take_all(&mut cache).len(), 3);
        assert_eq!(cache.instance_state(&[1; 16]), None);
    }

    #[test]
    fn test_write_after_dispose_revives_instance_as_new() {
        let mut cache = ReaderCache::new(&QoS::default());
        cache.offer(alive(1, 1, 10));
        take_all(&mut cache);
        cache.offer(incoming(ChangeKind::Disposed, 1, 1, 2, None));
        cache.offer(alive(1, 3, 11));

        let samples = cache.access(
            Selection {
                instances: InstanceStateMask::ALIVE,
                ..Selection::valid(usize::MAX)
            },
            Access::Take,
        );
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].info.view_state, ViewState::New);
        assert_eq!(samples[0].data, Some(11));
    }

    #[test]
    fn test_purge_expired_skips_markers() {
        let mut cache = ReaderCache::new(&QoS::default());
        cache.offer(Incoming {
            lifespan: Lifespan::from_millis(1),
            ..alive(1, 1, 10)
        });
        cache.offer(incoming(ChangeKind::Disposed, 1, 1, 2, None));

        assert_eq!(cache.purge_expired(1_000 + 5_000_000), 1);
        assert_eq!(cache.stats.samples_expired, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_max_limits_selection() {
        let mut cache = ReaderCache::new(&QoS::default());
        for seq in 1..=5 {
            cache.offer(alive(seq as u8, seq, seq as u32));
        }
        assert_eq!(cache.access(Selection::any(2), Access::Take).len(), 2);
        assert_eq!(cache.len(), 3);
    }
}
