// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # DDS DataReader
//!
//! The [`DataReader`] receives typed samples from matching writers.
//!
//! ## Overview
//!
//! Changes routed by the domain (local writers or UDP frames) are decoded
//! on arrival and queued in a per-reader cache. The application then:
//! - `take`s samples (removed from the cache), or
//! - `read`s them (left in the cache, marked READ).
//!
//! The reader's [`StatusCondition`] has DATA_AVAILABLE enabled and stays
//! triggered while unread samples remain, so a [`WaitSet`](super::WaitSet)
//! can block until data arrives.
//!
//! ## Example
//!
//! ```rust,ignore
//! let reader = subscriber.create_reader_with_topic_qos(&topic)?;
//! let waitset = WaitSet::new();
//! waitset.attach_condition(reader.status_condition())?;
//! waitset.wait(Some(Duration::from_secs(1)))?;
//! for sample in reader.take_samples(usize::MAX, SampleStateMask::ANY,
//!                                   ViewStateMask::ANY, InstanceStateMask::ANY)? {
//!     // ...
//! }
//! ```

mod cache;

pub use cache::ReaderStats;

use self::cache::{Access, Incoming, Offer, ReaderCache, Selection};
use super::condition::{StatusCondition, StatusMask};
use super::domain_registry::{BindToken, ChangeSink, EndpointInfo, ReaderEntry};
use super::ledger::Membership;
use super::sample::{InstanceStateMask, Sample, SampleStateMask, ViewStateMask};
use super::time::now_nanos;
use super::topic::Topic;
use super::{Change, ChangeKind, DomainState, Guid, InstanceHandle, QoS, Result, DDS};
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::sync::Arc;

/// State shared between the reader handle and the domain routing.
struct ReaderShared<T> {
    guid: Guid,
    topic_name: String,
    cache: Mutex<ReaderCache<T>>,
    condition: Arc<StatusCondition>,
}

impl<T: DDS> ReaderShared<T> {
    fn decode(&self, change: &Change) -> Option<Option<T>> {
        if change.kind != ChangeKind::Alive {
            return Some(None);
        }
        match T::decode_cdr2(&change.payload) {
            Ok(sample) => Some(Some(sample)),
            Err(e) => {
                log::warn!(
                    "[reader] {} failed to decode seq={} from {} on '{}': {}",
                    self.guid,
                    change.seq,
                    change.writer,
                    self.topic_name,
                    e
                );
                None
            }
        }
    }
}

impl<T: DDS> ChangeSink for ReaderShared<T> {
    fn on_change(&self, change: &Change) {
        let mut cache = self.cache.lock();

        let Some(gap) = cache
            .writers
            .entry(change.writer)
            .or_default()
            .accept(change.seq, change.replay)
        else {
            cache.stats.duplicates_dropped += 1;
            return;
        };
        if gap > 0 {
            cache.stats.samples_lost += gap;
            self.condition.raise(StatusMask::SAMPLE_LOST);
            log::debug!(
                "[reader] {} lost {} sample(s) from {} on '{}'",
                self.guid,
                gap,
                change.writer,
                self.topic_name
            );
        }

        if change.kind == ChangeKind::Alive
            && change.lifespan.is_expired(change.source_ns, now_nanos())
        {
            cache.stats.samples_expired += 1;
            return;
        }

        let Some(data) = self.decode(change) else {
            cache.stats.decode_errors += 1;
            return;
        };

        let offer = cache.offer(Incoming {
            kind: change.kind,
            key: change.key,
            writer: change.writer,
            seq: change.seq,
            source_ns: change.source_ns,
            lifespan: change.lifespan,
            data,
        });
        match offer {
            Offer::Queued => {
                cache.stats.samples_received += 1;
                self.condition.raise(StatusMask::DATA_AVAILABLE);
            }
            Offer::Rejected => {
                cache.stats.samples_rejected += 1;
                self.condition.raise(StatusMask::SAMPLE_REJECTED);
            }
            Offer::Ignored => {}
        }
    }
}

/// A typed DDS DataReader that receives samples from a topic.
pub struct DataReader<T: DDS> {
    shared: Arc<ReaderShared<T>>,
    qos: QoS,
    token: Option<BindToken>,
    pub(crate) subscriber_membership: Membership,
    topic_membership: Membership,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: DDS> DataReader<T> {
    pub(crate) fn new(
        guid: Guid,
        topic: &Topic<T>,
        qos: QoS,
        domain: &Arc<DomainState>,
        subscriber_membership: Membership,
        topic_membership: Membership,
    ) -> Self {
        let shared = Arc::new(ReaderShared {
            guid,
            topic_name: topic.name().to_string(),
            cache: Mutex::new(ReaderCache::new(&qos)),
            condition: Arc::new(StatusCondition::new(StatusMask::DATA_AVAILABLE)),
        });
        let entry = ReaderEntry {
            info: EndpointInfo::new(guid, topic.name(), topic.type_name(), qos.clone()),
            sink: Arc::clone(&shared) as Arc<dyn ChangeSink>,
        };
        let token = domain.register_reader(entry);
        Self {
            shared,
            qos,
            token: Some(token),
            subscriber_membership,
            topic_membership,
            _phantom: PhantomData,
        }
    }

    pub fn qos(&self) -> &QoS {
        &self.qos
    }

    pub fn topic_name(&self) -> &str {
        &self.shared.topic_name
    }

    pub(crate) fn guid(&self) -> Guid {
        self.shared.guid
    }

    pub fn instance_handle(&self) -> InstanceHandle {
        InstanceHandle(self.shared.guid.0)
    }

    /// Status condition with DATA_AVAILABLE enabled.
    pub fn status_condition(&self) -> Arc<StatusCondition> {
        Arc::clone(&self.shared.condition)
    }

    /// Delivery counters. Reading them resets the SAMPLE_LOST and
    /// SAMPLE_REJECTED statuses.
    #[must_use]
    pub fn stats(&self) -> ReaderStats {
        let stats = self.shared.cache.lock().stats;
        self.shared
            .condition
            .clear(StatusMask::SAMPLE_LOST | StatusMask::SAMPLE_REJECTED);
        stats
    }

    /// Number of samples (including lifecycle notifications) in the cache.
    pub fn queued(&self) -> usize {
        self.shared.cache.lock().len()
    }

    /// Take the oldest valid sample, if any.
    pub fn take(&self) -> Result<Option<T>> {
        Ok(self
            .access(Selection::valid(1), Access::Take)
            .into_iter()
            .next()
            .and_then(Sample::into_data))
    }

    /// Take up to `max` valid samples.
    pub fn take_batch(&self, max: usize) -> Result<Vec<T>> {
        Ok(self
            .access(Selection::valid(max), Access::Take)
            .into_iter()
            .filter_map(Sample::into_data)
            .collect())
    }

    /// Take up to `max` samples matching the state masks, lifecycle
    /// notifications (`valid_data = false`) included.
    pub fn take_samples(
        &self,
        max: usize,
        sample_states: SampleStateMask,
        view_states: ViewStateMask,
        instance_states: InstanceStateMask,
    ) -> Result<Vec<Sample<T>>> {
        let selection = Selection {
            max,
            samples: sample_states,
            views: view_states,
            instances: instance_states,
            valid_only: false,
        };
        Ok(self.access(selection, Access::Take))
    }

    fn access(&self, selection: Selection, mode: Access<'_, T>) -> Vec<Sample<T>> {
        let take = matches!(mode, Access::Take);
        let mut cache = self.shared.cache.lock();
        cache.purge_expired(now_nanos());
        let samples = cache.access(selection, mode);
        if !cache.has_unread() {
            self.shared.condition.clear(StatusMask::DATA_AVAILABLE);
        }
        log::trace!(
            "[reader] {} {} {} sample(s) on '{}'",
            self.shared.guid,
            if take { "took" } else { "read" },
            samples.len(),
            self.shared.topic_name
        );
        samples
    }
}

impl<T: DDS + Clone> DataReader<T> {
    /// Read the oldest valid sample without removing it.
    pub fn read(&self) -> Result<Option<T>> {
        Ok(self
            .access(Selection::valid(1), Access::Read(&T::clone))
            .into_iter()
            .next()
            .and_then(Sample::into_data))
    }

    /// Read up to `max` samples matching the state masks; they stay cached
    /// and are marked READ.
    pub fn read_samples(
        &self,
        max: usize,
        sample_states: SampleStateMask,
        view_states: ViewStateMask,
        instance_states: InstanceStateMask,
    ) -> Result<Vec<Sample<T>>> {
        let selection = Selection {
            max,
            samples: sample_states,
            views: view_states,
            instances: instance_states,
            valid_only: false,
        };
        Ok(self.access(selection, Access::Read(&T::clone)))
    }
}

impl<T: DDS> Drop for DataReader<T> {
    fn drop(&mut self) {
        self.token.take();
        self.topic_membership.release();
        self.subscriber_membership.release();
        log::debug!(
            "[reader] {} on '{}' closed",
            self.shared.guid,
            self.shared.topic_name
        );
    }
}
