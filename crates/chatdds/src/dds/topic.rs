// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # DDS Topic
//!
//! A [`Topic`] binds a name to a data type `T` and a topic QoS. It is the
//! connection point between DataWriters and DataReaders: endpoints on the
//! same topic name with the same type name match (subject to QoS).

use super::ledger::{Ledger, Membership};
use super::participant::Participant;
use super::{QoS, DDS};
use std::marker::PhantomData;
use std::sync::Arc;

pub(crate) struct TopicInner {
    pub(crate) name: String,
    pub(crate) type_name: String,
    pub(crate) qos: QoS,
    pub(crate) participant: Arc<Participant>,
    /// Children: writers and readers using this topic.
    pub(crate) ledger: Arc<Ledger>,
    pub(crate) membership: Membership,
}

/// A typed DDS Topic - represents a named data channel.
///
/// Cloning a topic yields another handle to the same entity.
pub struct Topic<T: DDS> {
    pub(crate) inner: Arc<TopicInner>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: DDS> Topic<T> {
    pub(crate) fn from_inner(inner: Arc<TopicInner>) -> Self {
        Self {
            inner,
            _phantom: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn type_name(&self) -> &str {
        &self.inner.type_name
    }

    /// Topic QoS as given at creation.
    pub fn qos(&self) -> &QoS {
        &self.inner.qos
    }

    pub fn is_deleted(&self) -> bool {
        self.inner.ledger.is_deleted()
    }

    /// Number of writers and readers currently using this topic.
    pub fn endpoint_count(&self) -> usize {
        self.inner.ledger.children()
    }

    pub fn participant(&self) -> &Arc<Participant> {
        &self.inner.participant
    }
}

impl<T: DDS> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self::from_inner(Arc::clone(&self.inner))
    }
}

impl<T: DDS> std::fmt::Debug for Topic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.inner.name)
            .field("type_name", &self.inner.type_name)
            .finish()
    }
}
