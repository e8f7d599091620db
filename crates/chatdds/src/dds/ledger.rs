// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parent/child bookkeeping for ordered entity teardown.
//!
//! Every factory entity (participant, publisher, subscriber, topic) owns a
//! [`Ledger`] counting its live children. A child holds a [`Membership`]
//! that is released exactly once, either by an explicit `delete_*` call or
//! when the child is dropped.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub(crate) struct Ledger {
    children: AtomicUsize,
    deleted: AtomicBool,
}

impl Ledger {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn children(&self) -> usize {
        self.children.load(Ordering::Acquire)
    }

    pub(crate) fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::Acquire)
    }

    pub(crate) fn mark_deleted(&self) {
        self.deleted.store(true, Ordering::Release);
    }

    /// Register a new child. Fails once the owner has been deleted.
    pub(crate) fn enroll(self: &Arc<Self>) -> super::Result<Membership> {
        if self.is_deleted() {
            return Err(super::Error::AlreadyDeleted);
        }
        self.children.fetch_add(1, Ordering::AcqRel);
        Ok(Membership {
            parent: Arc::clone(self),
            released: AtomicBool::new(false),
        })
    }

    /// Fail with `PreconditionNotMet` while children are alive.
    pub(crate) fn ensure_empty(&self, what: &str, child_kind: &str) -> super::Result<()> {
        match self.children() {
            0 => Ok(()),
            n => Err(super::Error::PreconditionNotMet(format!(
                "{} still has {} {}",
                what, n, child_kind
            ))),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Membership {
    parent: Arc<Ledger>,
    released: AtomicBool,
}

impl Membership {
    pub(crate) fn belongs_to(&self, ledger: &Arc<Ledger>) -> bool {
        Arc::ptr_eq(&self.parent, ledger)
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    pub(crate) fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.parent.children.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

impl Drop for Membership {
    fn drop(&mut self) {
        self.release();
    }
}
