// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Data lifecycle policies for readers and writers.

/// Writer data lifecycle policy controlling automatic disposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterDataLifecycle {
    /// Whether unregistering an instance also disposes it.
    pub autodispose_unregistered_instances: bool,
}

impl WriterDataLifecycle {
    pub fn auto_dispose() -> Self {
        Self {
            autodispose_unregistered_instances: true,
        }
    }

    pub fn manual_dispose() -> Self {
        Self {
            autodispose_unregistered_instances: false,
        }
    }

    pub fn is_auto_dispose(&self) -> bool {
        self.autodispose_unregistered_instances
    }
}

impl Default for WriterDataLifecycle {
    fn default() -> Self {
        Self::auto_dispose()
    }
}

/// Reader data lifecycle policy.
///
/// When `purge_no_writers` is set, samples of instances that lost all their
/// writers are removed once they have been taken or read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ReaderDataLifecycle {
    pub purge_no_writers: bool,
    pub purge_disposed: bool,
}
