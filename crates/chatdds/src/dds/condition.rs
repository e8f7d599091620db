// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DDS Conditions - event notification predicates for WaitSets
//!
//! Conditions are predicates attached to a [`super::WaitSet`]. Each attached
//! waitset registers a [`WaitsetSignal`]; a condition whose trigger value
//! flips to `true` signals every registered waitset.
//!
//! Trigger state is updated before the signal is raised so a waiter that
//! checks the trigger value under the signal lock never misses a wakeup.

use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Wakeup channel between conditions and one waitset.
pub struct WaitsetSignal {
    id: u64,
    generation: Mutex<u64>,
    cvar: Condvar,
}

impl WaitsetSignal {
    pub(crate) fn new() -> Self {
        Self {
            id: next_id(),
            generation: Mutex::new(0),
            cvar: Condvar::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wake every thread blocked on this signal.
    pub fn signal(&self) {
        let mut generation = self.generation.lock();
        *generation = generation.wrapping_add(1);
        self.cvar.notify_all();
    }

    /// Evaluate `ready` under the signal lock and block until it yields a
    /// value or `deadline` passes.
    pub(crate) fn wait_until<R>(
        &self,
        deadline: Option<Instant>,
        mut ready: impl FnMut() -> Option<R>,
    ) -> Option<R> {
        let mut generation = self.generation.lock();
        loop {
            if let Some(value) = ready() {
                return Some(value);
            }
            match deadline {
                Some(deadline) => {
                    if self.cvar.wait_until(&mut generation, deadline).timed_out() {
                        return ready();
                    }
                }
                None => self.cvar.wait(&mut generation),
            }
        }
    }
}

/// Condition trait - base interface for all DDS conditions
///
/// A Condition is a boolean-valued predicate that can be evaluated.
/// Conditions are attached to WaitSets to enable blocking waits.
pub trait Condition: Send + Sync {
    /// Get the current trigger value of this condition
    fn get_trigger_value(&self) -> bool;

    /// Get a unique identifier for this condition (for comparison)
    fn condition_id(&self) -> u64;

    /// Register a waitset signal so this condition can wake blocked waiters.
    fn add_waitset_signal(&self, signal: &Arc<WaitsetSignal>);

    /// Remove a previously registered waitset signal.
    fn remove_waitset_signal(&self, signal_id: u64);

    /// Downcast support for dynamic condition handling.
    fn as_any(&self) -> &dyn Any;
}

/// Status mask bits for StatusCondition
///
/// DDS v1.4 section 2.2.4.1: communication statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMask(u32);

impl StatusMask {
    /// No status enabled
    pub const NONE: StatusMask = StatusMask(0);

    /// All statuses enabled
    pub const ALL: StatusMask = StatusMask(0xFFFF_FFFF);

    /// Data available to read (DataReader)
    pub const DATA_AVAILABLE: StatusMask = StatusMask(1 << 0);

    /// Sample lost (DataReader)
    pub const SAMPLE_LOST: StatusMask = StatusMask(1 << 1);

    /// Sample rejected (DataReader)
    pub const SAMPLE_REJECTED: StatusMask = StatusMask(1 << 2);

    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(&self, other: StatusMask) -> bool {
        (self.0 & other.0) == other.0
    }

    #[must_use]
    pub const fn intersects(&self, other: StatusMask) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for StatusMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        StatusMask(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for StatusMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        StatusMask(self.0 & rhs.0)
    }
}

struct WaitsetHook {
    id: u64,
    signal: Weak<WaitsetSignal>,
}

#[derive(Default)]
struct Hooks(Mutex<Vec<WaitsetHook>>);

impl Hooks {
    fn add(&self, signal: &Arc<WaitsetSignal>) {
        let mut hooks = self.0.lock();
        hooks.retain(|hook| hook.signal.strong_count() > 0);
        hooks.push(WaitsetHook {
            id: signal.id(),
            signal: Arc::downgrade(signal),
        });
    }

    fn remove(&self, signal_id: u64) {
        self.0.lock().retain(|hook| hook.id != signal_id);
    }

    fn notify(&self) {
        self.0.lock().retain(|hook| match hook.signal.upgrade() {
            Some(signal) => {
                signal.signal();
                true
            }
            None => false,
        });
    }
}

/// StatusCondition - condition based on Entity communication status
///
/// The trigger value is true while any enabled status is active. Readers
/// raise DATA_AVAILABLE when samples arrive and clear it once no unread
/// sample remains.
pub struct StatusCondition {
    id: u64,
    enabled_statuses: AtomicU32,
    active_statuses: AtomicU32,
    hooks: Hooks,
}

impl StatusCondition {
    /// Create a new StatusCondition monitoring `enabled`.
    pub fn new(enabled: StatusMask) -> Self {
        Self {
            id: next_id(),
            enabled_statuses: AtomicU32::new(enabled.bits()),
            active_statuses: AtomicU32::new(0),
            hooks: Hooks::default(),
        }
    }

    pub fn get_enabled_statuses(&self) -> StatusMask {
        StatusMask(self.enabled_statuses.load(Ordering::Acquire))
    }

    pub fn get_active_statuses(&self) -> StatusMask {
        StatusMask(self.active_statuses.load(Ordering::Acquire))
    }

    /// Raise `mask` (called by the entity when its status changes).
    pub(crate) fn raise(&self, mask: StatusMask) {
        self.active_statuses.fetch_or(mask.bits(), Ordering::AcqRel);
        if self.get_enabled_statuses().intersects(mask) {
            self.hooks.notify();
        }
    }

    /// Clear `mask` (called after the status has been consumed).
    pub(crate) fn clear(&self, mask: StatusMask) {
        self.active_statuses.fetch_and(!mask.bits(), Ordering::AcqRel);
    }
}

impl Condition for StatusCondition {
    fn get_trigger_value(&self) -> bool {
        self.get_enabled_statuses()
            .intersects(self.get_active_statuses())
    }

    fn condition_id(&self) -> u64 {
        self.id
    }

    fn add_waitset_signal(&self, signal: &Arc<WaitsetSignal>) {
        log::debug!(
            "[condition] attach signal id={} to status condition id={}",
            signal.id(),
            self.id
        );
        self.hooks.add(signal);
        if self.get_trigger_value() {
            signal.signal();
        }
    }

    fn remove_waitset_signal(&self, signal_id: u64) {
        self.hooks.remove(signal_id);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Default for StatusCondition {
    fn default() -> Self {
        Self::new(StatusMask::ALL)
    }
}

/// GuardCondition - manually-triggered condition
///
/// The trigger value is under the control of the application, e.g. a
/// Ctrl-C handler that asks a waiting loop to stop.
pub struct GuardCondition {
    id: u64,
    trigger_value: AtomicBool,
    hooks: Hooks,
}

impl GuardCondition {
    /// Create a new GuardCondition with trigger_value = false
    pub fn new() -> Self {
        Self {
            id: next_id(),
            trigger_value: AtomicBool::new(false),
            hooks: Hooks::default(),
        }
    }

    /// Set the trigger value
    ///
    /// When set to `true`, any WaitSet waiting on this condition will wake up.
    pub fn set_trigger_value(&self, value: bool) {
        self.trigger_value.store(value, Ordering::Release);
        if value {
            self.hooks.notify();
        }
    }
}

impl Condition for GuardCondition {
    fn get_trigger_value(&self) -> bool {
        self.trigger_value.load(Ordering::Acquire)
    }

    fn condition_id(&self) -> u64 {
        self.id
    }

    fn add_waitset_signal(&self, signal: &Arc<WaitsetSignal>) {
        self.hooks.add(signal);
        if self.get_trigger_value() {
            signal.signal();
        }
    }

    fn remove_waitset_signal(&self, signal_id: u64) {
        self.hooks.remove(signal_id);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Default for GuardCondition {
    fn default() -> Self {
        Self::new()
    }
}
