// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! WaitSet - blocking wait for Condition triggers
//!
//! Conditions register the waitset's [`WaitsetSignal`] when attached so
//! they can wake blocked waiters as soon as their trigger value flips to
//! `true`. No polling is involved.

use super::condition::{Condition, WaitsetSignal};
use super::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// WaitSet - wait for multiple conditions
pub struct WaitSet {
    signal: Arc<WaitsetSignal>,
    conditions: Mutex<Vec<Arc<dyn Condition>>>,
}

impl WaitSet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            signal: Arc::new(WaitsetSignal::new()),
            conditions: Mutex::new(Vec::new()),
        }
    }

    /// Attach a Condition to this WaitSet
    ///
    /// Attaching the same condition twice is a `PreconditionNotMet` error.
    pub fn attach_condition(&self, condition: Arc<dyn Condition>) -> Result<()> {
        let id = condition.condition_id();
        {
            let mut conditions = self.conditions.lock();
            if conditions.iter().any(|c| c.condition_id() == id) {
                return Err(Error::PreconditionNotMet(format!(
                    "condition {} already attached",
                    id
                )));
            }
            conditions.push(Arc::clone(&condition));
        }
        // Outside the list lock: a waiter holds the signal lock while it
        // scans the list.
        condition.add_waitset_signal(&self.signal);
        Ok(())
    }

    /// Detach a Condition from this WaitSet
    pub fn detach_condition(&self, condition: &Arc<dyn Condition>) -> Result<()> {
        let id = condition.condition_id();
        let removed = {
            let mut conditions = self.conditions.lock();
            let pos = conditions
                .iter()
                .position(|c| c.condition_id() == id)
                .ok_or_else(|| {
                    Error::PreconditionNotMet(format!("condition {} not attached", id))
                })?;
            conditions.remove(pos)
        };
        // Same lock order as attach_condition.
        removed.remove_waitset_signal(self.signal.id());
        Ok(())
    }

    /// Get all attached Conditions
    #[must_use]
    pub fn get_conditions(&self) -> Vec<Arc<dyn Condition>> {
        self.conditions.lock().clone()
    }

    /// Wait until at least one Condition is triggered
    ///
    /// Returns the triggered conditions, or `Err(WouldBlock)` when `timeout`
    /// elapses first. `None` waits forever.
    pub fn wait(&self, timeout: Option<Duration>) -> Result<Vec<Arc<dyn Condition>>> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let triggered = self.signal.wait_until(deadline, || {
            let triggered: Vec<_> = self
                .conditions
                .lock()
                .iter()
                .filter(|c| c.get_trigger_value())
                .cloned()
                .collect();
            if triggered.is_empty() {
                None
            } else {
                Some(triggered)
            }
        });
        log::trace!(
            "[waitset] wait returning triggered={:?}",
            triggered.as_ref().map(Vec::len)
        );
        triggered.ok_or(Error::WouldBlock)
    }
}

impl Default for WaitSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WaitSet {
    fn drop(&mut self) {
        let conditions = std::mem::take(&mut *self.conditions.lock());
        for condition in conditions {
            condition.remove_waitset_signal(self.signal.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dds::GuardCondition;
    use std::thread;

    #[test]
    fn test_wait_times_out_with_would_block() {
        let waitset = WaitSet::new();
        let guard = Arc::new(GuardCondition::new());
        waitset
            .attach_condition(guard)
            .expect("attach should succeed");

        let start = Instant::now();
        let result = waitset.wait(Some(Duration::from_millis(30)));
        assert!(matches!(result, Err(Error::WouldBlock)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_guard_wakes_waiter_from_other_thread() {
        let waitset = WaitSet::new();
        let guard = Arc::new(GuardCondition::new());
        waitset
            .attach_condition(guard.clone())
            .expect("attach should succeed");

        let trigger = guard.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            trigger.set_trigger_value(true);
        });

        let triggered = waitset
            .wait(Some(Duration::from_secs(5)))
            .expect("guard should trigger");
        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].condition_id(), guard.condition_id());
        handle.join().expect("thread should join");
    }

    #[test]
    fn test_duplicate_attach_rejected() {
        let waitset = WaitSet::new();
        let guard: Arc<dyn Condition> = Arc::new(GuardCondition::new());
        waitset
            .attach_condition(guard.clone())
            .expect("first attach should succeed");
        assert!(matches!(
            waitset.attach_condition(guard.clone()),
            Err(Error::PreconditionNotMet(_))
        ));

        waitset
            .detach_condition(&guard)
            .expect("detach should succeed");
        assert!(waitset.get_conditions().is_empty());
        assert!(waitset.detach_condition(&guard).is_err());
    }

    #[test]
    fn test_detach_races_with_wait_and_trigger() {
        use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

        let waitset = Arc::new(WaitSet::new());
        let guard = Arc::new(GuardCondition::new());
        let stop = Arc::new(AtomicBool::new(false));
        let progress = Arc::new(AtomicU64::new(0));

        let waiter = {
            let (waitset, stop, progress) = (waitset.clone(), stop.clone(), progress.clone());
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let _ = waitset.wait(Some(Duration::from_micros(50)));
                    progress.fetch_add(1, Ordering::Relaxed);
                }
            })
        };
        let attacher = {
            let (waitset, guard, stop, progress) =
                (waitset.clone(), guard.clone(), stop.clone(), progress.clone());
            thread::spawn(move || {
                let condition: Arc<dyn Condition> = guard;
                while !stop.load(Ordering::Relaxed) {
                    waitset
                        .attach_condition(condition.clone())
                        .expect("attach should succeed");
                    waitset
                        .detach_condition(&condition)
                        .expect("detach should succeed");
                    progress.fetch_add(1, Ordering::Relaxed);
                }
            })
        };
        let raiser = {
            let (guard, stop, progress) = (guard.clone(), stop.clone(), progress.clone());
            thread::spawn(move || {
                let mut value = false;
                while !stop.load(Ordering::Relaxed) {
                    value = !value;
                    guard.set_trigger_value(value);
                    progress.fetch_add(1, Ordering::Relaxed);
                }
            })
        };

        // Every 100 ms some thread must have moved on.
        let mut last = 0;
        for _ in 0..10 {
            thread::sleep(Duration::from_millis(100));
            let now = progress.load(Ordering::Relaxed);
            assert!(now > last, "no progress for 100 ms: threads are stuck");
            last = now;
        }
        stop.store(true, Ordering::Relaxed);
        guard.set_trigger_value(true);
        waiter.join().expect("waiter should join");
        attacher.join().expect("attacher should join");
        raiser.join().expect("raiser should join");
    }
}
