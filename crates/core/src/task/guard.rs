//! Re-entrancy guard for task runs
//!
//! A [`RunSlot`] holds the `started` instant of the in-flight run, or `None`
//! while the task is idle, so `running` and `started` can never disagree.
//! Acquisition is a non-blocking check-and-set under a short critical
//! section: a second caller is turned away instead of waiting. The returned
//! [`RunGuard`] frees the slot when dropped, which covers normal completion,
//! callback errors, panics unwinding through the run and cancelled futures.

use std::time::Instant;

use parking_lot::Mutex;
use taskguard_common::time::Clock;

#[derive(Debug, Default)]
pub(crate) struct RunSlot {
    started: Mutex<Option<Instant>>,
}

impl RunSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or report when the in-flight run started.
    pub(crate) fn try_acquire(&self, clock: &dyn Clock) -> Result<RunGuard<'_>, Instant> {
        let mut started = self.started.lock();
        if let Some(at) = *started {
            return Err(at);
        }

        let now = clock.now();
        *started = Some(now);
        Ok(RunGuard { slot: self, started: now })
    }

    pub(crate) fn started(&self) -> Option<Instant> {
        *self.started.lock()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.started.lock().is_some()
    }
}

/// Proof of an in-flight run. Releases the slot on drop.
#[derive(Debug)]
pub(crate) struct RunGuard<'a> {
    slot: &'a RunSlot,
    started: Instant,
}

impl RunGuard<'_> {
    pub(crate) fn started(&self) -> Instant {
        self.started
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        *self.slot.started.lock() = None;
    }
}
