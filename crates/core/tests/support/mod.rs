//! Shared test helpers for `taskguard-core` integration tests.
//!
//! These helpers wire a manager to recording doubles so tests can focus on
//! run behaviour instead of setup.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskguard_common::time::MockClock;
use taskguard_core::testing::{ManualTrigger, RecordingDiagnostics};
use taskguard_core::TaskManager;

/// A manager plus handles on every double it uses.
pub struct Harness {
    pub manager: TaskManager,
    pub diagnostics: Arc<RecordingDiagnostics>,
    pub triggers: Arc<ManualTrigger>,
    pub clock: MockClock,
}

impl Harness {
    pub fn new() -> Self {
        let diagnostics = Arc::new(RecordingDiagnostics::new());
        let triggers = Arc::new(ManualTrigger::new());
        let clock = MockClock::new();
        let manager = TaskManager::new(diagnostics.clone())
            .with_clock(Arc::new(clock.clone()))
            .with_trigger_source(triggers.clone());
        Self { manager, diagnostics, triggers, clock }
    }

    /// Manager on the real clock with no trigger source.
    pub fn real_time() -> (TaskManager, Arc<RecordingDiagnostics>) {
        let diagnostics = Arc::new(RecordingDiagnostics::new());
        (TaskManager::new(diagnostics.clone()), diagnostics)
    }
}

/// Counts callback invocations and tracks how many overlap.
#[derive(Debug, Default)]
pub struct RunCounter {
    started: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RunCounter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Record a run that lasts `hold`.
    pub async fn run(&self, hold: Duration) {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(hold).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
