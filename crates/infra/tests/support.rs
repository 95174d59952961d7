#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskguard_common::testing::poll_until;
use taskguard_core::testing::RecordingDiagnostics;
use taskguard_core::TaskManager;
use taskguard_infra::CronTriggerSource;

/// Manager wired to a started cron source and a recording sink.
pub struct CronHarness {
    pub manager: TaskManager,
    pub triggers: Arc<CronTriggerSource>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

impl CronHarness {
    pub async fn start() -> Self {
        let triggers = Arc::new(CronTriggerSource::new().await.expect("scheduler should be created"));
        triggers.start().await.expect("scheduler should start");
        let diagnostics = Arc::new(RecordingDiagnostics::new());
        let manager =
            TaskManager::new(diagnostics.clone()).with_trigger_source(triggers.clone());
        Self { manager, triggers, diagnostics }
    }
}

/// Callback state counting runs and overlap.
#[derive(Debug, Default)]
pub struct Runs {
    started: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Runs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub async fn record(&self, hold: Duration) {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(hold).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Wait until a synchronous `condition` holds or `timeout` passes.
pub async fn eventually(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    poll_until(timeout, Duration::from_millis(20), || std::future::ready(condition())).await
}
