//! Cron-backed trigger source
//!
//! Adapts `tokio-cron-scheduler` to the core [`TriggerSource`] port. Every
//! registered job shares one [`JobScheduler`]; each occurrence spawns the
//! fire callback so the engine never waits on a task run.
//!
//! # Example
//!
//! ```no_run
//! use taskguard_infra::scheduling::{CronTriggerSource, SchedulerResult};
//!
//! # async fn example() -> SchedulerResult<()> {
//! let triggers = CronTriggerSource::new().await?;
//! triggers.start().await?;
//! // ... register jobs through a TaskManager ...
//! triggers.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use parking_lot::Mutex;
use taskguard_common::time::normalize_cron;
use taskguard_core::{FireCallback, JobId, TriggerError, TriggerRequest, TriggerSource};
use taskguard_domain::TimeZoneSpec;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Timeouts for the scheduler lifecycle.
#[derive(Debug, Clone)]
pub struct CronTriggerConfig {
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for shutting the scheduler down.
    pub stop_timeout: Duration,
}

impl Default for CronTriggerConfig {
    fn default() -> Self {
        Self { start_timeout: Duration::from_secs(5), stop_timeout: Duration::from_secs(5) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running,
    ShutDown,
}

/// Trigger source firing jobs on cron schedules.
///
/// Accepts standard 5-field expressions (`min hour dom mon dow`) as well as
/// 6 and 7 field expressions with seconds and year. Jobs can be registered
/// before [`start`](Self::start); they fire once the scheduler runs.
pub struct CronTriggerSource {
    scheduler: Arc<RwLock<JobScheduler>>,
    config: CronTriggerConfig,
    jobs: Mutex<HashSet<Uuid>>,
    lifecycle: Mutex<Lifecycle>,
}

impl CronTriggerSource {
    /// Create a source with the default configuration.
    pub async fn new() -> SchedulerResult<Self> {
        Self::with_config(CronTriggerConfig::default()).await
    }

    /// Create a source with a custom configuration.
    pub async fn with_config(config: CronTriggerConfig) -> SchedulerResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|err| SchedulerError::CreationFailed(format!("{err:?}")))?;

        Ok(Self {
            scheduler: Arc::new(RwLock::new(scheduler)),
            config,
            jobs: Mutex::new(HashSet::new()),
            lifecycle: Mutex::new(Lifecycle::Idle),
        })
    }

    /// Start firing registered jobs.
    #[instrument(skip(self))]
    pub async fn start(&self) -> SchedulerResult<()> {
        match *self.lifecycle.lock() {
            Lifecycle::Running => return Err(SchedulerError::AlreadyRunning),
            Lifecycle::ShutDown => return Err(SchedulerError::ShutDown),
            Lifecycle::Idle => {}
        }

        let scheduler = self.scheduler.clone();
        let start_timeout = self.config.start_timeout;
        tokio::time::timeout(start_timeout, async move {
            let guard = scheduler.write().await;
            guard.start().await
        })
        .await
        .map_err(|_| SchedulerError::Timeout { seconds: start_timeout.as_secs() })?
        .map_err(|err| SchedulerError::StartFailed(format!("{err:?}")))?;

        *self.lifecycle.lock() = Lifecycle::Running;
        info!("Cron trigger source started");
        Ok(())
    }

    /// Stop the scheduler. Registered jobs stop firing and the source
    /// rejects new registrations. Stopping twice is a no-op; a stop that
    /// failed or timed out can be retried.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> SchedulerResult<()> {
        if *self.lifecycle.lock() == Lifecycle::ShutDown {
            return Ok(());
        }

        let scheduler = self.scheduler.clone();
        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, async move {
            let mut guard = scheduler.write().await;
            guard.shutdown().await
        })
        .await
        .map_err(|_| SchedulerError::Timeout { seconds: stop_timeout.as_secs() })?
        .map_err(|err| SchedulerError::StopFailed(format!("{err:?}")))?;

        *self.lifecycle.lock() = Lifecycle::ShutDown;
        let dropped = std::mem::take(&mut *self.jobs.lock()).len();
        info!(dropped_jobs = dropped, "Cron trigger source stopped");
        Ok(())
    }

    /// True between a successful [`start`](Self::start) and
    /// [`stop`](Self::stop).
    pub fn is_running(&self) -> bool {
        *self.lifecycle.lock() == Lifecycle::Running
    }

    /// Number of registered jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.lock().len()
    }

    async fn add_job(&self, request: &TriggerRequest, on_fire: FireCallback) -> SchedulerResult<Uuid> {
        if *self.lifecycle.lock() == Lifecycle::ShutDown {
            return Err(SchedulerError::ShutDown);
        }

        let schedule = normalize_cron(&request.expression).map_err(|err| {
            SchedulerError::InvalidExpression {
                expression: request.expression.clone(),
                reason: err.to_string(),
            }
        })?;

        let job = build_job(&schedule, request.time_zone, on_fire.clone()).map_err(|err| {
            SchedulerError::InvalidExpression {
                expression: request.expression.clone(),
                reason: format!("{err:?}"),
            }
        })?;

        let job_id = job.guid();
        let scheduler = self.scheduler.write().await;
        scheduler
            .add(job)
            .await
            .map_err(|err| SchedulerError::JobRegistrationFailed(format!("{err:?}")))?;
        drop(scheduler);

        self.jobs.lock().insert(job_id);
        debug!(
            expression = %request.expression,
            schedule = %schedule,
            time_zone = %request.time_zone,
            job_id = %job_id,
            "Registered cron job"
        );

        if request.run_on_init {
            tokio::spawn(on_fire());
        }

        Ok(job_id)
    }

    async fn remove_job(&self, job_id: Uuid) -> SchedulerResult<()> {
        if !self.jobs.lock().contains(&job_id) {
            return Ok(());
        }

        let scheduler = self.scheduler.write().await;
        scheduler
            .remove(&job_id)
            .await
            .map_err(|err| SchedulerError::JobRemovalFailed(format!("{err:?}")))?;
        drop(scheduler);

        // Tracked until the engine lets go, so a failed removal can be retried.
        self.jobs.lock().remove(&job_id);
        debug!(job_id = %job_id, "Removed cron job");
        Ok(())
    }
}

/// Build an engine job that spawns `on_fire` on every tick.
fn build_job(
    schedule: &str,
    time_zone: TimeZoneSpec,
    on_fire: FireCallback,
) -> Result<Job, tokio_cron_scheduler::JobSchedulerError> {
    match time_zone.tz() {
        Some(tz) => Job::new_async_tz(schedule, tz, move |_id, _scheduler| {
            let on_fire = on_fire.clone();
            Box::pin(async move {
                tokio::spawn(on_fire());
            })
        }),
        None => Job::new_async_tz(schedule, Local, move |_id, _scheduler| {
            let on_fire = on_fire.clone();
            Box::pin(async move {
                tokio::spawn(on_fire());
            })
        }),
    }
}

#[async_trait]
impl TriggerSource for CronTriggerSource {
    async fn register(
        &self,
        request: TriggerRequest,
        on_fire: FireCallback,
    ) -> Result<JobId, TriggerError> {
        Ok(JobId::new(self.add_job(&request, on_fire).await?))
    }

    async fn cancel(&self, job: &JobId) -> Result<(), TriggerError> {
        Ok(self.remove_job(job.as_uuid()).await?)
    }

    async fn next_fire(&self, job: &JobId) -> Option<DateTime<Utc>> {
        let job_id = job.as_uuid();
        if !self.jobs.lock().contains(&job_id) {
            return None;
        }

        let mut scheduler = self.scheduler.write().await;
        match scheduler.next_tick_for_job(job_id).await {
            Ok(next) => next,
            Err(err) => {
                warn!(job_id = %job_id, error = ?err, "Failed to read next tick");
                None
            }
        }
    }

    async fn shutdown(&self) -> Result<(), TriggerError> {
        Ok(self.stop().await?)
    }
}

impl fmt::Debug for CronTriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CronTriggerSource")
            .field("config", &self.config)
            .field("lifecycle", &*self.lifecycle.lock())
            .field("jobs", &self.jobs.lock().len())
            .finish_non_exhaustive()
    }
}

impl Drop for CronTriggerSource {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("CronTriggerSource dropped while running; jobs stop with the scheduler");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;
    use taskguard_common::testing::poll_until;

    use super::*;

    fn counting_callback(counter: Arc<AtomicUsize>) -> FireCallback {
        Arc::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    }

    fn request(expression: &str, run_on_init: bool) -> TriggerRequest {
        TriggerRequest {
            expression: expression.into(),
            time_zone: TimeZoneSpec::Default,
            run_on_init,
        }
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let source = CronTriggerSource::new().await.unwrap();
        source.start().await.unwrap();

        assert!(matches!(source.start().await, Err(SchedulerError::AlreadyRunning)));

        source.stop().await.unwrap();
        assert!(!source.is_running());
    }

    #[tokio::test]
    async fn test_invalid_expression_is_rejected_before_engine() {
        let source = CronTriggerSource::new().await.unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let err = source
            .register(request("every day", false), counting_callback(counter.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, TriggerError::InvalidExpression { .. }));
        assert_eq!(source.job_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_unknown_job_is_ok() {
        let source = CronTriggerSource::new().await.unwrap();
        let unknown = JobId::new(Uuid::new_v4());

        source.cancel(&unknown).await.unwrap();
        assert_eq!(source.next_fire(&unknown).await, None);
    }

    #[tokio::test]
    async fn test_register_after_shutdown_is_closed() {
        let source = CronTriggerSource::new().await.unwrap();
        source.shutdown().await.unwrap();

        let counter = Arc::new(AtomicUsize::new(0));
        let err = source
            .register(request("0 0 * * *", false), counting_callback(counter))
            .await
            .unwrap_err();
        assert_eq!(err, TriggerError::Closed);
    }

    #[tokio::test]
    async fn test_cancel_keeps_job_until_engine_removes_it() {
        let source = CronTriggerSource::new().await.unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let job = source
            .register(request("0 0 * * *", false), counting_callback(counter))
            .await
            .unwrap();

        let engine = source.scheduler.clone();
        let held = engine.write().await;
        let cancel = source.cancel(&job);
        tokio::pin!(cancel);
        assert!(tokio::time::timeout(Duration::from_millis(50), &mut cancel).await.is_err());
        assert_eq!(source.job_count(), 1);

        drop(held);
        cancel.await.unwrap();
        assert_eq!(source.job_count(), 0);
    }

    #[tokio::test]
    async fn test_timed_out_stop_can_be_retried() {
        let config = CronTriggerConfig {
            stop_timeout: Duration::from_millis(50),
            ..CronTriggerConfig::default()
        };
        let source = CronTriggerSource::with_config(config).await.unwrap();
        source.start().await.unwrap();

        let engine = source.scheduler.clone();
        let held = engine.write().await;
        assert!(matches!(source.stop().await, Err(SchedulerError::Timeout { .. })));
        assert!(source.is_running());

        drop(held);
        source.stop().await.unwrap();
        assert!(!source.is_running());
        assert!(matches!(source.start().await, Err(SchedulerError::ShutDown)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_on_init_fires_immediately() {
        let source = CronTriggerSource::new().await.unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        // Yearly schedule: only the initial run can fire during the test.
        source
            .register(request("0 0 1 1 *", true), counting_callback(counter.clone()))
            .await
            .unwrap();

        let fired = poll_until(Duration::from_secs(2), Duration::from_millis(10), || {
            let counter = counter.clone();
            async move { counter.load(Ordering::SeqCst) == 1 }
        })
        .await;
        assert!(fired);
        source.stop().await.unwrap();
    }
}
