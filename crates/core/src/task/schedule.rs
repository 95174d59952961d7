//! Binding tasks to recurring triggers

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use taskguard_domain::constants::{DEFAULT_CRON_EXPRESSION, DEFAULT_RUN_ON_INIT};
use taskguard_domain::{SchedulerConfig, TimeZoneSpec};
use tracing::info;

use super::error::ScheduleError;
use super::run::Task;
use crate::ports::{JobId, TriggerError, TriggerRequest, TriggerSource};

/// Values used for any option a [`ScheduleOptions`] leaves unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDefaults {
    pub expression: String,
    pub time_zone: TimeZoneSpec,
    pub run_on_init: bool,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        Self {
            expression: DEFAULT_CRON_EXPRESSION.to_string(),
            time_zone: TimeZoneSpec::Default,
            run_on_init: DEFAULT_RUN_ON_INIT,
        }
    }
}

impl From<&SchedulerConfig> for ScheduleDefaults {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            expression: config.default_expression.clone(),
            time_zone: config.default_time_zone,
            run_on_init: config.run_on_init,
        }
    }
}

/// How to schedule a task. Unset fields fall back to the manager's
/// [`ScheduleDefaults`].
///
/// # Examples
///
/// ```
/// use taskguard_core::task::ScheduleOptions;
///
/// let options = ScheduleOptions::new("0 3 * * *")
///     .in_time_zone("Europe/Berlin")
///     .run_on_init(false);
/// assert_eq!(options.expression(), Some("0 3 * * *"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleOptions {
    expression: Option<String>,
    time_zone: Option<String>,
    run_on_init: Option<bool>,
}

impl ScheduleOptions {
    pub fn new(expression: impl Into<String>) -> Self {
        Self { expression: Some(expression.into()), ..Self::default() }
    }

    /// Evaluate the expression in an IANA zone. `"default"` selects the
    /// process-local zone. Unknown names fail at schedule time.
    pub fn in_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    pub fn run_on_init(mut self, run_on_init: bool) -> Self {
        self.run_on_init = Some(run_on_init);
        self
    }

    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    pub fn time_zone(&self) -> Option<&str> {
        self.time_zone.as_deref()
    }

    fn resolve(self, defaults: &ScheduleDefaults) -> Result<TriggerRequest, ScheduleError> {
        let time_zone = match self.time_zone {
            Some(name) => match name.parse::<TimeZoneSpec>() {
                Ok(spec) => spec,
                Err(_) => return Err(ScheduleError::UnknownTimeZone(name)),
            },
            None => defaults.time_zone,
        };

        Ok(TriggerRequest {
            expression: self.expression.unwrap_or_else(|| defaults.expression.clone()),
            time_zone,
            run_on_init: self.run_on_init.unwrap_or(defaults.run_on_init),
        })
    }
}

impl Task {
    /// Fire [`initiate`](Task::initiate) on every occurrence of a recurring
    /// expression.
    ///
    /// Runs started by the trigger go through the same guard as direct
    /// calls, so an occurrence that lands during a run is dropped with a
    /// busy warning. Failures are reported to the diagnostic sink as
    /// `Failed to start job.` and returned.
    pub async fn schedule(&self, options: ScheduleOptions) -> Result<JobHandle, ScheduleError> {
        match self.try_schedule(options).await {
            Ok(handle) => Ok(handle),
            Err(err) => {
                self.context.diagnostics.error("Failed to start job.", Some(&err));
                Err(err)
            }
        }
    }

    /// Schedule with the manager's defaults.
    pub async fn schedule_default(&self) -> Result<JobHandle, ScheduleError> {
        self.schedule(ScheduleOptions::default()).await
    }

    async fn try_schedule(&self, options: ScheduleOptions) -> Result<JobHandle, ScheduleError> {
        let triggers = self.context.triggers.clone().ok_or(ScheduleError::NoTriggerSource)?;
        let request = options.resolve(&self.context.defaults)?;
        let expression = request.expression.clone();
        let time_zone = request.time_zone;

        let job = triggers.register(request, self.fire_callback()).await?;
        self.track_job(job);

        info!(
            task = %self.identifier(),
            job = %job,
            expression = %expression,
            time_zone = %time_zone,
            "Task scheduled"
        );

        Ok(JobHandle {
            job,
            task_identifier: self.identifier().to_string(),
            expression,
            time_zone,
            task: self.weak(),
            triggers,
        })
    }
}

/// A registered recurring job.
pub struct JobHandle {
    job: JobId,
    task_identifier: String,
    expression: String,
    time_zone: TimeZoneSpec,
    task: Weak<Task>,
    triggers: Arc<dyn TriggerSource>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.job
    }

    pub fn task_identifier(&self) -> &str {
        &self.task_identifier
    }

    /// Expression as given, before any normalization by the trigger source.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn time_zone(&self) -> TimeZoneSpec {
        self.time_zone
    }

    /// Remove the job from its trigger source. A run already in flight is
    /// left to finish. Stopping twice is a no-op.
    pub async fn stop(&self) -> Result<(), TriggerError> {
        self.triggers.cancel(&self.job).await?;
        if let Some(task) = self.task.upgrade() {
            task.forget_job(&self.job);
        }
        info!(task = %self.task_identifier, job = %self.job, "Job stopped");
        Ok(())
    }

    /// Next time the job is due, or `None` once it is stopped.
    pub async fn next_fire(&self) -> Option<DateTime<Utc>> {
        self.triggers.next_fire(&self.job).await
    }
}

impl fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobHandle")
            .field("job", &self.job)
            .field("task_identifier", &self.task_identifier)
            .field("expression", &self.expression)
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}
