//! Test doubles for the core ports
//!
//! Available to unit tests and, through the `test-utils` feature, to
//! downstream integration tests.

use std::collections::HashMap;
use std::error::Error;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use taskguard_common::time::normalize_cron;
use uuid::Uuid;

use crate::ports::{DiagnosticSink, FireCallback, JobId, TriggerError, TriggerRequest, TriggerSource};

/// An error reported to [`RecordingDiagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedError {
    pub message: String,
    /// Display text of the cause, if one was given.
    pub cause: Option<String>,
}

/// Diagnostic sink that keeps everything it receives.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<RecordedError>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    pub fn errors(&self) -> Vec<RecordedError> {
        self.errors.lock().clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn warn(&self, message: &str) {
        self.warnings.lock().push(message.to_string());
    }

    fn error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        self.errors.lock().push(RecordedError {
            message: message.to_string(),
            cause: cause.map(|cause| cause.to_string()),
        });
    }
}

struct ManualJob {
    request: TriggerRequest,
    on_fire: FireCallback,
}

/// Trigger source that fires only when told to.
///
/// Expressions are validated the same way the cron adapter validates them.
/// `run_on_init` is recorded but not acted on; call [`fire`](Self::fire) to
/// simulate any occurrence.
#[derive(Default)]
pub struct ManualTrigger {
    jobs: Mutex<HashMap<JobId, ManualJob>>,
    rejection: Mutex<Option<String>>,
    next_fire: Mutex<Option<DateTime<Utc>>>,
    shut_down: Mutex<bool>,
}

impl ManualTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every later registration with `reason`.
    pub fn reject_with(&self, reason: impl Into<String>) {
        *self.rejection.lock() = Some(reason.into());
    }

    /// Time reported by `next_fire` for registered jobs.
    pub fn set_next_fire(&self, at: DateTime<Utc>) {
        *self.next_fire.lock() = Some(at);
    }

    /// Invoke a job's callback. Returns the run, or `None` for unknown jobs.
    pub fn fire(&self, job: &JobId) -> Option<BoxFuture<'static, ()>> {
        self.jobs.lock().get(job).map(|registered| (registered.on_fire)())
    }

    pub fn request(&self, job: &JobId) -> Option<TriggerRequest> {
        self.jobs.lock().get(job).map(|registered| registered.request.clone())
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_shut_down(&self) -> bool {
        *self.shut_down.lock()
    }
}

#[async_trait]
impl TriggerSource for ManualTrigger {
    async fn register(
        &self,
        request: TriggerRequest,
        on_fire: FireCallback,
    ) -> Result<JobId, TriggerError> {
        if self.is_shut_down() {
            return Err(TriggerError::Closed);
        }
        normalize_cron(&request.expression).map_err(|err| TriggerError::InvalidExpression {
            expression: request.expression.clone(),
            reason: err.to_string(),
        })?;
        if let Some(reason) = self.rejection.lock().clone() {
            return Err(TriggerError::Rejected(reason));
        }

        let job = JobId::new(Uuid::new_v4());
        self.jobs.lock().insert(job, ManualJob { request, on_fire });
        Ok(job)
    }

    async fn cancel(&self, job: &JobId) -> Result<(), TriggerError> {
        self.jobs.lock().remove(job);
        Ok(())
    }

    async fn next_fire(&self, job: &JobId) -> Option<DateTime<Utc>> {
        if self.jobs.lock().contains_key(job) {
            *self.next_fire.lock()
        } else {
            None
        }
    }

    async fn shutdown(&self) -> Result<(), TriggerError> {
        self.jobs.lock().clear();
        *self.shut_down.lock() = true;
        Ok(())
    }
}
