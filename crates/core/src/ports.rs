//! Port interfaces for task scheduling and diagnostics
//!
//! These traits define the boundaries between the task core and the
//! infrastructure that fires triggers and records diagnostics.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use taskguard_domain::{TaskGuardError, TimeZoneSpec};
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a job registered with a [`TriggerSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Callback a trigger source invokes on every occurrence.
///
/// The returned future performs the triggered run. Sources must drive it to
/// completion without holding up later occurrences.
pub type FireCallback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// What to register with a trigger source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    /// Recurring expression in Unix cron syntax (5 fields, or 6 with seconds).
    pub expression: String,
    pub time_zone: TimeZoneSpec,
    /// Fire once immediately after registration.
    pub run_on_init: bool,
}

/// Errors raised by a trigger source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TriggerError {
    #[error("Invalid recurring expression {expression:?}: {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("Trigger source rejected the job: {0}")]
    Rejected(String),

    #[error("Trigger source is shut down")]
    Closed,
}

impl From<TriggerError> for TaskGuardError {
    fn from(err: TriggerError) -> Self {
        match err {
            TriggerError::InvalidExpression { .. } => Self::InvalidInput(err.to_string()),
            TriggerError::Rejected(_) | TriggerError::Closed => Self::Scheduling(err.to_string()),
        }
    }
}

/// Capability that fires callbacks according to recurring time expressions.
#[async_trait]
pub trait TriggerSource: Send + Sync {
    /// Register `on_fire` to run on every occurrence of `request`.
    async fn register(
        &self,
        request: TriggerRequest,
        on_fire: FireCallback,
    ) -> Result<JobId, TriggerError>;

    /// Stop a registered job. Cancelling an unknown or already cancelled job
    /// succeeds.
    async fn cancel(&self, job: &JobId) -> Result<(), TriggerError>;

    /// Next time the job is due, if it is still registered.
    async fn next_fire(&self, job: &JobId) -> Option<DateTime<Utc>>;

    /// Stop firing all jobs.
    async fn shutdown(&self) -> Result<(), TriggerError>;
}

/// Sink for operator-facing diagnostics. Fire and forget.
pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, message: &str);

    fn error(&self, message: &str, cause: Option<&(dyn Error + 'static)>);
}
