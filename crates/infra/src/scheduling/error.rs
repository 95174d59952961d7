//! Scheduler error types

use taskguard_core::TriggerError;
use taskguard_domain::TaskGuardError;
use thiserror::Error;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler has been shut down
    #[error("Scheduler is shut down")]
    ShutDown,

    /// Failed to create scheduler
    #[error("Failed to create scheduler: {0}")]
    CreationFailed(String),

    /// Failed to start scheduler
    #[error("Failed to start scheduler: {0}")]
    StartFailed(String),

    /// Failed to stop scheduler
    #[error("Failed to stop scheduler: {0}")]
    StopFailed(String),

    /// The expression could not be turned into a schedule
    #[error("Invalid cron expression {expression:?}: {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// Failed to register job
    #[error("Failed to register job: {0}")]
    JobRegistrationFailed(String),

    /// Failed to remove job
    #[error("Failed to remove job: {0}")]
    JobRemovalFailed(String),

    /// Operation timed out
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl From<SchedulerError> for TriggerError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::InvalidExpression { expression, reason } => {
                TriggerError::InvalidExpression { expression, reason }
            }
            SchedulerError::ShutDown => TriggerError::Closed,
            other => TriggerError::Rejected(other.to_string()),
        }
    }
}

impl From<SchedulerError> for TaskGuardError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::AlreadyRunning | SchedulerError::InvalidExpression { .. } => {
                TaskGuardError::InvalidInput(err.to_string())
            }
            _ => TaskGuardError::Scheduling(err.to_string()),
        }
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
