//! Task error types

use taskguard_domain::TaskGuardError;
use thiserror::Error;

use crate::ports::TriggerError;

/// A task with the same identifier is already registered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("A task with the identifier \"{identifier}\" already exists.")]
pub struct DuplicateIdentifierError {
    pub identifier: String,
}

/// The task callback returned an error. The run guard was released before
/// this error was returned.
#[derive(Debug, Error)]
#[error("Task \"{identifier}\" failed: {source}")]
pub struct CallbackError {
    pub identifier: String,
    #[source]
    pub source: anyhow::Error,
}

/// Failure to attach a recurring trigger to a task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("No trigger source is configured")]
    NoTriggerSource,

    #[error("Unknown time zone {0:?}")]
    UnknownTimeZone(String),

    #[error(transparent)]
    Trigger(#[from] TriggerError),
}

impl ScheduleError {
    /// True when the recurring expression itself was rejected.
    pub fn is_invalid_expression(&self) -> bool {
        matches!(self, Self::Trigger(TriggerError::InvalidExpression { .. }))
    }
}

impl From<DuplicateIdentifierError> for TaskGuardError {
    fn from(err: DuplicateIdentifierError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<ScheduleError> for TaskGuardError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Trigger(inner) => inner.into(),
            ScheduleError::UnknownTimeZone(_) => Self::InvalidInput(err.to_string()),
            ScheduleError::NoTriggerSource => Self::Config(err.to_string()),
        }
    }
}

impl From<CallbackError> for TaskGuardError {
    fn from(err: CallbackError) -> Self {
        Self::Internal(format!("Task \"{}\" failed: {:#}", err.identifier, err.source))
    }
}
