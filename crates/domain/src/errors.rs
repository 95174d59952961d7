//! Error types used throughout the workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for TaskGuard
///
/// Crate-specific errors (`DuplicateIdentifierError`, `ScheduleError`,
/// `SchedulerError`, ...) convert into this type when they cross a crate
/// boundary that only needs a message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TaskGuardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scheduling error: {0}")]
    Scheduling(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for TaskGuard operations
pub type Result<T> = std::result::Result<T, TaskGuardError>;
