//! Tracing subscriber bootstrap

use taskguard_domain::{LogFormat, LoggingConfig, TaskGuardError};
use thiserror::Error;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

impl From<LoggingError> for TaskGuardError {
    fn from(err: LoggingError) -> Self {
        match err {
            LoggingError::InvalidFilter { .. } => TaskGuardError::Config(err.to_string()),
            LoggingError::AlreadyInitialized => TaskGuardError::Internal(err.to_string()),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter` when set. Fails with
/// [`LoggingError::AlreadyInitialized`] if another subscriber was installed
/// first, which callers may treat as success.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;

    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    };

    result.map_err(|_| LoggingError::AlreadyInitialized)
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.filter).map_err(|err| LoggingError::InvalidFilter {
        filter: config.filter.clone(),
        reason: err.to_string(),
    })
}
