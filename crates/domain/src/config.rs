//! Configuration structures
//!
//! Every field has a default, so partial files and partial environments are
//! valid configuration sources.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CRON_EXPRESSION, DEFAULT_LOG_FILTER, DEFAULT_RUN_ON_INIT,
};
use crate::types::{LogFormat, TimeZoneSpec};

/// Configuration for the application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied when a task is scheduled without explicit options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Recurring expression used by `Task::schedule_default`.
    pub default_expression: String,
    /// Zone the default expression is evaluated in.
    pub default_time_zone: TimeZoneSpec,
    /// Fire a job once as soon as it is registered.
    pub run_on_init: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_expression: DEFAULT_CRON_EXPRESSION.to_string(),
            default_time_zone: TimeZoneSpec::Default,
            run_on_init: DEFAULT_RUN_ON_INIT,
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string(), format: LogFormat::default() }
    }
}
