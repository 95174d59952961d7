//! Domain constants
//!
//! Centralized defaults for schedules and logging.

/// Default recurring expression: every five minutes.
pub const DEFAULT_CRON_EXPRESSION: &str = "*/5 * * * *";

/// Time zone keyword selecting the process-local zone.
pub const DEFAULT_TIME_ZONE: &str = "default";

/// Fire a freshly scheduled job once immediately.
pub const DEFAULT_RUN_ON_INIT: bool = true;

/// Default `EnvFilter` directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

// Environment variables read by the configuration loader
pub const ENV_DEFAULT_EXPRESSION: &str = "TASKGUARD_DEFAULT_EXPRESSION";
pub const ENV_TIME_ZONE: &str = "TASKGUARD_TIME_ZONE";
pub const ENV_RUN_ON_INIT: &str = "TASKGUARD_RUN_ON_INIT";
pub const ENV_LOG_FILTER: &str = "TASKGUARD_LOG_FILTER";
pub const ENV_LOG_FORMAT: &str = "TASKGUARD_LOG_FORMAT";
