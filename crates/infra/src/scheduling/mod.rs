//! Scheduling infrastructure for recurring task triggers
//!
//! [`CronTriggerSource`] implements the core `TriggerSource` port on top of
//! `tokio-cron-scheduler`. It follows the same runtime rules as the rest of
//! the crate:
//! - Explicit lifecycle management (start/stop)
//! - Timeout wrapping on engine start and shutdown
//! - Structured tracing on every state change

pub mod cron_trigger;
pub mod error;

pub use cron_trigger::{CronTriggerConfig, CronTriggerSource};
pub use error::{SchedulerError, SchedulerResult};
