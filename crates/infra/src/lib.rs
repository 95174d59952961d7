//! # TaskGuard Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The cron trigger source (`tokio-cron-scheduler`)
//! - The `tracing` diagnostic sink and subscriber setup
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements traits defined in `taskguard-core`
//! - Contains all "impure" code (timers, global subscriber, file I/O)

pub mod bootstrap;
pub mod config;
pub mod observability;
pub mod scheduling;

// Re-export commonly used items
pub use observability::{init_logging, TracingDiagnostics};
pub use scheduling::{CronTriggerSource, SchedulerError, SchedulerResult};
