//! # TaskGuard Core
//!
//! Overlap-free task execution with optional recurring triggers.
//!
//! This crate contains:
//! - [`task::Task`]: a named async callback that never runs concurrently with
//!   itself
//! - [`task::TaskManager`]: the registry enforcing unique identifiers
//! - Port interfaces for trigger sources and diagnostics
//!
//! ## Architecture Principles
//! - Only depends on `taskguard-common` and `taskguard-domain`
//! - No scheduling engine or logging backend
//! - All external dependencies via traits in [`ports`]

pub mod ports;
pub mod task;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use ports::{DiagnosticSink, FireCallback, JobId, TriggerError, TriggerRequest, TriggerSource};
pub use task::{
    CallbackError, DuplicateIdentifierError, Initiation, JobHandle, ScheduleDefaults,
    ScheduleError, ScheduleOptions, Task, TaskManager,
};
