//! Guarded tasks and their registry
//!
//! - [`TaskManager`]: creates tasks under unique identifiers
//! - [`Task`]: runs its callback at most once at a time
//! - [`JobHandle`]: a recurring trigger bound to a task

mod context;
pub mod error;
mod guard;
mod manager;
mod run;
mod schedule;

pub use error::{CallbackError, DuplicateIdentifierError, ScheduleError};
pub use manager::TaskManager;
pub use run::{Initiation, Task, TaskCallback};
pub use schedule::{JobHandle, ScheduleDefaults, ScheduleOptions};
