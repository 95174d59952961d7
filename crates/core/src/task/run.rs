//! The guarded task and its run entry points

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use taskguard_common::time::format_seconds;
use tracing::debug;

use super::context::TaskContext;
use super::error::CallbackError;
use super::guard::RunSlot;
use crate::ports::{FireCallback, JobId};

/// Asynchronous work owned by a [`Task`]. Success carries no value.
pub type TaskCallback = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Outcome of [`Task::initiate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initiation {
    /// The callback ran to completion.
    Completed { duration: Duration },
    /// Another run was in flight; the callback was not invoked.
    Busy { elapsed: Duration },
}

impl Initiation {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}

/// A named unit of asynchronous work that never overlaps with itself.
///
/// Tasks are created through [`TaskManager::create_task`] and shared as
/// `Arc<Task>`. Calling [`initiate`](Task::initiate) while a run is in flight
/// does not queue a second run: the call returns [`Initiation::Busy`] and a
/// warning goes to the manager's diagnostic sink.
///
/// [`TaskManager::create_task`]: super::TaskManager::create_task
pub struct Task {
    identifier: String,
    callback: TaskCallback,
    slot: RunSlot,
    pub(crate) context: Arc<TaskContext>,
    jobs: Mutex<Vec<JobId>>,
    this: Weak<Task>,
}

impl Task {
    pub(crate) fn new(
        identifier: String,
        callback: TaskCallback,
        context: Arc<TaskContext>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            identifier,
            callback,
            slot: RunSlot::new(),
            context,
            jobs: Mutex::new(Vec::new()),
            this: this.clone(),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// True while a callback invocation is in flight.
    pub fn is_running(&self) -> bool {
        self.slot.is_running()
    }

    /// Time since the in-flight run started, or `None` while idle.
    pub fn running_for(&self) -> Option<Duration> {
        self.slot.started().map(|started| self.context.clock.since(started))
    }

    /// Jobs registered through [`schedule`](Task::schedule) and not yet
    /// stopped.
    pub fn scheduled_jobs(&self) -> Vec<JobId> {
        self.jobs.lock().clone()
    }

    /// Run the callback unless a run is already in flight.
    ///
    /// The run slot is freed when the callback finishes, fails, panics, or
    /// when this future is dropped before completion. A callback error is
    /// returned only after the slot is free, so the next call can start a
    /// fresh run.
    pub async fn initiate(&self) -> Result<Initiation, CallbackError> {
        let guard = match self.slot.try_acquire(self.context.clock.as_ref()) {
            Ok(guard) => guard,
            Err(started) => {
                let elapsed = self.context.clock.since(started);
                self.context.diagnostics.warn(&format!(
                    "Could not start task \"{}\" as it is currently running. The task has been running for {} seconds.",
                    self.identifier,
                    format_seconds(elapsed)
                ));
                return Ok(Initiation::Busy { elapsed });
            }
        };

        debug!(task = %self.identifier, "Task run started");
        let outcome = (self.callback)().await;
        let duration = self.context.clock.since(guard.started());
        drop(guard);

        match outcome {
            Ok(()) => {
                debug!(
                    task = %self.identifier,
                    duration_ms = duration.as_millis() as u64,
                    "Task run completed"
                );
                Ok(Initiation::Completed { duration })
            }
            Err(source) => {
                debug!(
                    task = %self.identifier,
                    duration_ms = duration.as_millis() as u64,
                    error = %source,
                    "Task run failed"
                );
                Err(CallbackError { identifier: self.identifier.clone(), source })
            }
        }
    }

    /// Run started by a trigger. Failures go to the diagnostic sink since
    /// there is no caller to return them to.
    pub(crate) async fn run_triggered(&self) {
        if let Err(err) = self.initiate().await {
            let cause: &(dyn Error + 'static) = err.source.as_ref();
            self.context
                .diagnostics
                .error(&format!("Task \"{}\" failed.", self.identifier), Some(cause));
        }
    }

    /// Callback handed to the trigger source. Holds the task weakly so a
    /// registered job does not keep it alive.
    pub(crate) fn fire_callback(&self) -> FireCallback {
        let this = self.this.clone();
        Arc::new(move || {
            let this = this.clone();
            async move {
                if let Some(task) = this.upgrade() {
                    task.run_triggered().await;
                }
            }
            .boxed()
        })
    }

    pub(crate) fn weak(&self) -> Weak<Task> {
        self.this.clone()
    }

    pub(crate) fn track_job(&self, job: JobId) {
        self.jobs.lock().push(job);
    }

    pub(crate) fn forget_job(&self, job: &JobId) {
        self.jobs.lock().retain(|tracked| tracked != job);
    }

    pub(crate) fn take_jobs(&self) -> Vec<JobId> {
        std::mem::take(&mut *self.jobs.lock())
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("identifier", &self.identifier)
            .field("running", &self.is_running())
            .field("scheduled_jobs", &self.jobs.lock().len())
            .finish_non_exhaustive()
    }
}
