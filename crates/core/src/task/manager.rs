//! Registry of uniquely named tasks

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::FutureExt;
use taskguard_common::time::Clock;
use taskguard_domain::{Result as DomainResult, TaskGuardError};
use tracing::{info, warn};

use super::context::TaskContext;
use super::error::DuplicateIdentifierError;
use super::run::{Task, TaskCallback};
use super::schedule::ScheduleDefaults;
use crate::ports::{DiagnosticSink, TriggerSource};

/// Owns the tasks of one application and the collaborators they share.
///
/// Configure the manager with the `with_*` builders before creating tasks;
/// tasks keep the collaborators that were set when they were created.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use taskguard_core::ports::DiagnosticSink;
/// # use taskguard_core::task::TaskManager;
/// # async fn example(diagnostics: Arc<dyn DiagnosticSink>) {
/// let manager = TaskManager::new(diagnostics);
/// let task = manager
///     .create_task("cleanup", || async { Ok(()) })
///     .expect("identifier is unique");
/// task.initiate().await.expect("cleanup succeeds");
/// # }
/// ```
pub struct TaskManager {
    tasks: DashMap<String, Arc<Task>>,
    context: Arc<TaskContext>,
}

impl TaskManager {
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self { tasks: DashMap::new(), context: Arc::new(TaskContext::new(diagnostics)) }
    }

    /// Clock used to stamp run starts and measure busy time.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        Arc::make_mut(&mut self.context).clock = clock;
        self
    }

    pub fn with_trigger_source(mut self, triggers: Arc<dyn TriggerSource>) -> Self {
        Arc::make_mut(&mut self.context).triggers = Some(triggers);
        self
    }

    pub fn with_defaults(mut self, defaults: ScheduleDefaults) -> Self {
        Arc::make_mut(&mut self.context).defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &ScheduleDefaults {
        &self.context.defaults
    }

    /// Register a task under a new identifier.
    ///
    /// Fails without touching the registry when the identifier is taken.
    pub fn create_task<F, Fut>(
        &self,
        identifier: impl Into<String>,
        callback: F,
    ) -> Result<Arc<Task>, DuplicateIdentifierError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let identifier = identifier.into();
        match self.tasks.entry(identifier) {
            Entry::Occupied(entry) => {
                warn!(task = %entry.key(), "Duplicate task identifier rejected");
                Err(DuplicateIdentifierError { identifier: entry.key().clone() })
            }
            Entry::Vacant(entry) => {
                let callback: TaskCallback = Arc::new(move || callback().boxed());
                let task = Task::new(entry.key().clone(), callback, self.context.clone());
                entry.insert(task.clone());
                info!(task = %task.identifier(), "Task created");
                Ok(task)
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<Arc<Task>> {
        self.tasks.get(identifier).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.tasks.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> =
            self.tasks.iter().map(|entry| entry.key().clone()).collect();
        identifiers.sort();
        identifiers
    }

    /// Cancel every job scheduled by this manager's tasks, then shut the
    /// trigger source down. Runs already in flight are left to finish.
    ///
    /// Every job is attempted; the first failure is returned.
    pub async fn shutdown(&self) -> DomainResult<()> {
        let Some(triggers) = self.context.triggers.clone() else {
            return Ok(());
        };

        // Collect first so no map shard lock is held across an await.
        let tasks: Vec<Arc<Task>> = self.tasks.iter().map(|entry| entry.value().clone()).collect();
        let mut first_error: Option<TaskGuardError> = None;
        let mut cancelled = 0usize;

        for task in tasks {
            for job in task.take_jobs() {
                match triggers.cancel(&job).await {
                    Ok(()) => cancelled += 1,
                    Err(err) => {
                        warn!(task = %task.identifier(), job = %job, error = %err, "Failed to cancel job");
                        first_error.get_or_insert(err.into());
                    }
                }
            }
        }

        if let Err(err) = triggers.shutdown().await {
            warn!(error = %err, "Failed to shut down trigger source");
            first_error.get_or_insert(err.into());
        }

        info!(cancelled, "Task manager shut down");
        first_error.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for TaskManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskManager")
            .field("tasks", &self.identifiers())
            .field("context", &self.context)
            .finish()
    }
}
