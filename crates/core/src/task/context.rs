//! Collaborators shared by a manager and every task it creates

use std::fmt;
use std::sync::Arc;

use taskguard_common::time::{Clock, SystemClock};

use super::schedule::ScheduleDefaults;
use crate::ports::{DiagnosticSink, TriggerSource};

#[derive(Clone)]
pub(crate) struct TaskContext {
    pub(crate) diagnostics: Arc<dyn DiagnosticSink>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) triggers: Option<Arc<dyn TriggerSource>>,
    pub(crate) defaults: ScheduleDefaults,
}

impl TaskContext {
    pub(crate) fn new(diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            diagnostics,
            clock: Arc::new(SystemClock),
            triggers: None,
            defaults: ScheduleDefaults::default(),
        }
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("has_trigger_source", &self.triggers.is_some())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
