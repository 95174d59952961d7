//! Wiring for a production [`TaskManager`]

use std::sync::Arc;

use taskguard_core::{ScheduleDefaults, TaskManager};
use taskguard_domain::{Config, Result};
use tracing::info;

use crate::observability::TracingDiagnostics;
use crate::scheduling::CronTriggerSource;

/// Build a manager backed by a started [`CronTriggerSource`] and
/// [`TracingDiagnostics`], with schedule defaults from `config`.
///
/// Call [`TaskManager::shutdown`] to stop the trigger source.
///
/// # Errors
/// Returns `TaskGuardError::Scheduling` if the scheduler cannot be created
/// or started.
pub async fn task_manager(config: &Config) -> Result<TaskManager> {
    let triggers = CronTriggerSource::new().await?;
    triggers.start().await?;

    info!(
        default_expression = %config.scheduler.default_expression,
        default_time_zone = %config.scheduler.default_time_zone,
        run_on_init = config.scheduler.run_on_init,
        "Task manager ready"
    );

    Ok(TaskManager::new(Arc::new(TracingDiagnostics::new()))
        .with_trigger_source(Arc::new(triggers))
        .with_defaults(ScheduleDefaults::from(&config.scheduler)))
}
