//! Example: a slow job on a fast schedule
//!
//! Schedules a task that takes three seconds on a one-second schedule. The
//! log shows one run at a time, with a busy warning for every tick that
//! lands during a run.
//!
//! Run this example:
//!
//! ```bash
//! cargo run -p taskguard-infra --example overlapping_sync
//! ```

use std::time::Duration;

use taskguard_core::ScheduleOptions;
use taskguard_infra::{bootstrap, config, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load()?;
    init_logging(&config.logging)?;

    let manager = bootstrap::task_manager(&config).await?;
    let task = manager.create_task("sync", || async {
        tracing::info!("Synchronizing");
        tokio::time::sleep(Duration::from_secs(3)).await;
        Ok(())
    })?;

    let handle = task.schedule(ScheduleOptions::new("* * * * * *")).await?;
    tracing::info!(job = %handle.id(), next = ?handle.next_fire().await, "Scheduled");

    tokio::time::sleep(Duration::from_secs(10)).await;
    manager.shutdown().await?;
    Ok(())
}
