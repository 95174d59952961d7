//! Integration tests for tasks scheduled on the cron trigger source
//!
//! These tests run against the real scheduler and wall-clock time.

mod support;

use std::time::Duration;

use chrono::{Datelike, Timelike, Utc, Weekday};
use support::{eventually, CronHarness, Runs};
use taskguard_core::ScheduleOptions;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_every_second_schedule_fires_task() {
    let harness = CronHarness::start().await;
    let runs = Runs::new();
    let counter = runs.clone();
    let task = harness
        .manager
        .create_task("poll", move || {
            let counter = counter.clone();
            async move {
                counter.record(Duration::ZERO).await;
                Ok(())
            }
        })
        .unwrap();

    task.schedule(ScheduleOptions::new("* * * * * *").run_on_init(false)).await.unwrap();

    assert!(eventually(Duration::from_secs(4), || runs.started() >= 2).await);
    harness.manager.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_task_never_overlaps_its_own_schedule() {
    let harness = CronHarness::start().await;
    let runs = Runs::new();
    let counter = runs.clone();
    let task = harness
        .manager
        .create_task("sync", move || {
            let counter = counter.clone();
            async move {
                counter.record(Duration::from_millis(2500)).await;
                Ok(())
            }
        })
        .unwrap();

    task.schedule(ScheduleOptions::new("* * * * * *").run_on_init(true)).await.unwrap();

    let diagnostics = harness.diagnostics.clone();
    assert!(eventually(Duration::from_secs(5), || !diagnostics.warnings().is_empty()).await);
    assert_eq!(runs.max_in_flight(), 1);
    assert!(diagnostics.warnings()[0]
        .starts_with("Could not start task \"sync\" as it is currently running."));

    harness.manager.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_on_init_fires_before_first_tick() {
    let harness = CronHarness::start().await;
    let runs = Runs::new();
    let counter = runs.clone();
    let task = harness
        .manager
        .create_task("cleanup", move || {
            let counter = counter.clone();
            async move {
                counter.record(Duration::ZERO).await;
                Ok(())
            }
        })
        .unwrap();

    // Yearly: only the initial run can happen during the test.
    task.schedule(ScheduleOptions::new("0 0 1 1 *")).await.unwrap();

    assert!(eventually(Duration::from_secs(2), || runs.started() == 1).await);
    harness.manager.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_default_schedule_in_local_zone_has_next_fire() {
    let harness = CronHarness::start().await;
    let task = harness.manager.create_task("sync", || async { Ok(()) }).unwrap();

    let handle = task
        .schedule(ScheduleOptions::new("*/5 * * * *").run_on_init(false))
        .await
        .unwrap();

    let next = handle.next_fire().await.expect("job should have a next tick");
    assert!(next > Utc::now());
    assert!(next <= Utc::now() + chrono::Duration::minutes(5));
    assert_eq!(next.second(), 0);

    harness.manager.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_named_time_zone_is_honoured() {
    let harness = CronHarness::start().await;
    let task = harness.manager.create_task("report", || async { Ok(()) }).unwrap();

    let handle = task
        .schedule(ScheduleOptions::new("0 9 * * *").in_time_zone("Asia/Tokyo").run_on_init(false))
        .await
        .unwrap();

    // 09:00 in Tokyo (UTC+9, no DST) is midnight UTC.
    let next = handle.next_fire().await.expect("job should have a next tick");
    assert_eq!((next.hour(), next.minute()), (0, 0));

    harness.manager.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unix_weekday_forms_fire_on_the_right_days() {
    let harness = CronHarness::start().await;
    let task = harness.manager.create_task("report", || async { Ok(()) }).unwrap();

    let cases: [(&str, &[Weekday]); 4] = [
        ("0 9 * * 7-7", &[Weekday::Sun]),
        ("0 9 * * 1/2", &[Weekday::Mon, Weekday::Wed, Weekday::Fri]),
        ("0 9 * * 1-7/2", &[Weekday::Mon, Weekday::Wed, Weekday::Fri, Weekday::Sun]),
        ("0 9 * * 5-7", &[Weekday::Fri, Weekday::Sat, Weekday::Sun]),
    ];

    for (expression, days) in cases {
        let handle = task
            .schedule(ScheduleOptions::new(expression).in_time_zone("UTC").run_on_init(false))
            .await
            .unwrap_or_else(|err| panic!("{expression} should schedule: {err}"));

        let next = handle.next_fire().await.expect("job should have a next tick");
        assert!(days.contains(&next.weekday()), "{expression} next fires on {}", next.weekday());
        assert_eq!((next.hour(), next.minute()), (9, 0));
        handle.stop().await.unwrap();
    }

    assert!(harness.diagnostics.errors().is_empty());
    harness.manager.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_out_of_range_expression_is_reported() {
    let harness = CronHarness::start().await;
    let task = harness.manager.create_task("cleanup", || async { Ok(()) }).unwrap();

    let err = task.schedule(ScheduleOptions::new("61 * * * *")).await.unwrap_err();

    assert!(err.is_invalid_expression());
    assert_eq!(harness.diagnostics.errors()[0].message, "Failed to start job.");
    assert_eq!(harness.triggers.job_count(), 0);
    harness.manager.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stopped_job_no_longer_fires() {
    let harness = CronHarness::start().await;
    let runs = Runs::new();
    let counter = runs.clone();
    let task = harness
        .manager
        .create_task("poll", move || {
            let counter = counter.clone();
            async move {
                counter.record(Duration::ZERO).await;
                Ok(())
            }
        })
        .unwrap();

    let handle = task.schedule(ScheduleOptions::new("* * * * * *")).await.unwrap();
    assert!(eventually(Duration::from_secs(3), || runs.started() >= 1).await);

    handle.stop().await.unwrap();
    assert_eq!(handle.next_fire().await, None);
    assert!(task.scheduled_jobs().is_empty());

    // Let any tick that was already dispatched finish.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let after_stop = runs.started();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(runs.started(), after_stop);

    harness.manager.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_cancels_every_job() {
    let harness = CronHarness::start().await;
    for id in ["cleanup", "poll", "sync"] {
        let task = harness.manager.create_task(id, || async { Ok(()) }).unwrap();
        task.schedule(ScheduleOptions::new("0 * * * *").run_on_init(false)).await.unwrap();
    }
    assert_eq!(harness.triggers.job_count(), 3);

    harness.manager.shutdown().await.unwrap();

    assert_eq!(harness.triggers.job_count(), 0);
    assert!(!harness.triggers.is_running());
}
