// tests/command_engine.rs
//
// End-to-end runs through a real shell command. Unix only: the commands
// below use POSIX sh.

#![cfg(unix)]

mod common;
use crate::common::init_tracing;

use std::path::PathBuf;
use std::sync::Arc;

use konawatch::config::RunnerOverrides;
use konawatch::engine::CommandEngine;
use konawatch::format::SummaryFormatter;
use konawatch::fs::mock::MockFileSystem;
use konawatch::runner::{RunOutcome, Runner};
use konawatch::types::{FormatterKind, NotifyStatus};
use konawatch_test_utils::fakes::{CallLog, RecordingNotifier};

fn runner_for(cmd: &str, fs: MockFileSystem) -> (Runner<CommandEngine, RecordingNotifier>, CallLog) {
    let dir = std::env::temp_dir();
    let engine = CommandEngine::new(cmd, dir, "config/environment").unwrap();
    let formatter = Box::new(SummaryFormatter::with_writer(
        FormatterKind::Quiet,
        Box::new(std::io::sink()),
    ));
    let log = CallLog::new();
    let notifier = RecordingNotifier::new(log.clone());

    let runner = Runner::new(&RunnerOverrides::default(), engine, formatter, notifier)
        .with_fs(Arc::new(fs));
    (runner, log)
}

#[tokio::test]
async fn passing_engine_run_is_summarised() {
    init_tracing();
    let (mut runner, log) = runner_for(
        "echo '..'; echo \"mode=$KONACHA_MODE\"; echo '2 examples, 0 failures'",
        MockFileSystem::new(),
    );

    let outcome = runner.run_all().await;

    assert_eq!(
        outcome,
        RunOutcome::Summary {
            line: "2 examples, 0 failures, 0 pending".to_string(),
            passed: true,
        }
    );
    assert_eq!(
        log.notifications(),
        vec![(
            "2 examples, 0 failures, 0 pending".to_string(),
            NotifyStatus::Success
        )]
    );
}

#[tokio::test]
async fn selected_suites_reach_the_command() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("spec/javascripts/1.js");
    fs.add_file("spec/javascripts/foo/bar.js");

    // Fail unless the command sees exactly the translated ids.
    let (mut runner, _log) = runner_for(
        "test \"$SPEC\" = '/1,/foo/bar' && test \"$KONACHA_MODE\" = runner && echo '2 examples, 0 failures'",
        fs,
    );

    let outcome = runner
        .run(&[
            PathBuf::from("spec/javascripts/1.js"),
            PathBuf::from("spec/javascripts/foo/bar.js"),
        ])
        .await;

    assert_eq!(outcome.status(), NotifyStatus::Success);
}

#[tokio::test]
async fn failing_engine_run_reports_failure_status() {
    init_tracing();
    let (mut runner, log) = runner_for(
        "echo 'F'; echo '1 example, 1 failure'; exit 1",
        MockFileSystem::new(),
    );

    let outcome = runner.run_all().await;

    assert_eq!(outcome.message(), "1 example, 1 failure, 0 pending");
    assert_eq!(log.notifications()[0].1, NotifyStatus::Failed);
}

#[tokio::test]
async fn unparseable_output_falls_back_to_exit_status() {
    init_tracing();
    let (mut runner, _log) = runner_for("echo 'rake aborted!'; exit 3", MockFileSystem::new());

    let outcome = runner.run_all().await;

    assert_eq!(
        outcome,
        RunOutcome::Summary {
            line: "engine exited with status 3".to_string(),
            passed: false,
        }
    );
}

#[tokio::test]
async fn non_utf8_output_does_not_lose_the_totals() {
    init_tracing();
    let (mut runner, log) = runner_for(
        "printf 'caf\\351 ok\\n'; echo '2 examples, 0 failures'",
        MockFileSystem::new(),
    );

    let outcome = runner.run_all().await;

    assert_eq!(
        outcome,
        RunOutcome::Summary {
            line: "2 examples, 0 failures, 0 pending".to_string(),
            passed: true,
        }
    );
    assert_eq!(log.notifications()[0].1, NotifyStatus::Success);
}
