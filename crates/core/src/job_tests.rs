// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::batch::CommandResult;
use crate::clock::FakeClock;

fn batch(code: i32) -> BatchResult {
    BatchResult::aggregate(vec![CommandResult::from_exit(code, "out", "")])
}

#[test]
fn new_job_is_running_without_result() {
    let clock = FakeClock::new();
    let job = Job::start(JobId::new(), 2, &clock);
    assert_eq!(job.status, JobStatus::Running);
    assert!(job.finished_at.is_none());
    assert!(job.result.is_none());
    assert_eq!(job.command_count, 2);
}

#[yare::parameterized(
    success = { 0, JobStatus::Completed },
    failure = { 1, JobStatus::Failed },
)]
fn finish_sets_terminal_status(code: i32, expected: JobStatus) {
    let clock = FakeClock::new();
    let mut job = Job::start(JobId::new(), 1, &clock);
    assert!(job.finish(batch(code), clock.utc_now()));
    assert_eq!(job.status, expected);
    assert!(job.finished_at.is_some());
    assert_eq!(job.result.as_ref().map(|r| r.code), Some(code));
}

#[test]
fn terminal_job_is_never_reopened() {
    let clock = FakeClock::new();
    let mut job = Job::start(JobId::new(), 1, &clock);
    assert!(job.finish(batch(0), clock.utc_now()));
    assert!(!job.finish(batch(5), clock.utc_now()));
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.result.as_ref().map(|r| r.code), Some(0));
}

#[test]
fn elapsed_follows_clock() {
    let clock = FakeClock::new();
    let job = Job::start(JobId::new(), 1, &clock);
    clock.advance(Duration::from_millis(2500));
    assert_eq!(job.elapsed(clock.now()), Duration::from_millis(2500));
}

#[test]
fn status_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&JobStatus::Completed).unwrap(), r#""completed""#);
    assert_eq!(JobStatus::Failed.to_string(), "failed");
}

#[test]
fn iso8601_includes_utc_offset() {
    let clock = FakeClock::new();
    assert_eq!(iso8601(&clock.utc_now()), "1970-01-01T00:00:00.000000+00:00");
}
