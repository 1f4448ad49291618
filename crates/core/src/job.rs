// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Asynchronous job state machine.
//!
//! A job is created `running`, and is moved to `completed` or `failed` exactly
//! once when its batch finishes. Terminal jobs are never reopened.

use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::batch::BatchResult;
use crate::clock::Clock;
use crate::id::JobId;

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal status for a finished batch.
    pub fn from_ok(ok: bool) -> Self {
        if ok {
            JobStatus::Completed
        } else {
            JobStatus::Failed
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

crate::simple_display! {
    JobStatus {
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// Format a timestamp as ISO 8601 with an explicit UTC offset.
pub fn iso8601(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Tracked state of one asynchronous batch execution.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    /// Monotonic start time for elapsed-time reporting
    pub started: Instant,
    pub finished_at: Option<DateTime<Utc>>,
    pub command_count: usize,
    pub result: Option<BatchResult>,
}

impl Job {
    /// Create a running job.
    pub fn start(id: JobId, command_count: usize, clock: &impl Clock) -> Self {
        Self {
            id,
            status: JobStatus::Running,
            started_at: clock.utc_now(),
            started: clock.now(),
            finished_at: None,
            command_count,
            result: None,
        }
    }

    /// Attach the batch result and move to a terminal status.
    ///
    /// Returns `false` without modifying the job if it is already terminal.
    pub fn finish(&mut self, result: BatchResult, finished_at: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::from_ok(result.ok);
        self.finished_at = Some(finished_at);
        self.result = Some(result);
        true
    }

    /// Time since the job started, clamped at zero.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
