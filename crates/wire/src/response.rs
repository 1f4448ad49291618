// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Responses from the executor to the bridge.

use std::time::Instant;

use rsb_core::{iso8601, BatchResult, CommandResult, Job, JobId, JobStatus};
use serde::{Deserialize, Serialize};

use crate::request::RequestError;

/// Error code for malformed requests.
pub const CODE_BAD_REQUEST: i32 = 2;
/// Error code for unknown job ids.
pub const CODE_NOT_FOUND: i32 = 3;

/// Status reported by a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatus {
    Invalid,
    NotFound,
}

rsb_core::simple_display! {
    ErrorStatus {
        Invalid => "invalid",
        NotFound => "not_found",
    }
}

/// Outcome of a synchronous run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReply {
    pub ok: bool,
    pub status: JobStatus,
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
    pub command_count: usize,
    pub results: Vec<CommandResult>,
}

impl RunReply {
    pub fn from_batch(batch: BatchResult) -> Self {
        Self {
            ok: batch.ok,
            status: JobStatus::from_ok(batch.ok),
            command_count: batch.command_count(),
            stdout: batch.stdout,
            stderr: batch.stderr,
            code: batch.code,
            results: batch.results,
        }
    }
}

/// Job acceptance or job status snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobReply {
    pub ok: bool,
    pub status: JobStatus,
    pub job_id: JobId,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub command_count: usize,
    /// Present only while the job is running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<f64>,
    /// Present only once the job is terminal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BatchResult>,
}

impl JobReply {
    /// Reply sent when an async run is accepted.
    pub fn accepted(job: &Job) -> Self {
        Self {
            ok: true,
            status: JobStatus::Running,
            job_id: job.id.clone(),
            started_at: iso8601(&job.started_at),
            finished_at: None,
            command_count: job.command_count,
            elapsed_seconds: None,
            result: None,
        }
    }

    /// Point-in-time view of a job.
    pub fn snapshot(job: &Job, now: Instant) -> Self {
        let running = job.status == JobStatus::Running;
        Self {
            ok: job.status != JobStatus::Failed,
            status: job.status,
            job_id: job.id.clone(),
            started_at: iso8601(&job.started_at),
            finished_at: job.finished_at.as_ref().map(iso8601),
            command_count: job.command_count,
            elapsed_seconds: running.then(|| job.elapsed(now).as_secs_f64()),
            result: if running { None } else { job.result.clone() },
        }
    }
}

/// Rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub ok: bool,
    pub status: ErrorStatus,
    #[serde(default)]
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

impl ErrorReply {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: ErrorStatus::Invalid,
            stdout: String::new(),
            stderr: message.into(),
            code: CODE_BAD_REQUEST,
        }
    }

    pub fn not_found(job_id: &str) -> Self {
        Self {
            ok: false,
            status: ErrorStatus::NotFound,
            stdout: String::new(),
            stderr: format!("Unknown job_id '{job_id}'"),
            code: CODE_NOT_FOUND,
        }
    }
}

/// Any executor response.
///
/// Untagged: variants are told apart by their fields (`results` for runs,
/// `job_id` for jobs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Run(RunReply),
    Job(JobReply),
    Error(ErrorReply),
}

impl Response {
    pub fn ok(&self) -> bool {
        match self {
            Response::Run(r) => r.ok,
            Response::Job(j) => j.ok,
            Response::Error(e) => e.ok,
        }
    }

    pub fn status(&self) -> String {
        match self {
            Response::Run(r) => r.status.to_string(),
            Response::Job(j) => j.status.to_string(),
            Response::Error(e) => e.status.to_string(),
        }
    }

    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Response::Job(j) => Some(&j.job_id),
            _ => None,
        }
    }

    pub fn command_count(&self) -> Option<usize> {
        match self {
            Response::Run(r) => Some(r.command_count),
            Response::Job(j) => Some(j.command_count),
            Response::Error(_) => None,
        }
    }

    pub fn stdout(&self) -> &str {
        match self {
            Response::Run(r) => &r.stdout,
            Response::Job(_) => "",
            Response::Error(e) => &e.stdout,
        }
    }

    pub fn stderr(&self) -> &str {
        match self {
            Response::Run(r) => &r.stderr,
            Response::Job(_) => "",
            Response::Error(e) => &e.stderr,
        }
    }
}

impl From<RequestError> for Response {
    fn from(e: RequestError) -> Self {
        Response::Error(ErrorReply::invalid(e.to_string()))
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
