// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable renderings of executor responses.

use rsb_wire::Response;

use crate::session::SessionError;

/// Text for an async submission: status and job id.
///
/// Rejections have no job id and are rendered like a synchronous run so that
/// their stderr is not lost.
pub fn accepted_text(response: &Response) -> String {
    match response {
        Response::Job(job) => format!("status: {}\njob_id: {}", job.status, job.job_id),
        other => run_text(other),
    }
}

/// Text for a synchronous run.
pub fn run_text(response: &Response) -> String {
    execution_text(
        &response.status(),
        response.command_count(),
        response.stdout(),
        response.stderr(),
    )
}

/// Text for a job status poll.
///
/// `requested` names the job when the response does not carry an id.
pub fn status_text(requested: &str, response: &Response) -> String {
    let mut lines = Vec::new();
    match response {
        Response::Job(job) => {
            lines.push(format!("job_id: {}", job.job_id));
            lines.push(format!("status: {}", job.status));
            lines.push(format!("commands: {}", job.command_count));
            lines.push(format!("started_at: {}", job.started_at));
            if let Some(finished_at) = &job.finished_at {
                lines.push(format!("finished_at: {finished_at}"));
            }
            if let Some(elapsed) = job.elapsed_seconds {
                lines.push(format!("elapsed_seconds: {elapsed:.1}"));
            }
            if let Some(result) = &job.result {
                let status = job.status.to_string();
                lines.push(execution_text(&status, None, &result.stdout, &result.stderr));
            }
        }
        Response::Error(err) => {
            lines.push(format!("job_id: {requested}"));
            lines.push(format!("status: {}", err.status));
            if !err.stderr.is_empty() {
                lines.push(format!("[stderr]\n{}", err.stderr));
            }
        }
        Response::Run(_) => {
            lines.push(format!("job_id: {requested}"));
            lines.push(run_text(response));
        }
    }
    lines.join("\n")
}

/// Text reported when the executor could not be reached even after a retry.
pub fn transport_failure_text(err: &SessionError) -> String {
    format!("status: error\n[stderr]\n{err}")
}

fn execution_text(status: &str, command_count: Option<usize>, stdout: &str, stderr: &str) -> String {
    let mut header = format!("status: {status}");
    if let Some(count) = command_count {
        header.push_str(&format!(", commands: {count}"));
    }

    let mut sections = vec![header];
    let stdout = stdout.trim_end_matches('\n');
    let stderr = stderr.trim_end_matches('\n');
    if !stdout.is_empty() {
        sections.push(stdout.to_string());
    }
    if !stderr.is_empty() {
        sections.push(format!("[stderr]\n{stderr}"));
    }
    if sections.len() == 1 {
        sections.push("(no output)".to_string());
    }
    sections.join("\n")
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
