// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requests from the bridge to the executor.

use rsb_core::{CommandBatch, JobId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Reasons a request is rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Missing or invalid 'command'/'commands'")]
    InvalidCommands,

    #[error("Missing or invalid 'job_id'")]
    InvalidJobId,

    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Malformed request: {0}")]
    Malformed(String),
}

/// Request exactly as it appears on the wire.
///
/// Every field is loosely typed so that validation can report precise errors
/// instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Value>,
    #[serde(default, rename = "async", skip_serializing_if = "Option::is_none")]
    pub run_async: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Value>,
}

/// Validated executor request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Run a batch, synchronously or as a background job
    Run { batch: CommandBatch, run_async: bool },
    /// Poll a background job
    Status { job_id: JobId },
}

impl Request {
    pub fn run(batch: CommandBatch, run_async: bool) -> Self {
        Request::Run { batch, run_async }
    }

    pub fn status(job_id: impl Into<JobId>) -> Self {
        Request::Status { job_id: job_id.into() }
    }

    /// Parse one line received on the executor wire.
    pub fn from_line(line: &str) -> Result<Self, RequestError> {
        let raw: RawRequest =
            serde_json::from_str(line).map_err(|e| RequestError::Malformed(e.to_string()))?;
        Self::try_from(raw)
    }
}

impl TryFrom<RawRequest> for Request {
    type Error = RequestError;

    fn try_from(raw: RawRequest) -> Result<Self, RequestError> {
        match raw.action.as_deref() {
            Some("status") => match raw.job_id {
                Some(Value::String(id)) if !id.is_empty() => Ok(Request::status(id)),
                _ => Err(RequestError::InvalidJobId),
            },
            None | Some("run") => {
                let batch = extract_batch(raw.command.as_ref(), raw.commands.as_ref())?;
                let run_async = raw.run_async.as_ref().is_some_and(is_truthy);
                Ok(Request::Run { batch, run_async })
            }
            Some(other) => Err(RequestError::UnknownAction(other.to_string())),
        }
    }
}

impl From<&Request> for RawRequest {
    fn from(request: &Request) -> Self {
        match request {
            Request::Run { batch, run_async } => {
                let (command, commands) = match batch.commands() {
                    [only] => (Some(Value::String(only.clone())), None),
                    many => (None, Some(Value::from(many.to_vec()))),
                };
                RawRequest {
                    action: Some("run".to_string()),
                    command,
                    commands,
                    run_async: Some(Value::Bool(*run_async)),
                    job_id: None,
                }
            }
            Request::Status { job_id } => RawRequest {
                action: Some("status".to_string()),
                job_id: Some(Value::String(job_id.to_string())),
                ..RawRequest::default()
            },
        }
    }
}

/// Resolve the `command` / `commands` pair into a batch.
///
/// A string `command` wins whenever present. Otherwise `commands` must be a
/// non-empty array made only of strings; any other element rejects the whole
/// request.
pub fn extract_batch(
    command: Option<&Value>,
    commands: Option<&Value>,
) -> Result<CommandBatch, RequestError> {
    if let Some(Value::String(command)) = command {
        return Ok(CommandBatch::single(command.clone()));
    }

    let Some(Value::Array(items)) = commands else {
        return Err(RequestError::InvalidCommands);
    };
    let commands = items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or(RequestError::InvalidCommands)?;
    CommandBatch::new(commands).map_err(|_| RequestError::InvalidCommands)
}

/// Loose truthiness for flags sent by dynamically typed clients.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
