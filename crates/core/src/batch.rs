// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command batches and their aggregated results.
//!
//! A batch is executed one command at a time, in order. Each command yields a
//! [`CommandResult`]; [`BatchResult::aggregate`] folds them into the single
//! result reported back to callers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a [`CommandBatch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("a command batch must contain at least one command")]
    Empty,
}

/// Ordered, non-empty sequence of opaque command strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBatch(Vec<String>);

impl CommandBatch {
    pub fn new(commands: Vec<String>) -> Result<Self, BatchError> {
        if commands.is_empty() {
            return Err(BatchError::Empty);
        }
        Ok(Self(commands))
    }

    /// Batch holding exactly one command.
    pub fn single(command: impl Into<String>) -> Self {
        Self(vec![command.into()])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    // Never true; present for clippy's len_without_is_empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn commands(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a CommandBatch {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of running one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub ok: bool,
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
    /// Position within the batch (set by [`BatchResult::aggregate`])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl CommandResult {
    /// Result of a process that ran to completion with `code`.
    pub fn from_exit(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self { ok: code == 0, stdout: stdout.into(), stderr: stderr.into(), code, index: None }
    }

    /// Result of a command whose interpreter could not be invoked at all.
    pub fn invocation_failure(code: i32, stderr: impl Into<String>) -> Self {
        Self { ok: false, stdout: String::new(), stderr: stderr.into(), code, index: None }
    }
}

/// Aggregated outcome of a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub ok: bool,
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
    pub results: Vec<CommandResult>,
}

impl BatchResult {
    /// Fold per-command results, given in batch order.
    ///
    /// `ok` is true only if every command succeeded, and `code` is the first
    /// non-zero exit code. A single result is mirrored verbatim; otherwise the
    /// non-empty outputs are concatenated under `[command <i> stdout]` /
    /// `[command <i> stderr]` labels.
    pub fn aggregate(mut results: Vec<CommandResult>) -> Self {
        for (idx, result) in results.iter_mut().enumerate() {
            result.index = Some(idx);
        }

        let ok = results.iter().all(|r| r.ok);
        let code = results.iter().map(|r| r.code).find(|&c| c != 0).unwrap_or(0);

        if let [only] = results.as_slice() {
            return Self {
                ok,
                stdout: only.stdout.clone(),
                stderr: only.stderr.clone(),
                code: only.code,
                results,
            };
        }

        let stdout = labeled_sections(&results, "stdout", |r| &r.stdout);
        let stderr = labeled_sections(&results, "stderr", |r| &r.stderr);
        Self { ok, stdout, stderr, code, results }
    }

    pub fn command_count(&self) -> usize {
        self.results.len()
    }
}

fn labeled_sections(
    results: &[CommandResult],
    stream: &str,
    select: impl Fn(&CommandResult) -> &String,
) -> String {
    let sections: Vec<String> = results
        .iter()
        .enumerate()
        .filter(|(_, r)| !select(r).is_empty())
        .map(|(idx, r)| format!("[command {idx} {stream}]\n{}", select(r).trim_end()))
        .collect();

    if sections.is_empty() {
        String::new()
    } else {
        let mut joined = sections.join("\n\n");
        joined.push('\n');
        joined
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
