// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential batch execution.

use rsb_core::{BatchResult, CommandBatch};

use crate::shell::Shell;

/// Run every command of `batch` in order and aggregate the results.
///
/// A failing command never stops the batch.
pub async fn run_batch(shell: &dyn Shell, batch: &CommandBatch) -> BatchResult {
    let mut results = Vec::with_capacity(batch.len());
    for (index, command) in batch.iter().enumerate() {
        let result = shell.run(command).await;
        tracing::debug!(index, code = result.code, ok = result.ok, "batch command done");
        results.push(result);
    }

    let aggregated = BatchResult::aggregate(results);
    tracing::info!(
        commands = aggregated.command_count(),
        ok = aggregated.ok,
        code = aggregated.code,
        "batch finished"
    );
    aggregated
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
