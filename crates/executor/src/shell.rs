// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell capability: run one command, capture exit code and output.

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use rsb_core::CommandResult;

/// Exit code reported when no interpreter could be found.
pub const NOT_FOUND_CODE: i32 = 127;
/// Exit code reported when an interpreter exists but could not be started.
pub const SPAWN_FAILED_CODE: i32 = 126;

const PREVIEW_LIMIT: usize = 160;

/// Executes a single opaque command string.
///
/// Implementations never fail: invocation problems are folded into a failing
/// [`CommandResult`] so that a batch always runs to the end.
#[async_trait]
pub trait Shell: Send + Sync + 'static {
    async fn run(&self, command: &str) -> CommandResult;
}

/// An interpreter program plus the arguments placed before the command text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub program: String,
    pub args: Vec<String>,
}

impl Interpreter {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self { program: program.into(), args: args.iter().map(|a| a.to_string()).collect() }
    }

    /// PowerShell invocation: `-NoProfile -NonInteractive -Command <command>`.
    pub fn powershell(program: impl Into<String>) -> Self {
        Self::new(program, &["-NoProfile", "-NonInteractive", "-Command"])
    }

    /// Pick the invocation style from the executable name: PowerShell-family
    /// programs get PowerShell flags, anything else is run as `<exe> -c`.
    pub fn detect(program: &str) -> Self {
        // Split on both separators so Windows paths work on any host.
        let name = program.rsplit(['/', '\\']).next().unwrap_or(program).to_ascii_lowercase();
        if name.starts_with("pwsh") || name.starts_with("powershell") {
            Self::powershell(program)
        } else {
            Self::new(program, &["-c"])
        }
    }
}

/// Runs commands as child processes, trying interpreters in order until one
/// can be spawned.
#[derive(Debug, Clone)]
pub struct ProcessShell {
    candidates: Vec<Interpreter>,
}

impl ProcessShell {
    /// Optional override executable, then `pwsh`, then `powershell.exe`.
    pub fn new(override_exe: Option<&str>) -> Self {
        let mut candidates = Vec::new();
        if let Some(exe) = override_exe {
            candidates.push(Interpreter::detect(exe));
        }
        candidates.push(Interpreter::powershell("pwsh"));
        candidates.push(Interpreter::powershell("powershell.exe"));
        Self { candidates }
    }

    pub fn with_interpreters(candidates: Vec<Interpreter>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[Interpreter] {
        &self.candidates
    }
}

#[async_trait]
impl Shell for ProcessShell {
    async fn run(&self, command: &str) -> CommandResult {
        tracing::info!(command = %preview(command), "running command");

        for interpreter in &self.candidates {
            let mut cmd = tokio::process::Command::new(&interpreter.program);
            cmd.args(&interpreter.args).arg(command).stdin(Stdio::null());

            match cmd.output().await {
                Ok(output) => {
                    let code = output.status.code().unwrap_or(-1);
                    tracing::info!(
                        program = %interpreter.program,
                        code,
                        stdout_bytes = output.stdout.len(),
                        stderr_bytes = output.stderr.len(),
                        "command finished"
                    );
                    return CommandResult::from_exit(
                        code,
                        String::from_utf8_lossy(&output.stdout),
                        String::from_utf8_lossy(&output.stderr),
                    );
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(program = %interpreter.program, "interpreter not found");
                }
                Err(e) => {
                    tracing::error!(program = %interpreter.program, error = %e, "shell execution failed");
                    return CommandResult::invocation_failure(
                        SPAWN_FAILED_CODE,
                        format!("Shell execution failed ({}): {e}", interpreter.program),
                    );
                }
            }
        }

        let tried: Vec<&str> = self.candidates.iter().map(|i| i.program.as_str()).collect();
        tracing::error!(tried = ?tried, "no shell interpreter available");
        CommandResult::invocation_failure(
            NOT_FOUND_CODE,
            format!("No shell executable found (tried {}).", tried.join(", ")),
        )
    }
}

/// Single-line, length-limited rendering of a command for log output.
pub fn preview(command: &str) -> String {
    let one_line = command.lines().collect::<Vec<_>>().join(" ");
    let one_line = one_line.trim();
    if one_line.chars().count() <= PREVIEW_LIMIT {
        return one_line.to_string();
    }
    let mut cut: String = one_line.chars().take(PREVIEW_LIMIT - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use rsb_core::CommandResult;
    use tokio::sync::Semaphore;

    use super::Shell;

    /// Scripted shell for tests.
    ///
    /// Commands without a scripted result succeed with empty output. A gated
    /// shell blocks every command until [`FakeShell::release`] hands out a
    /// permit, which lets tests observe jobs while they are still running.
    #[derive(Clone, Default)]
    pub struct FakeShell {
        results: Arc<Mutex<HashMap<String, CommandResult>>>,
        calls: Arc<Mutex<Vec<String>>>,
        gate: Option<Arc<Semaphore>>,
    }

    impl FakeShell {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn gated() -> Self {
            Self { gate: Some(Arc::new(Semaphore::new(0))), ..Self::default() }
        }

        pub fn with_result(self, command: &str, code: i32, stdout: &str, stderr: &str) -> Self {
            self.results
                .lock()
                .insert(command.to_string(), CommandResult::from_exit(code, stdout, stderr));
            self
        }

        /// Allow `n` blocked commands to proceed.
        pub fn release(&self, n: usize) {
            if let Some(gate) = &self.gate {
                gate.add_permits(n);
            }
        }

        /// Commands run so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Shell for FakeShell {
        async fn run(&self, command: &str) -> CommandResult {
            if let Some(gate) = &self.gate {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }
            self.calls.lock().push(command.to_string());
            self.results
                .lock()
                .get(command)
                .cloned()
                .unwrap_or_else(|| CommandResult::from_exit(0, "", ""))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeShell;

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
