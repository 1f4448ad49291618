// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor startup.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::env;
use crate::listener::{ListenCtx, Listener};
use crate::shell::ProcessShell;

/// Executor configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Bind host
    pub host: String,
    /// Bind port (0 picks a free port)
    pub port: u16,
    /// Idle read timeout per client connection
    pub idle_timeout: Duration,
    /// Interpreter executable tried before the built-in candidates
    pub shell_override: Option<String>,
}

impl Config {
    /// Configuration from `RSB_*` environment variables and their defaults.
    pub fn from_env() -> Self {
        Self {
            host: env::listen_host(),
            port: env::listen_port(),
            idle_timeout: env::idle_timeout(),
            shell_override: env::shell_override(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to bind {0}: {1}")]
    BindFailed(String, std::io::Error),
}

/// Bind the listening socket and assemble the shared context.
///
/// The returned listener has not started accepting yet.
pub async fn startup(config: &Config) -> Result<Listener, LifecycleError> {
    let addr = config.bind_addr();
    let tcp = TcpListener::bind(addr.as_str())
        .await
        .map_err(|e| LifecycleError::BindFailed(addr.clone(), e))?;

    let shell = ProcessShell::new(config.shell_override.as_deref());
    let programs: Vec<&str> = shell.candidates().iter().map(|i| i.program.as_str()).collect();
    info!(
        addr = %addr,
        idle_timeout_secs = config.idle_timeout.as_secs_f64(),
        shells = ?programs,
        "executor ready"
    );

    let ctx = ListenCtx::new(Arc::new(shell), config.idle_timeout);
    Ok(Listener::new(tcp, Arc::new(ctx)))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
