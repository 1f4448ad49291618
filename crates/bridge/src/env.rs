// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the bridge crate.

use std::time::Duration;

/// Default executor port.
pub const DEFAULT_PORT: u16 = 8765;

/// Preferred executor host: RSB_EXECUTOR_HOST
pub fn executor_host() -> Option<String> {
    std::env::var("RSB_EXECUTOR_HOST").ok().filter(|s| !s.is_empty())
}

/// Executor port: RSB_EXECUTOR_PORT > 8765
pub fn executor_port() -> u16 {
    std::env::var("RSB_EXECUTOR_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Extra candidate hosts: RSB_EXECUTOR_HOSTS (comma separated)
pub fn executor_hosts() -> Vec<String> {
    std::env::var("RSB_EXECUTOR_HOSTS")
        .map(|s| {
            s.split(',').map(str::trim).filter(|h| !h.is_empty()).map(str::to_string).collect()
        })
        .unwrap_or_default()
}

/// Per-attempt connect timeout (default 2000ms)
pub fn connect_timeout() -> Duration {
    millis("RSB_CONNECT_TIMEOUT_MS", 2000)
}

/// Pause between full passes over the candidate list (default 1000ms)
pub fn reconnect_backoff() -> Duration {
    millis("RSB_RECONNECT_BACKOFF_MS", 1000)
}

/// Tracing filter directive (default "info").
pub fn log_filter() -> String {
    std::env::var("RSB_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

fn millis(var: &str, default: u64) -> Duration {
    let ms = std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).unwrap_or(default);
    Duration::from_millis(ms)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
