// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the executor crate.

use std::time::Duration;

/// Default listener port, shared with the bridge's default.
pub const DEFAULT_PORT: u16 = 8765;

/// Bind host: RSB_LISTEN_HOST > 0.0.0.0
pub fn listen_host() -> String {
    std::env::var("RSB_LISTEN_HOST")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "0.0.0.0".to_string())
}

/// Bind port: RSB_LISTEN_PORT > 8765
pub fn listen_port() -> u16 {
    std::env::var("RSB_LISTEN_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Seconds a client connection may stay idle before it is closed (default 300s).
pub fn idle_timeout() -> Duration {
    std::env::var("RSB_IDLE_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(Duration::from_secs(300))
}

/// Interpreter executable tried before the built-in candidates.
pub fn shell_override() -> Option<String> {
    std::env::var("RSB_SHELL").ok().filter(|s| !s.is_empty())
}

/// Tracing filter directive (default "info").
pub fn log_filter() -> String {
    std::env::var("RSB_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
