// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote shell executor.
//!
//! Accepts bridge connections over TCP, runs command batches through a shell
//! capability, and tracks asynchronous batches as pollable jobs.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod registry;
pub mod runner;
pub mod shell;

pub use lifecycle::{startup, Config, LifecycleError};
pub use listener::{ListenCtx, Listener};
pub use registry::JobRegistry;
pub use runner::run_batch;
#[cfg(any(test, feature = "test-support"))]
pub use shell::FakeShell;
pub use shell::{Interpreter, ProcessShell, Shell};
