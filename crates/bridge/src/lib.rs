// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller-facing bridge.
//!
//! Speaks JSON-RPC tool calls on stdin/stdout and forwards them to a remote
//! executor over a reconnecting TCP session.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod discovery;
pub mod env;
pub mod format;
pub mod server;
pub mod session;
pub mod tools;

pub use server::{RpcError, Server};
pub use session::{Session, SessionConfig, SessionError, Transport};
