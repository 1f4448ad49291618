// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocols spoken by the bridge and the executor.
//!
//! - Executor protocol (bridge ↔ executor): one JSON object per `\n`-terminated
//!   line, in both directions. See [`line`], [`request`] and [`response`].
//! - Controller protocol (controller ↔ bridge): JSON-RPC messages in either
//!   `Content-Length` header framing or line framing, detected per message.
//!   See [`framing`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
pub mod framing;
pub mod line;
mod request;
mod response;

pub use error::ProtocolError;
pub use framing::{Framing, Inbound};
pub use request::{extract_batch, is_truthy, RawRequest, Request, RequestError};
pub use response::{
    ErrorReply, ErrorStatus, JobReply, Response, RunReply, CODE_BAD_REQUEST, CODE_NOT_FOUND,
};
