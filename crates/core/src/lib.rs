// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rsb-core: domain types shared by the executor and the bridge

pub mod macros;

pub mod batch;
pub mod clock;
pub mod id;
pub mod job;

pub use batch::{BatchError, BatchResult, CommandBatch, CommandResult};
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{short, JobId};
pub use job::{iso8601, Job, JobStatus};
