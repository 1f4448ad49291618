// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory registry of background jobs.
//!
//! Jobs live for the lifetime of the process. Every read and write goes
//! through one lock so a poll never sees a half-finished job.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rsb_core::{BatchResult, Clock, CommandBatch, Job, JobId, JobStatus, SystemClock};
use rsb_wire::JobReply;

use crate::runner::run_batch;
use crate::shell::Shell;

pub struct JobRegistry<C: Clock = SystemClock> {
    jobs: Mutex<HashMap<JobId, Job>>,
    clock: C,
}

impl JobRegistry<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for JobRegistry<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> JobRegistry<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { jobs: Mutex::new(HashMap::new()), clock }
    }

    /// Record a new running job and return a copy of it.
    pub fn register(&self, command_count: usize) -> Job {
        let job = Job::start(JobId::new(), command_count, &self.clock);
        self.jobs.lock().insert(job.id.clone(), job.clone());
        job
    }

    /// Store the final result of a job.
    ///
    /// Returns the new status, or `None` if the job is unknown or already
    /// terminal.
    pub fn complete(&self, id: &JobId, result: BatchResult) -> Option<JobStatus> {
        let finished_at = self.clock.utc_now();
        let mut jobs = self.jobs.lock();
        let job = jobs.get_mut(id)?;
        job.finish(result, finished_at).then_some(job.status)
    }

    pub fn snapshot(&self, id: &str) -> Option<JobReply> {
        let now = self.clock.now();
        self.jobs.lock().get(id).map(|job| JobReply::snapshot(job, now))
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }

    /// Start `batch` in the background and return the acceptance reply.
    ///
    /// The job is registered before this returns, so an immediate poll always
    /// finds it.
    pub fn submit(self: &Arc<Self>, shell: Arc<dyn Shell>, batch: CommandBatch) -> JobReply {
        let job = self.register(batch.len());
        let reply = JobReply::accepted(&job);
        tracing::info!(job_id = %job.id, commands = batch.len(), "job started");

        let registry = Arc::clone(self);
        let id = job.id;
        tokio::spawn(async move {
            let result = run_batch(shell.as_ref(), &batch).await;
            match registry.complete(&id, result) {
                Some(status) => tracing::info!(job_id = %id, %status, "job finished"),
                None => tracing::warn!(job_id = %id, "job finished twice or vanished"),
            }
        });

        reply
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
