// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP listener for bridge connections.
//!
//! Every accepted connection gets its own task. Within a connection requests
//! are answered strictly in order; a connection that stays silent longer than
//! the idle timeout is closed.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rsb_core::CommandBatch;
use rsb_wire::{line, ErrorReply, ProtocolError, Request, Response, RunReply};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::registry::JobRegistry;
use crate::runner::run_batch;
use crate::shell::{preview, Shell};

/// Shared executor context for all connections.
pub struct ListenCtx {
    pub registry: Arc<JobRegistry>,
    pub shell: Arc<dyn Shell>,
    pub idle_timeout: Duration,
}

impl ListenCtx {
    pub fn new(shell: Arc<dyn Shell>, idle_timeout: Duration) -> Self {
        Self { registry: Arc::new(JobRegistry::new()), shell, idle_timeout }
    }
}

/// Listener task for accepting bridge connections.
pub struct Listener {
    tcp: TcpListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Listener {
    pub fn new(tcp: TcpListener, ctx: Arc<ListenCtx>) -> Self {
        Self { tcp, ctx }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.tcp.local_addr()
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn ctx(&self) -> &Arc<ListenCtx> {
        &self.ctx
    }

    /// Accept connections forever.
    pub async fn run(self) {
        self.run_until(CancellationToken::new()).await
    }

    /// Accept connections until `shutdown` is cancelled.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn run_until(self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("listener shutting down");
                    return;
                }
                result = self.tcp.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            info!(%addr, "client connected");
                            let ctx = Arc::clone(&self.ctx);
                            tokio::spawn(async move {
                                let (reader, writer) = stream.into_split();
                                if let Err(e) = handle_connection(reader, writer, &ctx).await {
                                    log_connection_error(e);
                                }
                                info!(%addr, "client disconnected");
                            });
                        }
                        Err(e) => error!("TCP accept error: {}", e),
                    }
                }
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        ConnectionError::Protocol(ProtocolError::Timeout) => {
            warn!("Client idle timeout, closing connection")
        }
        _ => error!("Connection error: {}", e),
    }
}

/// Serve one bridge connection until it closes, times out, or fails.
pub async fn handle_connection<R, W>(
    reader: R,
    mut writer: W,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    loop {
        let frame = line::read_frame_timeout(&mut reader, ctx.idle_timeout).await?;
        let frame = frame.trim();
        if frame.is_empty() {
            continue;
        }

        let response = handle_request(frame, ctx).await;
        line::write_message(&mut writer, &response).await?;
    }
}

/// Answer a single request line.
pub async fn handle_request(frame: &str, ctx: &ListenCtx) -> Response {
    let request = match Request::from_line(frame) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejecting request");
            return e.into();
        }
    };

    match request {
        Request::Run { batch, run_async: true } => {
            debug!(commands = batch.len(), first = %first_preview(&batch), "async run");
            Response::Job(ctx.registry.submit(Arc::clone(&ctx.shell), batch))
        }
        Request::Run { batch, run_async: false } => {
            debug!(commands = batch.len(), first = %first_preview(&batch), "sync run");
            let result = run_batch(ctx.shell.as_ref(), &batch).await;
            Response::Run(RunReply::from_batch(result))
        }
        Request::Status { job_id } => {
            debug!(job_id = job_id.short(8), "status poll");
            match ctx.registry.snapshot(job_id.as_str()) {
                Some(reply) => Response::Job(reply),
                None => Response::Error(ErrorReply::not_found(job_id.as_str())),
            }
        }
    }
}

fn first_preview(batch: &CommandBatch) -> String {
    batch.iter().next().map(|c| preview(c)).unwrap_or_default()
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
