// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnecting TCP session to the executor.
//!
//! The session connects lazily, keeps the connection cached between requests,
//! and after a transport failure reconnects and retries the in-flight request
//! exactly once.

use std::time::Duration;

use async_trait::async_trait;
use rsb_wire::{line, ProtocolError, RawRequest, Request, Response};
use thiserror::Error;
use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::discovery::{self, FALLBACK_HOSTS};
use crate::env;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("executor request failed after reconnecting: {0}")]
    RetryExhausted(ProtocolError),
}

/// Sends executor requests and returns their responses.
#[async_trait]
pub trait Transport: Send {
    async fn request(&mut self, request: &Request) -> Result<Response, SessionError>;
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Host tried before any discovered address
    pub override_host: Option<String>,
    pub port: u16,
    /// Limit for a single connect attempt
    pub connect_timeout: Duration,
    /// Pause after every candidate has failed
    pub backoff: Duration,
    /// Consult `RSB_EXECUTOR_HOSTS` and the system network files
    pub discover: bool,
    pub fallback_hosts: Vec<String>,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            override_host: env::executor_host(),
            port: env::executor_port(),
            connect_timeout: env::connect_timeout(),
            backoff: env::reconnect_backoff(),
            discover: true,
            fallback_hosts: FALLBACK_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Config that only ever tries `host:port`.
    pub fn fixed(host: impl Into<String>, port: u16) -> Self {
        Self {
            override_host: Some(host.into()),
            port,
            connect_timeout: env::connect_timeout(),
            backoff: env::reconnect_backoff(),
            discover: false,
            fallback_hosts: Vec::new(),
        }
    }

    /// Ordered, de-duplicated hosts for one connect pass.
    pub fn candidates(&self) -> Vec<String> {
        let discovered = if self.discover { discovery::discover_hosts() } else { Vec::new() };
        discovery::candidate_hosts(
            self.override_host
                .as_deref()
                .into_iter()
                .chain(discovered.iter().map(String::as_str))
                .chain(self.fallback_hosts.iter().map(String::as_str)),
        )
    }
}

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    host: String,
}

impl Connection {
    async fn round_trip(&mut self, request: &RawRequest) -> Result<Response, ProtocolError> {
        line::write_message(&mut self.writer, request).await?;
        line::read_message(&mut self.reader).await
    }
}

pub struct Session {
    config: SessionConfig,
    conn: Option<Connection>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config, conn: None }
    }

    #[cfg(test)]
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Host of the cached connection, if any.
    #[cfg(test)]
    pub fn connected_host(&self) -> Option<&str> {
        self.conn.as_ref().map(|c| c.host.as_str())
    }

    /// Try every candidate until one accepts, sleeping between passes.
    ///
    /// Never gives up.
    async fn connect(&self) -> Connection {
        let mut pass: u64 = 0;
        loop {
            pass += 1;
            let hosts = self.config.candidates();
            for host in &hosts {
                let target = (host.as_str(), self.config.port);
                match tokio::time::timeout(self.config.connect_timeout, TcpStream::connect(target))
                    .await
                {
                    Ok(Ok(stream)) => {
                        info!(host = %host, port = self.config.port, "connected to executor");
                        let (reader, writer) = stream.into_split();
                        return Connection {
                            reader: BufReader::new(reader),
                            writer,
                            host: host.clone(),
                        };
                    }
                    Ok(Err(e)) => debug!(host = %host, error = %e, "connect failed"),
                    Err(_) => debug!(host = %host, "connect timed out"),
                }
            }
            if pass == 1 || pass % 30 == 0 {
                warn!(hosts = ?hosts, port = self.config.port, pass, "executor unreachable, retrying");
            }
            tokio::time::sleep(self.config.backoff).await;
        }
    }
}

#[async_trait]
impl Transport for Session {
    async fn request(&mut self, request: &Request) -> Result<Response, SessionError> {
        let raw = RawRequest::from(request);

        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.connect().await,
        };
        match conn.round_trip(&raw).await {
            Ok(response) => {
                self.conn = Some(conn);
                return Ok(response);
            }
            Err(e) => warn!(host = %conn.host, error = %e, "executor connection lost, reconnecting"),
        }
        drop(conn);

        let mut conn = self.connect().await;
        let response = conn.round_trip(&raw).await.map_err(SessionError::RetryExhausted)?;
        self.conn = Some(conn);
        Ok(response)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
