// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC tool server for the controller.
//!
//! Messages are handled one at a time: the next controller message is not
//! read until the executor round trip for the current one has finished.

use rsb_wire::framing;
use rsb_wire::{ProtocolError, Request};
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tracing::{debug, info, warn};

use crate::format;
use crate::session::Transport;
use crate::tools;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "linux-mcp-powershell-bridge";
pub const SERVER_VERSION: &str = "0.1.0";

pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn invalid_request() -> Self {
        Self::new(INVALID_REQUEST, "Invalid Request")
    }

    pub fn method_not_found() -> Self {
        Self::new(METHOD_NOT_FOUND, "Method not found")
    }

    pub fn tool_not_found() -> Self {
        Self::new(METHOD_NOT_FOUND, "Tool not found")
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

pub struct Server<T: Transport> {
    transport: T,
}

impl<T: Transport> Server<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read controller messages until end of input, answering each in the
    /// framing it arrived in.
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> Result<(), ProtocolError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        while let Some(inbound) = framing::read_message(&mut reader).await {
            if let Some(reply) = self.handle(&inbound.message).await {
                framing::write_message(&mut writer, &reply, inbound.framing).await?;
            }
        }
        info!("controller input closed");
        Ok(())
    }

    /// Answer one controller message. Notifications yield `None`.
    pub async fn handle(&mut self, message: &Value) -> Option<Value> {
        let method = message.get("method");
        if let Some(m @ ("initialized" | "notifications/initialized")) =
            method.and_then(Value::as_str)
        {
            debug!(method = m, "notification");
            return None;
        }

        let id = message.get("id").filter(|id| !id.is_null())?.clone();
        let outcome = match method {
            None => Err(RpcError::invalid_request()),
            Some(method) => match method.as_str() {
                Some("initialize") => Ok(initialize_result()),
                Some("tools/list") => Ok(tools::tool_list()),
                Some("tools/call") => self.call_tool(message.get("params")).await,
                _ => {
                    debug!(method = %method, "unknown method");
                    Err(RpcError::method_not_found())
                }
            },
        };

        Some(match outcome {
            Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
            Err(err) => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": err.code, "message": err.message},
            }),
        })
    }

    async fn call_tool(&mut self, params: Option<&Value>) -> Result<Value, RpcError> {
        let name = params.and_then(|p| p.get("name")).and_then(Value::as_str);
        let arguments = params.and_then(|p| p.get("arguments"));
        let request = tools::parse_tool_call(name, arguments)?;
        info!(tool = name.unwrap_or_default(), "tool call");

        let (text, ok) = match self.transport.request(&request).await {
            Ok(response) => {
                let text = match &request {
                    Request::Run { run_async: true, .. } => format::accepted_text(&response),
                    Request::Run { .. } => format::run_text(&response),
                    Request::Status { job_id } => format::status_text(job_id.as_str(), &response),
                };
                (text, response.ok())
            }
            Err(e) => {
                warn!(error = %e, "executor unavailable");
                (format::transport_failure_text(&e), false)
            }
        };
        Ok(tool_result(&text, !ok))
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        "capabilities": {"tools": {}},
    })
}

fn tool_result(text: &str, is_error: bool) -> Value {
    json!({
        "content": [{"type": "text", "text": text}],
        "isError": is_error,
    })
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
