// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::VecDeque;

use async_trait::async_trait;
use rsb_core::CommandBatch;
use rsb_wire::framing::Framing;
use rsb_wire::{ErrorReply, Response};
use serde_json::json;

use super::*;
use crate::session::SessionError;

#[derive(Default)]
struct FakeTransport {
    replies: VecDeque<Result<Response, SessionError>>,
    sent: Vec<Request>,
}

impl FakeTransport {
    fn replying(reply: Value) -> Self {
        let mut fake = Self::default();
        fake.replies.push_back(Ok(serde_json::from_value(reply).unwrap()));
        fake
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn request(&mut self, request: &Request) -> Result<Response, SessionError> {
        self.sent.push(request.clone());
        self.replies.pop_front().unwrap_or_else(|| {
            Err(SessionError::RetryExhausted(ProtocolError::ConnectionClosed))
        })
    }
}

fn call(id: i64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments},
    })
}

fn text(reply: &Value) -> &str {
    reply["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn initialize_describes_server() {
    let mut server = Server::new(FakeTransport::default());
    let reply = server.handle(&json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})).await.unwrap();

    assert_eq!(reply["id"], 1);
    assert_eq!(reply["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(reply["result"]["serverInfo"]["name"], "linux-mcp-powershell-bridge");
    assert_eq!(reply["result"]["serverInfo"]["version"], "0.1.0");
    assert_eq!(reply["result"]["capabilities"], json!({"tools": {}}));
}

#[tokio::test]
async fn tools_list_returns_catalogue() {
    let mut server = Server::new(FakeTransport::default());
    let reply = server.handle(&json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"})).await.unwrap();
    assert_eq!(reply["id"], "a");
    assert_eq!(reply["result"], tools::tool_list());
}

#[yare::parameterized(
    initialized       = { json!({"jsonrpc": "2.0", "method": "initialized"}) },
    initialized_id    = { json!({"jsonrpc": "2.0", "id": 4, "method": "initialized"}) },
    mcp_initialized   = { json!({"jsonrpc": "2.0", "method": "notifications/initialized"}) },
    other_notify      = { json!({"jsonrpc": "2.0", "method": "notifications/cancelled"}) },
    null_id           = { json!({"jsonrpc": "2.0", "id": null, "method": "tools/list"}) },
    no_method_no_id   = { json!({"jsonrpc": "2.0"}) },
)]
#[test_macro(tokio::test)]
async fn notifications_get_no_reply(message: Value) {
    let mut server = Server::new(FakeTransport::default());
    assert_eq!(server.handle(&message).await, None);
}

#[yare::parameterized(
    missing_method = { json!({"jsonrpc": "2.0", "id": 9}),                    -32600, "Invalid Request" },
    unknown_method = { json!({"jsonrpc": "2.0", "id": 9, "method": "ping"}),  -32601, "Method not found" },
    unknown_tool   = { call(9, "cmd", json!({})),                              -32601, "Tool not found" },
    bad_commands   = { call(9, "powershell", json!({"commands": []})),         -32602, "Provide 'command' string or non-empty 'commands' array of strings" },
    bad_job_id     = { call(9, "powershell_status", json!({})),                -32602, "Missing or invalid 'job_id'" },
)]
#[test_macro(tokio::test)]
async fn errors_are_json_rpc_errors(message: Value, code: i32, text: &str) {
    let mut server = Server::new(FakeTransport::default());
    let reply = server.handle(&message).await.unwrap();
    assert_eq!(reply["id"], 9);
    assert_eq!(reply["error"]["code"], code);
    assert_eq!(reply["error"]["message"], text);
    assert!(server.transport().sent.is_empty());
}

#[tokio::test]
async fn sync_run_is_forwarded_and_formatted() {
    let mut server = Server::new(FakeTransport::replying(json!({
        "ok": true, "status": "completed", "stdout": "hi\n", "stderr": "",
        "code": 0, "command_count": 1, "results": [],
    })));
    let reply = server.handle(&call(2, "powershell", json!({"command": "echo hi"}))).await.unwrap();

    assert_eq!(text(&reply), "status: completed, commands: 1\nhi");
    assert_eq!(reply["result"]["isError"], false);
    assert_eq!(server.transport().sent, vec![Request::run(CommandBatch::single("echo hi"), false)]);
}

#[tokio::test]
async fn failed_run_is_error_result() {
    let mut server = Server::new(FakeTransport::replying(json!({
        "ok": false, "status": "failed", "stdout": "", "stderr": "bad\n",
        "code": 1, "command_count": 2, "results": [],
    })));
    let reply =
        server.handle(&call(2, "powershell", json!({"commands": ["false", "true"]}))).await.unwrap();
    assert_eq!(text(&reply), "status: failed, commands: 2\n[stderr]\nbad");
    assert_eq!(reply["result"]["isError"], true);
}

#[tokio::test]
async fn async_run_reports_job_id() {
    let mut server = Server::new(FakeTransport::replying(json!({
        "ok": true, "status": "running", "job_id": "j-1",
        "started_at": "2026-01-01T00:00:00.000000+00:00", "finished_at": null, "command_count": 1,
    })));
    let reply =
        server.handle(&call(3, "powershell", json!({"command": "sleep 10", "async": true}))).await.unwrap();
    assert_eq!(text(&reply), "status: running\njob_id: j-1");
    assert_eq!(reply["result"]["isError"], false);
}

#[tokio::test]
async fn status_of_unknown_job_is_error_result() {
    let mut fake = FakeTransport::default();
    fake.replies.push_back(Ok(Response::Error(ErrorReply::not_found("j-9"))));
    let mut server = Server::new(fake);

    let reply = server.handle(&call(4, "powershell_status", json!({"job_id": "j-9"}))).await.unwrap();
    assert_eq!(text(&reply), "job_id: j-9\nstatus: not_found\n[stderr]\nUnknown job_id 'j-9'");
    assert_eq!(reply["result"]["isError"], true);
    assert_eq!(server.transport().sent, vec![Request::status("j-9")]);
}

#[tokio::test]
async fn unreachable_executor_becomes_error_result() {
    let mut server = Server::new(FakeTransport::default());
    let reply = server.handle(&call(5, "powershell", json!({"command": "dir"}))).await.unwrap();
    assert_eq!(reply["result"]["isError"], true);
    assert!(text(&reply).contains("connection closed"));
}

#[tokio::test]
async fn serve_answers_in_the_framing_of_each_request() {
    let header_body = json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}).to_string();
    let mut input = format!("Content-Length: {}\r\n\r\n{header_body}", header_body.len());
    input.push_str("{\"jsonrpc\":\"2.0\",\"method\":\"initialized\"}\n");
    input.push_str("{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n");

    let mut output = Vec::new();
    let mut server = Server::new(FakeTransport::default());
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let first = json!({"jsonrpc": "2.0", "id": 1, "result": initialize_result()});
    let second = json!({"jsonrpc": "2.0", "id": 2, "result": tools::tool_list()});
    let mut expected = framing::encode(&first, Framing::ContentLength).unwrap();
    expected.extend(framing::encode(&second, Framing::Lines).unwrap());
    assert_eq!(output, expected);
}

#[tokio::test]
async fn serve_writes_nothing_for_notifications() {
    let input = "{\"jsonrpc\":\"2.0\",\"method\":\"initialized\"}\n";
    let mut output = Vec::new();
    Server::new(FakeTransport::default()).serve(input.as_bytes(), &mut output).await.unwrap();
    assert!(output.is_empty());
}

#[tokio::test]
async fn serve_stops_quietly_on_oversized_header() {
    let input = b"Content-Length: 18446744073709551615\r\n\r\n{}";
    let mut output = Vec::new();
    Server::new(FakeTransport::default()).serve(&input[..], &mut output).await.unwrap();
    assert!(output.is_empty());
}
