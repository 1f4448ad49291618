// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool catalogue and argument validation.

use rsb_wire::{extract_batch, is_truthy, Request};
use serde_json::{json, Value};

use crate::server::RpcError;

pub const RUN_TOOL: &str = "powershell";
pub const STATUS_TOOL: &str = "powershell_status";

const INVALID_COMMANDS: &str = "Provide 'command' string or non-empty 'commands' array of strings";
const INVALID_JOB_ID: &str = "Missing or invalid 'job_id'";

/// Result payload of `tools/list`.
pub fn tool_list() -> Value {
    json!({
        "tools": [
            {
                "name": RUN_TOOL,
                "description": "Run one or more Windows PowerShell commands via network bridge.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "command": {
                            "type": "string",
                            "description": "Single PowerShell command to execute."
                        },
                        "commands": {
                            "type": "array",
                            "items": {"type": "string"},
                            "minItems": 1,
                            "description": "List of PowerShell commands to run in order."
                        },
                        "async": {
                            "type": "boolean",
                            "description": "If true, return immediately with job_id for status polling."
                        }
                    },
                    "additionalProperties": false
                }
            },
            {
                "name": STATUS_TOOL,
                "description": "Get status/output for a long-running PowerShell job.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "job_id": {
                            "type": "string",
                            "description": "Job ID returned by async powershell call."
                        }
                    },
                    "required": ["job_id"],
                    "additionalProperties": false
                }
            }
        ]
    })
}

/// Turn a `tools/call` into an executor request.
///
/// Missing or non-object `arguments` count as empty.
pub fn parse_tool_call(name: Option<&str>, arguments: Option<&Value>) -> Result<Request, RpcError> {
    let arguments = arguments.filter(|a| a.is_object());
    let arg = |key: &str| arguments.and_then(|a| a.get(key));

    match name {
        Some(RUN_TOOL) => {
            let batch = extract_batch(arg("command"), arg("commands"))
                .map_err(|_| RpcError::invalid_params(INVALID_COMMANDS))?;
            let run_async = arg("async").is_some_and(is_truthy);
            Ok(Request::run(batch, run_async))
        }
        Some(STATUS_TOOL) => match arg("job_id") {
            Some(Value::String(id)) if !id.is_empty() => Ok(Request::status(id.as_str())),
            _ => Err(RpcError::invalid_params(INVALID_JOB_ID)),
        },
        _ => Err(RpcError::tool_not_found()),
    }
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
