// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use super::*;

fn parse(value: Value) -> Result<Request, RequestError> {
    Request::from_line(&value.to_string())
}

fn commands_of(request: &Request) -> Vec<String> {
    match request {
        Request::Run { batch, .. } => batch.commands().to_vec(),
        other => panic!("expected Run, got {other:?}"),
    }
}

#[test]
fn action_defaults_to_run() {
    let request = parse(json!({"command": "echo hi"})).unwrap();
    assert_eq!(request, Request::run(CommandBatch::single("echo hi"), false));
}

#[test]
fn command_string_wins_over_commands_array() {
    let request = parse(json!({"command": "a", "commands": ["b", "c"]})).unwrap();
    assert_eq!(commands_of(&request), vec!["a"]);
}

#[test]
fn non_string_command_falls_back_to_commands() {
    let request = parse(json!({"command": 5, "commands": ["b", "c"]})).unwrap();
    assert_eq!(commands_of(&request), vec!["b", "c"]);
}

#[yare::parameterized(
    missing_both        = { json!({"action": "run"}) },
    empty_commands      = { json!({"commands": []}) },
    non_string_element  = { json!({"commands": ["ok", 1]}) },
    nested_array        = { json!({"commands": [["ok"]]}) },
    commands_not_array  = { json!({"commands": "echo"}) },
    null_command        = { json!({"command": null}) },
)]
fn invalid_commands_are_rejected(value: Value) {
    assert_eq!(parse(value), Err(RequestError::InvalidCommands));
}

#[yare::parameterized(
    absent       = { json!({"command": "x"}),                   false },
    bool_true    = { json!({"command": "x", "async": true}),    true },
    bool_false   = { json!({"command": "x", "async": false}),   false },
    one          = { json!({"command": "x", "async": 1}),       true },
    zero         = { json!({"command": "x", "async": 0}),       false },
    text         = { json!({"command": "x", "async": "yes"}),   true },
    empty_text   = { json!({"command": "x", "async": ""}),      false },
    null         = { json!({"command": "x", "async": null}),    false },
)]
fn async_flag_truthiness(value: Value, expected: bool) {
    match parse(value).unwrap() {
        Request::Run { run_async, .. } => assert_eq!(run_async, expected),
        other => panic!("expected Run, got {other:?}"),
    }
}

#[test]
fn status_requires_job_id() {
    assert_eq!(parse(json!({"action": "status"})), Err(RequestError::InvalidJobId));
    assert_eq!(parse(json!({"action": "status", "job_id": ""})), Err(RequestError::InvalidJobId));
    assert_eq!(parse(json!({"action": "status", "job_id": 7})), Err(RequestError::InvalidJobId));
    assert_eq!(parse(json!({"action": "status", "job_id": "j1"})), Ok(Request::status("j1")));
}

#[test]
fn unknown_action_is_rejected() {
    assert_eq!(
        parse(json!({"action": "delete", "command": "x"})),
        Err(RequestError::UnknownAction("delete".to_string()))
    );
}

#[yare::parameterized(
    not_json   = { "this is not json" },
    array      = { "[1, 2]" },
    bad_action = { r#"{"action": 3}"# },
)]
fn malformed_lines_are_rejected(line: &str) {
    assert!(matches!(Request::from_line(line), Err(RequestError::Malformed(_))));
}

#[test]
fn single_command_encodes_as_command_field() {
    let raw = RawRequest::from(&Request::run(CommandBatch::single("dir"), true));
    assert_eq!(
        serde_json::to_value(&raw).unwrap(),
        json!({"action": "run", "command": "dir", "async": true})
    );
}

#[test]
fn multi_command_encodes_as_commands_field() {
    let batch = CommandBatch::new(vec!["a".into(), "b".into()]).unwrap();
    let raw = RawRequest::from(&Request::run(batch, false));
    assert_eq!(
        serde_json::to_value(&raw).unwrap(),
        json!({"action": "run", "commands": ["a", "b"], "async": false})
    );
}

#[test]
fn status_encodes_job_id() {
    let raw = RawRequest::from(&Request::status("j-9"));
    assert_eq!(serde_json::to_value(&raw).unwrap(), json!({"action": "status", "job_id": "j-9"}));
}
