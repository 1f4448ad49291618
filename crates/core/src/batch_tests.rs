// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use proptest::prelude::*;

use super::*;

fn exit(code: i32, stdout: &str, stderr: &str) -> CommandResult {
    CommandResult::from_exit(code, stdout, stderr)
}

#[test]
fn empty_batch_is_rejected() {
    assert_eq!(CommandBatch::new(vec![]), Err(BatchError::Empty));
}

#[test]
fn single_batch_has_one_command() {
    let batch = CommandBatch::single("echo hi");
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.commands(), &["echo hi".to_string()]);
}

#[yare::parameterized(
    success       = { 0,   true  },
    failure       = { 1,   false },
    not_found     = { 127, false },
    killed        = { -1,  false },
)]
fn ok_tracks_exit_code(code: i32, ok: bool) {
    assert_eq!(exit(code, "", "").ok, ok);
}

#[test]
fn single_result_is_mirrored_without_labels() {
    let result = BatchResult::aggregate(vec![exit(3, "out\n\n", "err  \n")]);
    assert!(!result.ok);
    assert_eq!(result.code, 3);
    assert_eq!(result.stdout, "out\n\n");
    assert_eq!(result.stderr, "err  \n");
    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].index, Some(0));
}

#[test]
fn multiple_results_are_labeled_by_index() {
    let result = BatchResult::aggregate(vec![
        exit(0, "first\n", ""),
        exit(0, "", ""),
        exit(0, "third\n", "warn\n"),
    ]);
    assert!(result.ok);
    assert_eq!(result.code, 0);
    assert_eq!(result.stdout, "[command 0 stdout]\nfirst\n\n[command 2 stdout]\nthird\n");
    assert_eq!(result.stderr, "[command 2 stderr]\nwarn\n");
    let indices: Vec<_> = result.results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn multiple_results_without_output_yield_empty_streams() {
    let result = BatchResult::aggregate(vec![exit(0, "", ""), exit(1, "", "")]);
    assert_eq!(result.stdout, "");
    assert_eq!(result.stderr, "");
    assert_eq!(result.code, 1);
}

#[test]
fn first_nonzero_code_wins() {
    let result = BatchResult::aggregate(vec![exit(0, "", ""), exit(4, "", ""), exit(9, "", "")]);
    assert_eq!(result.code, 4);
    assert!(!result.ok);
}

#[test]
fn index_is_omitted_from_json_when_unset() {
    let json = serde_json::to_value(exit(0, "a", "")).unwrap();
    assert!(json.get("index").is_none());
}

proptest! {
    #[test]
    fn aggregate_ok_and_code_follow_batch_order(codes in prop::collection::vec(-2i32..4, 1..8)) {
        let results: Vec<_> = codes.iter().map(|&c| exit(c, "", "")).collect();
        let batch = BatchResult::aggregate(results);

        prop_assert_eq!(batch.ok, codes.iter().all(|&c| c == 0));
        prop_assert_eq!(batch.code, codes.iter().copied().find(|&c| c != 0).unwrap_or(0));
        prop_assert_eq!(batch.command_count(), codes.len());
    }
}
