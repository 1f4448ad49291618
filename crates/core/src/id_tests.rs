// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashSet;

use super::*;

#[test]
fn new_ids_are_unique() {
    let ids: HashSet<JobId> = (0..1000).map(|_| JobId::new()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn serializes_as_plain_string() {
    let id = JobId::from("abc-123");
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc-123""#);
    let back: JobId = serde_json::from_str(r#""abc-123""#).unwrap();
    assert_eq!(back, "abc-123");
}

#[yare::parameterized(
    shorter_than_limit = { "abc",      8, "abc" },
    exact_limit        = { "abcdefgh", 8, "abcdefgh" },
    truncated          = { "abcdefghij", 4, "abcd" },
    multibyte          = { "ééé",      2, "éé" },
)]
fn short_truncates_by_chars(input: &str, n: usize, expected: &str) {
    assert_eq!(short(input, n), expected);
}
