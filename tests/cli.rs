mod common;

use covdiag::cli::{cmd_check, Style};

#[test]
fn check_reports_uncovered_lines_and_branches() {
    let report = r#"{ "files": { "{source}": {
        "lines": [null, 1, 0, null],
        "branches": [
            { "kind": "if", "range": [1, 0, 3, 3],
              "arms": [
                { "kind": "then", "range": [2, 2, 2, 9], "hits": 1 },
                { "kind": "else", "range": [3, 2, 3, 9], "hits": 0 }
              ] }
        ]
    } } }"#;
    let project = common::setup("def f\n  if x\n    a\nend\n", report, 0);

    let out = cmd_check(
        &project.source,
        &common::runner_template(&project.harness),
        Some(&project.test_file),
        None,
        &Style::Text,
    )
    .unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("uncovered_line"));
    assert!(lines[0].contains("Line 3 is not covered by tests"));
    assert!(lines[1].contains("uncovered_branch"));
    assert!(lines[1].contains("`else` branch of `if` on line 4 is never taken"));
}

#[test]
fn check_appends_test_failure_last() {
    let report = r#"{ "files": { "{source}": { "lines": [0] } } }"#;
    let project = common::setup("a\n", report, 1);

    let out = cmd_check(
        &project.source,
        &common::runner_template(&project.harness),
        Some(&project.test_file),
        None,
        &Style::Text,
    )
    .unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("uncovered_line"));
    assert!(lines[1].contains("test_failing"));
}

#[test]
fn check_json_output_round_trips() {
    let report = r#"{ "files": { "{source}": { "lines": [0, 1] } } }"#;
    let project = common::setup("a\nb\n", report, 0);

    let out = cmd_check(
        &project.source,
        &common::runner_template(&project.harness),
        Some(&project.test_file),
        None,
        &Style::Json,
    )
    .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let list = parsed.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["kind"], "uncovered_line");
    assert_eq!(list[0]["range"]["start_line"], 0);
    assert_eq!(list[0]["range"]["end_line"], 0);
}

#[test]
fn check_with_pattern_resolver() {
    let report = r#"{ "files": { "{source}": { "lines": [1] } } }"#;
    let project = common::setup("a\n", report, 0);

    let out = cmd_check(
        &project.source,
        &common::runner_template(&project.harness),
        None,
        Some("{dir}/{stem}_test.{ext}"),
        &Style::Text,
    )
    .unwrap();

    assert_eq!(out, "No findings.\n");
}

#[test]
fn check_surfaces_harness_crash_as_error() {
    // A crashed run must yield an error, never an empty diagnostic list.
    let project = common::setup_crashing("a\n", 3);

    let result = cmd_check(
        &project.source,
        &common::runner_template(&project.harness),
        Some(&project.test_file),
        None,
        &Style::Text,
    );

    assert!(result.is_err());
}

#[test]
fn check_with_unresolvable_test_file_fails() {
    let report = r#"{ "files": {} }"#;
    let project = common::setup("a\n", report, 0);

    let result = cmd_check(
        &project.source,
        &common::runner_template(&project.harness),
        None,
        Some("{dir}/{stem}_spec.{ext}"),
        &Style::Text,
    );

    assert!(result.is_err());
}
