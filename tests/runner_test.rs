//! End-to-end runner tests with golden snapshot comparison.
//!
//! Each scenario runs the harness against a fixture chart, captures the
//! report from an in-memory sink, and compares it against a stored golden
//! file. Comparison goes through `snapshot::redact_time` (exact text, time
//! field replaced) and `snapshot::normalize` (additionally order-stable
//! within contiguous suite runs).

use std::path::PathBuf;

use chartcheck::config::TestConfig;
use chartcheck::printer::Printer;
use chartcheck::runner::TestRunner;
use chartcheck::snapshot::{normalize, redact_time};

fn run(patterns: &[&str], with_subchart: bool, roots: &[&str]) -> (bool, String) {
    let config = TestConfig {
        test_files: patterns.iter().map(|s| s.to_string()).collect(),
        with_subchart,
        values: Vec::new(),
    };

    let mut sink = Vec::new();
    let mut runner = TestRunner::new(Printer::new(&mut sink), config);
    let passed = runner.run(&roots.iter().map(PathBuf::from).collect::<Vec<_>>());
    drop(runner);
    (passed, String::from_utf8(sink).expect("report is valid UTF-8"))
}

fn assert_matches_golden(output: &str, golden: &str) {
    assert_eq!(redact_time(output), golden, "report differs from golden");
    assert_eq!(
        normalize(output),
        normalize(golden),
        "normalized report differs from golden"
    );
}

#[test]
fn runner_ok_with_passed_tests() {
    let (passed, output) = run(&["tests/*_test.yaml"], false, &["tests/fixtures/basic"]);
    assert!(passed);
    assert!(!output.contains(" FAIL "));
    assert_matches_golden(&output, include_str!("snapshots/basic_pass.snap"));
}

#[test]
fn runner_fails_with_failed_tests() {
    let (passed, output) = run(
        &["tests_failed/*_test.yaml"],
        false,
        &["tests/fixtures/basic"],
    );
    assert!(!passed);
    assert!(output.contains(" FAIL "));
    assert_matches_golden(&output, include_str!("snapshots/basic_fail.snap"));
}

#[test]
fn runner_with_tests_in_subchart() {
    let (passed, output) = run(
        &["tests/*_test.yaml"],
        true,
        &["tests/fixtures/with-subchart"],
    );
    assert!(passed);
    assert!(output.contains("### Chart [ child ]"));
    assert_matches_golden(&output, include_str!("snapshots/subchart_included.snap"));
}

#[test]
fn runner_with_tests_in_subchart_but_flag_false() {
    let (passed, output) = run(
        &["tests/*_test.yaml"],
        false,
        &["tests/fixtures/with-subchart"],
    );
    assert!(passed);
    assert!(!output.contains("child"));
    assert_matches_golden(&output, include_str!("snapshots/subchart_excluded.snap"));
}

#[test]
fn repeated_runs_are_byte_identical_after_time_redaction() {
    let (_, first) = run(&["tests/*_test.yaml"], false, &["tests/fixtures/basic"]);
    let (_, second) = run(&["tests/*_test.yaml"], false, &["tests/fixtures/basic"]);
    assert_eq!(redact_time(&first), redact_time(&second));
}

#[test]
fn subchart_inclusion_adds_exactly_the_child_suites() {
    let (_, included) = run(
        &["tests/*_test.yaml"],
        true,
        &["tests/fixtures/with-subchart"],
    );
    let (_, excluded) = run(
        &["tests/*_test.yaml"],
        false,
        &["tests/fixtures/with-subchart"],
    );

    let count = |s: &str| s.matches(" PASS ").count() + s.matches(" FAIL ").count();
    assert_eq!(count(&included), 2);
    assert_eq!(count(&excluded), 1);
}

#[test]
fn failing_assertion_description_appears_in_report() {
    let (_, output) = run(
        &["tests_failed/*_test.yaml"],
        false,
        &["tests/fixtures/basic"],
    );
    assert!(output.contains(
        "equal: path 'spec.template.spec.containers[0].image' expected \"nginx:1.19.0\", got \"nginx:1.25.3\" (document 0)"
    ));
}

#[test]
fn malformed_suite_fails_alone_while_sibling_passes() {
    let (passed, output) = run(
        &["tests_mixed/*_test.yaml"],
        false,
        &["tests/fixtures/basic"],
    );
    assert!(!passed);
    assert!(output.contains(" FAIL  broken_test\t"));
    assert!(output.contains("\u{2717} tests/fixtures/basic/tests_mixed/broken_test.yaml:"));
    assert!(output.contains(" PASS  good_test\t"));
    assert!(output.contains("Test Suites: 1 failed, 1 passed, 2 total"));
    // The parse error is the broken suite's sole entry; the only check mark
    // belongs to the sibling's case.
    assert_eq!(output.matches('\u{2717}').count(), 1);
    assert_eq!(output.matches('\u{2713}').count(), 1);
}

#[test]
fn multiple_roots_group_suites_under_chart_headers() {
    let (passed, output) = run(
        &["tests/*_test.yaml"],
        false,
        &["tests/fixtures/basic", "tests/fixtures/with-subchart"],
    );
    assert!(passed);
    assert!(output.contains("### Chart [ basic ] tests/fixtures/basic"));
    assert!(output.contains("### Chart [ with-subchart ] tests/fixtures/with-subchart"));
    assert!(output.contains("Charts:      0 failed, 2 passed, 2 total"));
}

#[test]
fn fatal_discovery_error_reaches_the_report() {
    let (passed, output) = run(&["tests/*_test.yaml"], false, &["tests/fixtures/missing"]);
    assert!(!passed);
    assert!(output.contains("Error: not a chart directory: tests/fixtures/missing"));
    // The run aborted before the summary.
    assert!(!output.contains("Snapshot Summary:"));
}
