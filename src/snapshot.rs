//! Report normalization for golden-snapshot comparison.
//!
//! A report is tokenized into kind-tagged sections by a line-driven state
//! machine, then made comparison-stable in two steps: the wall-clock
//! `Time:` field is redacted to a fixed placeholder, and each contiguous
//! run of suite sections is sorted lexicographically by its full text.
//! Chart headers, summaries, and the timing line never move, so the
//! normalized report preserves the report's overall shape while being
//! independent of suite completion order.
//!
//! This is test infrastructure: the printer always emits real durations
//! and real ordering; only snapshot comparison goes through here.

use regex::Regex;
use std::sync::OnceLock;

/// Placeholder written over the measured duration.
pub const TIME_PLACEHOLDER: &str = "Time: XX.XXXms";

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Time:\s+[0-9.]+ms").expect("time pattern is valid"))
}

/// What a report section is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// `### Chart [ name ] path` block.
    ChartHeader,
    /// A ` PASS ` / ` FAIL ` suite block with its case and detail lines.
    Suite,
    /// `Charts:` / `Snapshot Summary:` count blocks.
    Summary,
    /// The trailing `Time:` line.
    Timing,
    /// `Error:` lines and any content outside the known markers.
    Diagnostic,
}

/// One tokenized section; concatenating all section texts reproduces the
/// report byte for byte.
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    pub text: String,
}

fn classify(line: &str) -> Option<SectionKind> {
    if line.starts_with("### ") {
        Some(SectionKind::ChartHeader)
    } else if line.starts_with(" PASS ") || line.starts_with(" FAIL ") {
        Some(SectionKind::Suite)
    } else if line.starts_with("Charts:") || line.starts_with("Snapshot Summary:") {
        Some(SectionKind::Summary)
    } else if line.starts_with("Time:") {
        Some(SectionKind::Timing)
    } else if line.starts_with("Error:") {
        Some(SectionKind::Diagnostic)
    } else {
        None
    }
}

/// Tokenize a report into sections.
///
/// Blank lines between sections attach to the following section for
/// header, summary, timing, and diagnostic markers, and to the preceding
/// section before a suite marker. Suite sections therefore stay uniform
/// (marker line first, no leading blanks), which makes them safely
/// sortable within a run.
pub fn split_sections(report: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut pending_blanks = String::new();

    for line in report.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);

        if content.trim().is_empty() {
            pending_blanks.push_str(line);
            continue;
        }

        match classify(content) {
            Some(kind) => {
                if kind == SectionKind::Suite {
                    // Blanks belong to whatever came before the suite.
                    if let Some(last) = sections.last_mut() {
                        last.text.push_str(&pending_blanks);
                        pending_blanks.clear();
                    }
                }
                let mut text = std::mem::take(&mut pending_blanks);
                text.push_str(line);
                sections.push(Section { kind, text });
            }
            None => match sections.last_mut() {
                Some(last) => {
                    last.text.push_str(&pending_blanks);
                    pending_blanks.clear();
                    last.text.push_str(line);
                }
                None => {
                    let mut text = std::mem::take(&mut pending_blanks);
                    text.push_str(line);
                    sections.push(Section {
                        kind: SectionKind::Diagnostic,
                        text,
                    });
                }
            },
        }
    }

    if !pending_blanks.is_empty() {
        match sections.last_mut() {
            Some(last) => last.text.push_str(&pending_blanks),
            None => sections.push(Section {
                kind: SectionKind::Diagnostic,
                text: pending_blanks,
            }),
        }
    }

    sections
}

/// Replace the measured duration with [`TIME_PLACEHOLDER`].
pub fn redact_time(report: &str) -> String {
    time_pattern().replace(report, TIME_PLACEHOLDER).into_owned()
}

/// Normalize a report for snapshot comparison: redact the time field and
/// sort each maximal contiguous run of suite sections lexicographically.
/// Idempotent, and invariant under permutation of suites within a run.
pub fn normalize(report: &str) -> String {
    let redacted = redact_time(report);
    let mut sections = split_sections(&redacted);

    let mut idx = 0;
    while idx < sections.len() {
        if sections[idx].kind != SectionKind::Suite {
            idx += 1;
            continue;
        }
        let run_start = idx;
        while idx < sections.len() && sections[idx].kind == SectionKind::Suite {
            idx += 1;
        }
        sections[run_start..idx].sort_by(|a, b| a.text.cmp(&b.text));
    }

    sections.into_iter().map(|s| s.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "### Chart [ web ] charts/web\n\n PASS  deployment_test\tcharts/web/tests/deployment_test.yaml\n\t\u{2713} sets the image\n FAIL  service_test\tcharts/web/tests/service_test.yaml\n\t\u{2717} exposes the port\n\t\t- equal: path 'spec.ports[0].port' expected 80, got 8080 (document 1)\n\nCharts:      1 failed, 0 passed, 1 total\nTest Suites: 1 failed, 1 passed, 2 total\nTests:       1 failed, 1 passed, 2 total\n\nSnapshot Summary: 1 failed, 2 total\n\nTime: 4.321ms\n";

    #[test]
    fn test_split_kinds_in_order() {
        let kinds: Vec<SectionKind> = split_sections(SAMPLE).iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::ChartHeader,
                SectionKind::Suite,
                SectionKind::Suite,
                SectionKind::Summary,
                SectionKind::Summary,
                SectionKind::Timing,
            ]
        );
    }

    #[test]
    fn test_sections_reassemble_exactly() {
        let rebuilt: String = split_sections(SAMPLE).into_iter().map(|s| s.text).collect();
        assert_eq!(rebuilt, SAMPLE);
    }

    #[test]
    fn test_suite_sections_have_no_leading_blanks() {
        for section in split_sections(SAMPLE) {
            if section.kind == SectionKind::Suite {
                assert!(section.text.starts_with(" PASS ") || section.text.starts_with(" FAIL "));
            }
        }
    }

    #[test]
    fn test_redact_time() {
        assert_eq!(
            redact_time("Snapshot Summary: 0 failed, 2 total\n\nTime: 12.345ms\n"),
            "Snapshot Summary: 0 failed, 2 total\n\nTime: XX.XXXms\n"
        );
    }

    #[test]
    fn test_redact_is_noop_on_placeholder() {
        let already = "Time: XX.XXXms\n";
        assert_eq!(redact_time(already), already);
    }

    #[test]
    fn test_normalize_sorts_suites_within_run() {
        let report = " PASS  zulu_test\tb.yaml\n PASS  alpha_test\ta.yaml\n\nSnapshot Summary: 0 failed, 2 total\n\nTime: 1.000ms\n";
        let normalized = normalize(report);
        let alpha = normalized.find("alpha_test").unwrap();
        let zulu = normalized.find("zulu_test").unwrap();
        assert!(alpha < zulu);
        assert!(normalized.ends_with("Time: XX.XXXms\n"));
    }

    #[test]
    fn test_normalize_never_moves_headers_or_summary() {
        let normalized = normalize(SAMPLE);
        assert!(normalized.starts_with("### Chart [ web ]"));
        assert!(normalized.contains("\nCharts:      1 failed"));
        assert!(normalized.trim_end().ends_with("Time: XX.XXXms"));
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize(SAMPLE);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_diagnostic_lines_tokenize() {
        let report = "Error: not a chart directory: nope\n";
        let sections = split_sections(report);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Diagnostic);
    }

    fn suite_block(name: &str) -> String {
        format!(" PASS  {name}\tcharts/web/tests/{name}.yaml\n\t\u{2713} case one\n")
    }

    proptest! {
        // Permuting suite blocks within a contiguous run never changes
        // the normalized report.
        #[test]
        fn normalize_is_order_independent(perm in Just(vec![
            suite_block("alpha_test"),
            suite_block("bravo_test"),
            suite_block("charlie_test"),
            suite_block("delta_test"),
        ]).prop_shuffle()) {
            let tail = "\nSnapshot Summary: 0 failed, 4 total\n\nTime: 2.500ms\n";
            let shuffled: String = perm.concat() + tail;
            let reference: String = [
                suite_block("alpha_test"),
                suite_block("bravo_test"),
                suite_block("charlie_test"),
                suite_block("delta_test"),
            ].concat() + tail;
            prop_assert_eq!(normalize(&shuffled), normalize(&reference));
        }
    }
}
