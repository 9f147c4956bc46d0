//! Incremental report writing.
//!
//! The printer owns an injected sink and writes each block as soon as it is
//! available, so a caller watching the stream sees partial output during a
//! long run. It never reorders or rewrites what it has emitted; report
//! normalization for snapshot comparison lives in [`crate::snapshot`].

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::suite::SuiteResult;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Running counts for the summary block.
#[derive(Debug, Default, Clone, Copy)]
pub struct Totals {
    pub charts_passed: usize,
    pub charts_failed: usize,
    pub suites_passed: usize,
    pub suites_failed: usize,
    pub tests_passed: usize,
    pub tests_failed: usize,
}

impl Totals {
    pub fn record_suite(&mut self, suite: &SuiteResult) {
        if suite.passed() {
            self.suites_passed += 1;
        } else {
            self.suites_failed += 1;
        }
        for case in &suite.cases {
            if case.passed {
                self.tests_passed += 1;
            } else {
                self.tests_failed += 1;
            }
        }
    }

    pub fn record_chart(&mut self, passed: bool) {
        if passed {
            self.charts_passed += 1;
        } else {
            self.charts_failed += 1;
        }
    }

    pub fn suites_total(&self) -> usize {
        self.suites_passed + self.suites_failed
    }
}

/// Writes the report to any byte sink.
pub struct Printer<W: Write> {
    sink: W,
    colors_enabled: bool,
    wrote_any: bool,
}

impl<W: Write> Printer<W> {
    /// Create a printer with colors off, suitable for files and pipes.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            colors_enabled: false,
            wrote_any: false,
        }
    }

    /// Enable or disable ANSI colors for markers and case lines.
    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.colors_enabled = enabled;
        self
    }

    /// Per-chart header, emitted only for multi-chart runs.
    pub fn chart_header(&mut self, name: &str, path: &Path) -> io::Result<()> {
        self.gap()?;
        writeln!(self.sink, "### Chart [ {} ] {}", name, path.display())?;
        writeln!(self.sink)?;
        self.wrote_any = true;
        Ok(())
    }

    /// One suite block: marker line, per-case lines, failure details.
    pub fn suite(&mut self, suite: &SuiteResult) -> io::Result<()> {
        let marker = if suite.passed() {
            self.paint(" PASS ", GREEN)
        } else {
            self.paint(" FAIL ", RED)
        };
        let check = self.paint("✓", GREEN);
        let cross = self.paint("✗", RED);
        writeln!(self.sink, "{} {}\t{}", marker, suite.name, suite.file.display())?;

        if let Some(error) = &suite.error {
            writeln!(self.sink, "\t{} {}", cross, error)?;
        }
        for case in &suite.cases {
            if case.passed {
                writeln!(self.sink, "\t{} {}", check, case.name)?;
            } else {
                writeln!(self.sink, "\t{} {}", cross, case.name)?;
                for failure in &case.failures {
                    writeln!(self.sink, "\t\t- {}", failure.description)?;
                }
            }
        }

        self.wrote_any = true;
        self.sink.flush()
    }

    /// Summary counts plus the trailing timing line; always the last output
    /// of a completed run.
    pub fn summary(&mut self, totals: &Totals, elapsed: Duration) -> io::Result<()> {
        self.gap()?;
        writeln!(
            self.sink,
            "Charts:      {} failed, {} passed, {} total",
            totals.charts_failed,
            totals.charts_passed,
            totals.charts_failed + totals.charts_passed
        )?;
        writeln!(
            self.sink,
            "Test Suites: {} failed, {} passed, {} total",
            totals.suites_failed,
            totals.suites_passed,
            totals.suites_total()
        )?;
        writeln!(
            self.sink,
            "Tests:       {} failed, {} passed, {} total",
            totals.tests_failed,
            totals.tests_passed,
            totals.tests_failed + totals.tests_passed
        )?;
        writeln!(self.sink)?;
        writeln!(
            self.sink,
            "Snapshot Summary: {} failed, {} total",
            totals.suites_failed,
            totals.suites_total()
        )?;
        writeln!(self.sink)?;
        writeln!(
            self.sink,
            "Time: {:.3}ms",
            elapsed.as_secs_f64() * 1000.0
        )?;
        self.wrote_any = true;
        self.sink.flush()
    }

    /// Fatal condition diagnostic; written before the run terminates so no
    /// error is silently swallowed.
    pub fn diagnostic(&mut self, message: &str) -> io::Result<()> {
        self.gap()?;
        let (on, off) = if self.colors_enabled {
            (RED, RESET)
        } else {
            ("", "")
        };
        writeln!(self.sink, "{}Error: {}{}", on, message, off)?;
        self.wrote_any = true;
        self.sink.flush()
    }

    /// Blank separator line, only between blocks.
    fn gap(&mut self) -> io::Result<()> {
        if self.wrote_any {
            writeln!(self.sink)?;
        }
        Ok(())
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.colors_enabled {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}
