//! Top-level orchestration: walk charts, render, evaluate suites, print.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::TestConfig;
use crate::error::Result;
use crate::printer::{Printer, Totals};
use crate::renderer::{Renderer, StaticRenderer};
use crate::suite::run_suite;
use crate::walker;

/// Runs one invocation end to end. Holds no state between runs; each call
/// to [`TestRunner::run`] is independent given fresh configuration.
pub struct TestRunner<W: Write> {
    pub printer: Printer<W>,
    pub config: TestConfig,
    renderer: Box<dyn Renderer>,
}

impl<W: Write> TestRunner<W> {
    pub fn new(printer: Printer<W>, config: TestConfig) -> Self {
        Self {
            printer,
            config,
            renderer: Box::new(StaticRenderer),
        }
    }

    /// Swap in a different renderer implementation (e.g. a real template
    /// engine) behind the same seam.
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Execute all suites across all given root charts and print the
    /// report. Returns true iff every suite passed.
    ///
    /// Fatal conditions (render failures, invalid root paths) flush a
    /// diagnostic line to the sink and return false; whatever partial
    /// report was already written stays flushed.
    pub fn run(&mut self, chart_paths: &[PathBuf]) -> bool {
        match self.try_run(chart_paths) {
            Ok(passed) => passed,
            Err(e) => {
                let _ = self.printer.diagnostic(&e.to_string());
                false
            }
        }
    }

    fn try_run(&mut self, chart_paths: &[PathBuf]) -> Result<bool> {
        let started = Instant::now();
        let plans = walker::walk(chart_paths, &self.config)?;
        let multi_chart = plans.len() > 1;

        let mut totals = Totals::default();
        let mut all_passed = true;

        for plan in &plans {
            // Render once per chart; failure here is fatal to the run.
            let documents = self.renderer.render(&plan.chart.path, &self.config.values)?;

            if multi_chart {
                self.printer
                    .chart_header(plan.chart.name(), &plan.chart.path)?;
            }

            let mut chart_passed = true;
            for file in &plan.test_files {
                let suite = run_suite(file, &plan.chart, &documents);
                self.printer.suite(&suite)?;
                totals.record_suite(&suite);
                chart_passed &= suite.passed();
            }

            totals.record_chart(chart_passed);
            all_passed &= chart_passed;
        }

        self.printer.summary(&totals, started.elapsed())?;
        Ok(all_passed)
    }
}
