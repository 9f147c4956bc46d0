//! Suite aggregation: one test file evaluated against one chart's
//! rendered documents.

use std::path::{Path, PathBuf};

use crate::assertions::{evaluate_case, CaseResult};
use crate::chart::Chart;
use crate::parser::{self, load_test_file};
use crate::renderer::Document;

/// The aggregated verdict for one test file.
#[derive(Debug, Clone)]
pub struct SuiteResult {
    pub name: String,
    /// Owning chart, for disambiguating subchart suites with the same
    /// file name.
    pub chart_name: String,
    pub file: PathBuf,
    pub cases: Vec<CaseResult>,
    /// Set when the test file failed to parse; the suite is then reported
    /// failed with this as its sole entry.
    pub error: Option<String>,
}

impl SuiteResult {
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.cases.iter().all(|c| c.passed)
    }
}

/// Evaluate one test file. A parse error fails this suite only; callers
/// keep going with sibling suites.
pub fn run_suite(file: &Path, chart: &Chart, documents: &[Document]) -> SuiteResult {
    match load_test_file(file) {
        Ok(test_file) => {
            let cases: Vec<CaseResult> = test_file
                .tests
                .iter()
                .map(|case| evaluate_case(case, documents))
                .collect();

            SuiteResult {
                name: parser::suite_name(file, Some(&test_file)),
                chart_name: chart.name().to_string(),
                file: file.to_path_buf(),
                cases,
                error: None,
            }
        }
        Err(e) => SuiteResult {
            name: parser::suite_name(file, None),
            chart_name: chart.name().to_string(),
            file: file.to_path_buf(),
            cases: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}
