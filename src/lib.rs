//! # chartcheck
//!
//! A snapshot-testing harness for Helm chart templates.
//!
//! chartcheck renders a chart into its manifest documents, evaluates
//! declarative YAML test files against them, and prints a deterministic,
//! diff-friendly report. The report text is stable enough for exact-match
//! golden-file regression testing once the timing line is redacted.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chartcheck::{Printer, TestConfig, TestRunner};
//! use std::path::PathBuf;
//!
//! let mut runner = TestRunner::new(
//!     Printer::new(std::io::stdout()),
//!     TestConfig::default(),
//! );
//! let passed = runner.run(&[PathBuf::from("charts/web")]);
//! assert!(passed);
//! ```
//!
//! ## Test files
//!
//! ```yaml
//! tests:
//!   - it: sets the image
//!     template: deployment.yaml
//!     asserts:
//!       - equal:
//!           path: spec.template.spec.containers[0].image
//!           value: nginx:1.25.3
//!       - matchRegex:
//!           path: metadata.name
//!           pattern: "-deployment$"
//! ```

pub mod assertions;
pub mod chart;
pub mod config;
pub mod discovery;
pub mod error;
pub mod parser;
pub mod printer;
pub mod renderer;
pub mod runner;
pub mod snapshot;
pub mod suite;
pub mod walker;

// Core types
pub use assertions::{evaluate_case, AssertionFailure, CaseResult};
pub use chart::Chart;
pub use config::TestConfig;
pub use error::Error;
pub use parser::{load_test_file, AssertionSpec, TestCase, TestFile};
pub use printer::{Printer, Totals};
pub use renderer::{Document, Renderer, StaticRenderer};
pub use runner::TestRunner;
pub use suite::{run_suite, SuiteResult};
