//! Chart traversal: root paths in, ordered execution plan out.
//!
//! Each root chart is loaded once; when subchart inclusion is on, the
//! chart tree is flattened parent-first with children in declared order.
//! Charts without matching test files contribute no plan.

use std::path::PathBuf;

use crate::chart::Chart;
use crate::config::TestConfig;
use crate::discovery::discover_test_files;
use crate::error::Result;

/// One chart to execute, with the test files discovered for it.
#[derive(Debug)]
pub struct ChartPlan {
    pub chart: Chart,
    pub test_files: Vec<PathBuf>,
}

/// Produce the ordered execution plan for the given root chart paths.
///
/// An invalid root path is a fatal [`crate::error::Error::Discovery`];
/// a chart with zero matching test files is silently skipped.
pub fn walk(roots: &[PathBuf], config: &TestConfig) -> Result<Vec<ChartPlan>> {
    let mut plans = Vec::new();
    for root in roots {
        let chart = Chart::discover(root)?;
        visit(chart, config, &mut plans)?;
    }
    Ok(plans)
}

fn visit(chart: Chart, config: &TestConfig, plans: &mut Vec<ChartPlan>) -> Result<()> {
    let test_files = discover_test_files(&chart.path, &config.test_files)?;
    let subcharts = if config.with_subchart {
        chart.subcharts.clone()
    } else {
        Vec::new()
    };

    if !test_files.is_empty() {
        plans.push(ChartPlan { chart, test_files });
    }

    for subchart in subcharts {
        visit(subchart, config, plans)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::path::Path;

    fn config(with_subchart: bool) -> TestConfig {
        TestConfig {
            test_files: vec!["tests/*_test.yaml".to_string()],
            with_subchart,
            values: Vec::new(),
        }
    }

    #[test]
    fn test_walk_single_chart() {
        let plans = walk(&[PathBuf::from("tests/fixtures/basic")], &config(false)).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].chart.name(), "basic");
        assert_eq!(plans[0].test_files.len(), 2);
    }

    #[test]
    fn test_walk_with_subcharts_parent_first() {
        let plans = walk(
            &[PathBuf::from("tests/fixtures/with-subchart")],
            &config(true),
        )
        .unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].chart.name(), "with-subchart");
        assert_eq!(plans[1].chart.name(), "child");
    }

    #[test]
    fn test_walk_without_subchart_flag_skips_children() {
        let plans = walk(
            &[PathBuf::from("tests/fixtures/with-subchart")],
            &config(false),
        )
        .unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].chart.name(), "with-subchart");
    }

    #[test]
    fn test_chart_without_matching_tests_contributes_nothing() {
        let cfg = TestConfig {
            test_files: vec!["specs/*_spec.yaml".to_string()],
            with_subchart: true,
            values: Vec::new(),
        };
        let plans = walk(&[PathBuf::from("tests/fixtures/basic")], &cfg).unwrap();
        assert!(plans.is_empty());
    }

    #[test]
    fn test_invalid_root_is_fatal() {
        let err = walk(&[PathBuf::from("tests/fixtures/nope")], &config(false)).unwrap_err();
        assert!(matches!(err, Error::Discovery(ref p) if p == Path::new("tests/fixtures/nope")));
    }

    #[test]
    fn test_multiple_roots_keep_order() {
        let plans = walk(
            &[
                PathBuf::from("tests/fixtures/with-subchart"),
                PathBuf::from("tests/fixtures/basic"),
            ],
            &config(false),
        )
        .unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].chart.name(), "with-subchart");
        assert_eq!(plans[1].chart.name(), "basic");
    }
}
