//! Test-file discovery using glob patterns and walkdir.
//!
//! Patterns are resolved relative to a chart's directory, e.g.
//! `tests/*_test.yaml`. Matching files come back sorted, so discovery order
//! is stable across runs. Zero matches is an empty result, not an error.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::chart::SUBCHART_DIR;
use crate::error::Result;

/// Discover test files under a chart directory matching any of the given
/// chart-relative glob patterns. Subchart directories are not descended
/// into; the walker visits each subchart separately.
pub fn discover_test_files(chart_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(chart_dir)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == SUBCHART_DIR));

    for entry in walker {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        let path = entry.path();

        if path.is_file() && matches_any(path, chart_dir, patterns) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

// `*` stays within one path component; a pattern names its glob level
// explicitly.
const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Check the chart-relative path against each pattern (with brace expansion).
fn matches_any(path: &Path, chart_dir: &Path, patterns: &[String]) -> bool {
    let Ok(relative) = path.strip_prefix(chart_dir) else {
        return false;
    };

    patterns.iter().any(|pattern| {
        expand_braces(pattern).iter().any(|expanded| {
            glob::Pattern::new(expanded)
                .map(|pat| pat.matches_path_with(relative, MATCH_OPTIONS))
                .unwrap_or(false)
        })
    })
}

/// Expand brace expressions: "tests/*.{yaml,yml}" -> ["tests/*.yaml", "tests/*.yml"]
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(start) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };
    let Some(end) = pattern[start..].find('}') else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..start];
    let suffix = &pattern[start + end + 1..];
    let alternatives = &pattern[start + 1..start + end];

    alternatives
        .split(',')
        .flat_map(|alt| expand_braces(&format!("{prefix}{alt}{suffix}")))
        .collect()
}
