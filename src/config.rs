//! Configuration file support.
//!
//! Handles loading and discovering `.chartcheck.yaml` configuration files.
//! One [`TestConfig`] drives one run: the test-file globs, the subchart
//! inclusion flag, and any values override files for the renderer.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Default configuration embedded at compile time.
const DEFAULT_CONFIG_STR: &str = include_str!("../default.chartcheck.yaml");

/// Parsed default config, initialized once on first access.
fn default_config() -> &'static TestConfig {
    static CONFIG: OnceLock<TestConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        serde_yaml::from_str(DEFAULT_CONFIG_STR)
            .expect("embedded default.chartcheck.yaml should be valid YAML")
    })
}

/// Configuration for one test run.
#[derive(Debug, Deserialize, Clone)]
pub struct TestConfig {
    /// Glob patterns for test files, relative to each chart directory.
    pub test_files: Vec<String>,

    /// Whether to descend into declared subcharts.
    #[serde(default)]
    pub with_subchart: bool,

    /// Values override files handed to the renderer.
    #[serde(default)]
    pub values: Vec<PathBuf>,
}

impl Default for TestConfig {
    fn default() -> Self {
        default_config().clone()
    }
}

impl TestConfig {
    /// Discover config by searching from start_dir upward.
    pub fn discover(start_dir: &Path) -> Option<Self> {
        let config_path = find_config_file(start_dir)?;
        load_config(&config_path).ok()
    }

    /// Load config from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        load_config(path)
    }

    /// Merge CLI overrides into this config.
    pub fn with_overrides(
        mut self,
        test_files: Vec<String>,
        with_subchart: bool,
        values: Vec<PathBuf>,
    ) -> Self {
        if !test_files.is_empty() {
            self.test_files = test_files;
        }
        if with_subchart {
            self.with_subchart = true;
        }
        if !values.is_empty() {
            self.values = values;
        }
        self
    }
}

/// Search for a config file starting from start_dir and walking up to root.
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.canonicalize().ok()?;

    loop {
        let candidate = current.join(".chartcheck.yaml");
        if candidate.exists() {
            return Some(candidate);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load and parse a config file.
fn load_config(path: &Path) -> Result<TestConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: TestConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    Ok(config)
}
