//! Chart model and subchart tree discovery.
//!
//! A chart is a directory carrying a `Chart.yaml` and a `templates/`
//! directory, optionally nesting further charts under `charts/`. The tree is
//! built once per run and never mutated.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Subdirectory holding nested charts.
pub const SUBCHART_DIR: &str = "charts";

/// Chart metadata read from `Chart.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartMeta {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A discovered chart: its directory, metadata, and nested subcharts in
/// declared (sorted) order.
#[derive(Debug, Clone)]
pub struct Chart {
    pub path: PathBuf,
    pub meta: ChartMeta,
    pub subcharts: Vec<Chart>,
}

impl Chart {
    /// Load a chart and its full subchart tree from a directory.
    ///
    /// Fails with [`Error::Discovery`] when the directory does not exist or
    /// carries no `Chart.yaml`. Charts cannot include themselves, so the
    /// recursion needs no cycle detection.
    pub fn discover(path: &Path) -> Result<Chart> {
        let meta_path = path.join("Chart.yaml");
        if !meta_path.is_file() {
            return Err(Error::Discovery(path.to_path_buf()));
        }

        let content = fs::read_to_string(&meta_path)?;
        let meta: ChartMeta =
            serde_yaml::from_str(&content).map_err(|e| Error::parse(&meta_path, e))?;

        let subcharts = discover_subcharts(path)?;

        Ok(Chart {
            path: path.to_path_buf(),
            meta,
            subcharts,
        })
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }
}

/// Enumerate `charts/*/` directories containing a `Chart.yaml`, sorted by
/// directory name, each loaded recursively.
fn discover_subcharts(chart_dir: &Path) -> Result<Vec<Chart>> {
    let nested = chart_dir.join(SUBCHART_DIR);
    if !nested.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs: Vec<PathBuf> = fs::read_dir(&nested)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_dir() && p.join("Chart.yaml").is_file())
        .collect();
    dirs.sort();

    dirs.iter().map(|dir| Chart::discover(dir)).collect()
}
