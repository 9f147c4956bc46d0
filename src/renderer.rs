//! The renderer seam and the rendered-document type.
//!
//! Template expansion is an external collaborator: the harness never
//! interprets template syntax itself. [`Renderer`] is the narrow interface
//! it consumes; [`StaticRenderer`] is the in-crate implementation that
//! serves pre-rendered manifests straight from a chart's `templates/`
//! directory, which is all the harness and its fixtures need.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One rendered manifest document.
#[derive(Debug, Clone)]
pub struct Document {
    /// File name of the template this document came from.
    pub template: String,
    /// Position in the chart's full render output.
    pub index: usize,
    pub body: serde_yaml::Value,
}

/// Turns a chart directory plus values overrides into an ordered document
/// set. Implementations must be deterministic: same inputs, same order.
pub trait Renderer {
    fn render(&self, chart_path: &Path, values: &[PathBuf]) -> Result<Vec<Document>>;
}

/// Renderer that loads `templates/*.{yaml,yml}` as multi-document YAML, in
/// sorted file order. Values files are validated to exist but not
/// interpreted; expansion belongs to a real template engine behind the same
/// trait.
#[derive(Debug, Default)]
pub struct StaticRenderer;

impl Renderer for StaticRenderer {
    fn render(&self, chart_path: &Path, values: &[PathBuf]) -> Result<Vec<Document>> {
        for file in values {
            if !file.is_file() {
                return Err(render_error(
                    chart_path,
                    format!("values file not found: {}", file.display()),
                ));
            }
        }

        let templates_dir = chart_path.join("templates");
        if !templates_dir.is_dir() {
            return Err(render_error(chart_path, "no templates directory"));
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&templates_dir)
            .map_err(|e| render_error(chart_path, e.to_string()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| is_manifest(p))
            .collect();
        files.sort();

        let mut documents = Vec::new();
        for file in &files {
            let template = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content =
                fs::read_to_string(file).map_err(|e| render_error(chart_path, e.to_string()))?;

            for de in serde_yaml::Deserializer::from_str(&content) {
                let body = serde_yaml::Value::deserialize(de).map_err(|e| {
                    render_error(chart_path, format!("{}: {}", template, e))
                })?;
                if body.is_null() {
                    continue;
                }
                documents.push(Document {
                    template: template.clone(),
                    index: documents.len(),
                    body,
                });
            }
        }

        Ok(documents)
    }
}

fn is_manifest(path: &Path) -> bool {
    path.is_file()
        && matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        )
}

fn render_error(chart: &Path, message: impl Into<String>) -> Error {
    Error::Render {
        chart: chart.to_path_buf(),
        message: message.into(),
    }
}
