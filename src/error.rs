//! Error taxonomy for the harness core.
//!
//! Three failure classes exist with different blast radii: rendering and
//! root-path discovery errors are fatal to the whole run, parse errors are
//! scoped to a single suite, and assertion failures are not errors at all
//! (they are reported data carried in `CaseResult`).

use std::path::PathBuf;

/// Errors produced while discovering, rendering, or parsing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The renderer could not produce documents for a chart. Fatal: there is
    /// nothing to test against, so the run aborts.
    #[error("failed to render chart {}: {message}", .chart.display())]
    Render { chart: PathBuf, message: String },

    /// A test file is malformed. Scoped to one suite; siblings continue.
    #[error("{}:{line}: {message}", .file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// A root chart path is missing or has no Chart.yaml. Fatal.
    #[error("not a chart directory: {}", .0.display())]
    Discovery(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a parse error from a serde_yaml failure, capturing the line
    /// number when the parser reports one.
    pub fn parse(file: &std::path::Path, err: serde_yaml::Error) -> Self {
        let line = err.location().map(|loc| loc.line()).unwrap_or(0);
        Error::Parse {
            file: file.to_path_buf(),
            line,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_parse_error_carries_location() {
        let bad: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("a: 1\nb: [unclosed");
        let err = Error::parse(Path::new("suite_test.yaml"), bad.unwrap_err());
        match err {
            Error::Parse { file, line, .. } => {
                assert_eq!(file, Path::new("suite_test.yaml"));
                assert!(line >= 1);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_display_identifies_chart() {
        let err = Error::Render {
            chart: PathBuf::from("charts/web"),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "failed to render chart charts/web: boom");
    }
}
