//! Test-file DSL parsing.
//!
//! A test file is a YAML document with an optional suite `name` and a list
//! of `tests`, each carrying an ordered list of assertions. Assertions are
//! externally tagged maps (`- equal: {path: ..., value: ...}`), so the
//! operator vocabulary is the serde enum below.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// One parsed test file; maps to exactly one reported suite.
#[derive(Debug, Deserialize)]
pub struct TestFile {
    /// Suite name; defaults to the file stem when absent.
    #[serde(default)]
    pub name: Option<String>,
    pub tests: Vec<TestCase>,
}

/// A named assertion unit evaluated against the chart's rendered documents.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Human-readable case name.
    pub it: String,
    /// Restrict evaluation to documents rendered from this template file.
    /// When absent, assertions must hold for every rendered document.
    #[serde(default)]
    pub template: Option<String>,
    /// Pick one document (by position within the template-filtered set).
    #[serde(default)]
    pub document_index: Option<usize>,
    pub asserts: Vec<AssertionSpec>,
}

/// The assertion operator vocabulary.
///
/// Assertions are written as single-operator maps
/// (`- equal: {path: ..., value: ...}`), so deserialization reads a
/// one-entry mapping and dispatches on its key; see the manual
/// [`Deserialize`] impl below.
#[derive(Debug)]
pub enum AssertionSpec {
    Equal {
        path: String,
        value: serde_yaml::Value,
    },
    NotEqual {
        path: String,
        value: serde_yaml::Value,
    },
    Contains {
        path: String,
        content: serde_yaml::Value,
    },
    NotContains {
        path: String,
        content: serde_yaml::Value,
    },
    Exists {
        path: String,
    },
    NotExists {
        path: String,
    },
    MatchRegex {
        path: String,
        pattern: String,
    },
    NotMatchRegex {
        path: String,
        pattern: String,
    },
    GreaterThan {
        path: String,
        value: f64,
    },
    LessThan {
        path: String,
        value: f64,
    },
}

// Per-operator field sets, deserialized from the value under the operator
// key.
#[derive(Deserialize)]
struct PathValue {
    path: String,
    value: serde_yaml::Value,
}

#[derive(Deserialize)]
struct PathContent {
    path: String,
    content: serde_yaml::Value,
}

#[derive(Deserialize)]
struct PathOnly {
    path: String,
}

#[derive(Deserialize)]
struct PathPattern {
    path: String,
    pattern: String,
}

#[derive(Deserialize)]
struct PathNumber {
    path: String,
    value: f64,
}

impl<'de> serde::Deserialize<'de> for AssertionSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let mapping = serde_yaml::Mapping::deserialize(deserializer)?;
        let mut entries = mapping.into_iter();
        let (key, payload) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(D::Error::custom(
                    "an assertion is a map with exactly one operator key",
                ))
            }
        };
        let operator = key
            .as_str()
            .ok_or_else(|| D::Error::custom("assertion operator must be a string"))?;

        fn fields<T, E>(payload: serde_yaml::Value) -> std::result::Result<T, E>
        where
            T: serde::de::DeserializeOwned,
            E: serde::de::Error,
        {
            serde_yaml::from_value(payload).map_err(E::custom)
        }

        match operator {
            "equal" => fields(payload)
                .map(|PathValue { path, value }| AssertionSpec::Equal { path, value }),
            "notEqual" => fields(payload)
                .map(|PathValue { path, value }| AssertionSpec::NotEqual { path, value }),
            "contains" => fields(payload)
                .map(|PathContent { path, content }| AssertionSpec::Contains { path, content }),
            "notContains" => fields(payload)
                .map(|PathContent { path, content }| AssertionSpec::NotContains { path, content }),
            "exists" => fields(payload).map(|PathOnly { path }| AssertionSpec::Exists { path }),
            "notExists" => {
                fields(payload).map(|PathOnly { path }| AssertionSpec::NotExists { path })
            }
            "matchRegex" => fields(payload)
                .map(|PathPattern { path, pattern }| AssertionSpec::MatchRegex { path, pattern }),
            "notMatchRegex" => fields(payload).map(|PathPattern { path, pattern }| {
                AssertionSpec::NotMatchRegex { path, pattern }
            }),
            "greaterThan" => fields(payload)
                .map(|PathNumber { path, value }| AssertionSpec::GreaterThan { path, value }),
            "lessThan" => fields(payload)
                .map(|PathNumber { path, value }| AssertionSpec::LessThan { path, value }),
            other => Err(D::Error::custom(format!(
                "unknown assertion operator '{other}'"
            ))),
        }
    }
}

impl AssertionSpec {
    /// The operator name as written in test files.
    pub fn operator(&self) -> &'static str {
        match self {
            AssertionSpec::Equal { .. } => "equal",
            AssertionSpec::NotEqual { .. } => "notEqual",
            AssertionSpec::Contains { .. } => "contains",
            AssertionSpec::NotContains { .. } => "notContains",
            AssertionSpec::Exists { .. } => "exists",
            AssertionSpec::NotExists { .. } => "notExists",
            AssertionSpec::MatchRegex { .. } => "matchRegex",
            AssertionSpec::NotMatchRegex { .. } => "notMatchRegex",
            AssertionSpec::GreaterThan { .. } => "greaterThan",
            AssertionSpec::LessThan { .. } => "lessThan",
        }
    }

    /// The selector path the assertion targets.
    pub fn path(&self) -> &str {
        match self {
            AssertionSpec::Equal { path, .. }
            | AssertionSpec::NotEqual { path, .. }
            | AssertionSpec::Contains { path, .. }
            | AssertionSpec::NotContains { path, .. }
            | AssertionSpec::Exists { path }
            | AssertionSpec::NotExists { path }
            | AssertionSpec::MatchRegex { path, .. }
            | AssertionSpec::NotMatchRegex { path, .. }
            | AssertionSpec::GreaterThan { path, .. }
            | AssertionSpec::LessThan { path, .. } => path,
        }
    }
}

/// Load and parse one test file.
///
/// Malformed YAML yields [`Error::Parse`] with the file path and, when the
/// parser reports one, the offending line.
pub fn load_test_file(path: &Path) -> Result<TestFile> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| Error::parse(path, e))
}

/// Suite name for a test file: explicit `name` or the file stem.
pub fn suite_name(file: &Path, parsed: Option<&TestFile>) -> String {
    parsed
        .and_then(|tf| tf.name.clone())
        .unwrap_or_else(|| {
            file.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string())
        })
}
