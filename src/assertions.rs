//! Assertion evaluation against rendered documents.
//!
//! [`evaluate_case`] is a pure function: one test case plus the chart's
//! rendered document set in, one [`CaseResult`] out. Every assertion in the
//! case is evaluated and reported; a missing target, a type mismatch, or an
//! invalid regex becomes a failure description, never a panic. Failures
//! reference the first document the assertion did not hold for.

use regex::Regex;
use serde_yaml::Value;

use crate::parser::{AssertionSpec, TestCase};
use crate::renderer::Document;

/// A single failed assertion, in evaluation order.
#[derive(Debug, Clone)]
pub struct AssertionFailure {
    pub description: String,
}

/// Verdict for one test case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: String,
    pub passed: bool,
    pub failures: Vec<AssertionFailure>,
}

/// Evaluate one test case against a chart's rendered documents.
pub fn evaluate_case(case: &TestCase, documents: &[Document]) -> CaseResult {
    let selected = match select_documents(case, documents) {
        Ok(docs) => docs,
        Err(description) => {
            return CaseResult {
                name: case.it.clone(),
                passed: false,
                failures: vec![AssertionFailure { description }],
            }
        }
    };

    let mut failures = Vec::new();
    for assertion in &case.asserts {
        // The assertion must hold for every selected document; the first
        // offender is reported. Later assertions still run.
        for doc in &selected {
            if let Err(description) = check(assertion, doc) {
                failures.push(AssertionFailure { description });
                break;
            }
        }
    }

    CaseResult {
        name: case.it.clone(),
        passed: failures.is_empty(),
        failures,
    }
}

/// Apply the case's `template` filter and `documentIndex` selection.
fn select_documents<'a>(
    case: &TestCase,
    documents: &'a [Document],
) -> Result<Vec<&'a Document>, String> {
    let filtered: Vec<&Document> = match &case.template {
        Some(template) => documents.iter().filter(|d| &d.template == template).collect(),
        None => documents.iter().collect(),
    };

    if filtered.is_empty() {
        return match &case.template {
            Some(template) => Err(format!(
                "no rendered documents matched template '{}'",
                template
            )),
            None => Err("chart rendered no documents".to_string()),
        };
    }

    match case.document_index {
        Some(idx) if idx < filtered.len() => Ok(vec![filtered[idx]]),
        Some(idx) => Err(format!(
            "documentIndex {} out of range ({} documents)",
            idx,
            filtered.len()
        )),
        None => Ok(filtered),
    }
}

/// Check one assertion against one document. `Err` carries the report line.
fn check(assertion: &AssertionSpec, doc: &Document) -> Result<(), String> {
    let op = assertion.operator();
    let path = assertion.path();
    // A malformed selector fails every operator, including the negated ones.
    let found = resolve(&doc.body, path)
        .map_err(|e| format!("{}: {} (document {})", op, e, doc.index))?;

    match assertion {
        AssertionSpec::Equal { value, .. } => match found {
            None => Err(not_found(op, path, doc)),
            Some(actual) if actual == value => Ok(()),
            Some(actual) => Err(format!(
                "{}: path '{}' expected {}, got {} (document {})",
                op,
                path,
                display_value(value),
                display_value(actual),
                doc.index
            )),
        },
        AssertionSpec::NotEqual { value, .. } => match found {
            None => Err(not_found(op, path, doc)),
            Some(actual) if actual == value => Err(format!(
                "{}: path '{}' still equals {} (document {})",
                op,
                path,
                display_value(value),
                doc.index
            )),
            Some(_) => Ok(()),
        },
        AssertionSpec::Contains { content, .. } => match found {
            None => Err(not_found(op, path, doc)),
            Some(actual) => match holds_content(actual, content) {
                Some(true) => Ok(()),
                Some(false) => Err(format!(
                    "{}: path '{}' does not contain {} (document {})",
                    op,
                    path,
                    display_value(content),
                    doc.index
                )),
                None => Err(not_container(op, path, doc)),
            },
        },
        AssertionSpec::NotContains { content, .. } => match found {
            None => Err(not_found(op, path, doc)),
            Some(actual) => match holds_content(actual, content) {
                Some(false) => Ok(()),
                Some(true) => Err(format!(
                    "{}: path '{}' contains {} (document {})",
                    op,
                    path,
                    display_value(content),
                    doc.index
                )),
                None => Err(not_container(op, path, doc)),
            },
        },
        AssertionSpec::Exists { .. } => match found {
            Some(_) => Ok(()),
            None => Err(not_found(op, path, doc)),
        },
        AssertionSpec::NotExists { .. } => match found {
            None => Ok(()),
            Some(_) => Err(format!(
                "{}: path '{}' present (document {})",
                op, path, doc.index
            )),
        },
        AssertionSpec::MatchRegex { pattern, .. } => {
            check_regex(op, path, pattern, found, doc, true)
        }
        AssertionSpec::NotMatchRegex { pattern, .. } => {
            check_regex(op, path, pattern, found, doc, false)
        }
        AssertionSpec::GreaterThan { value, .. } => {
            check_numeric(op, path, *value, found, doc, |actual, expected| {
                actual > expected
            })
        }
        AssertionSpec::LessThan { value, .. } => {
            check_numeric(op, path, *value, found, doc, |actual, expected| {
                actual < expected
            })
        }
    }
}

fn check_regex(
    op: &str,
    path: &str,
    pattern: &str,
    found: Option<&Value>,
    doc: &Document,
    want_match: bool,
) -> Result<(), String> {
    let re = Regex::new(pattern)
        .map_err(|e| format!("{}: invalid pattern /{}/: {}", op, pattern, e))?;
    let actual = match found {
        None => return Err(not_found(op, path, doc)),
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(format!(
                "{}: path '{}' is not a string (document {})",
                op, path, doc.index
            ))
        }
    };

    match (re.is_match(actual), want_match) {
        (true, true) | (false, false) => Ok(()),
        (false, true) => Err(format!(
            "{}: path '{}' value \"{}\" does not match /{}/ (document {})",
            op, path, actual, pattern, doc.index
        )),
        (true, false) => Err(format!(
            "{}: path '{}' value \"{}\" matches /{}/ (document {})",
            op, path, actual, pattern, doc.index
        )),
    }
}

fn check_numeric(
    op: &str,
    path: &str,
    expected: f64,
    found: Option<&Value>,
    doc: &Document,
    cmp: fn(f64, f64) -> bool,
) -> Result<(), String> {
    let actual = match found {
        None => return Err(not_found(op, path, doc)),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => f,
            None => {
                return Err(format!(
                    "{}: path '{}' is not a number (document {})",
                    op, path, doc.index
                ))
            }
        },
        Some(_) => {
            return Err(format!(
                "{}: path '{}' is not a number (document {})",
                op, path, doc.index
            ))
        }
    };

    if cmp(actual, expected) {
        Ok(())
    } else {
        let relation = if op == "greaterThan" {
            "not greater than"
        } else {
            "not less than"
        };
        Err(format!(
            "{}: path '{}' value {} is {} {} (document {})",
            op, path, actual, relation, expected, doc.index
        ))
    }
}

fn not_found(op: &str, path: &str, doc: &Document) -> String {
    format!("{}: path '{}' not found (document {})", op, path, doc.index)
}

fn not_container(op: &str, path: &str, doc: &Document) -> String {
    format!(
        "{}: path '{}' is not a sequence or string (document {})",
        op, path, doc.index
    )
}

/// Containment: sequences contain an equal element, strings contain a
/// substring. Other target types have no containment semantics.
fn holds_content(actual: &Value, content: &Value) -> Option<bool> {
    match actual {
        Value::Sequence(seq) => Some(seq.iter().any(|item| item == content)),
        Value::String(s) => match content {
            Value::String(needle) => Some(s.contains(needle.as_str())),
            _ => None,
        },
        _ => None,
    }
}

// ── Selector paths ───────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Resolve a dotted selector path with bracket indexing, e.g.
/// `spec.template.spec.containers[0].image`. `Ok(None)` when any segment is
/// missing or indexes a non-collection; `Err` when the path itself is
/// malformed.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Result<Option<&'a Value>, String> {
    let mut current = root;
    for segment in parse_path(path)? {
        let next = match segment {
            Segment::Key(key) => current.get(key.as_str()),
            Segment::Index(idx) => current.as_sequence().and_then(|seq| seq.get(idx)),
        };
        match next {
            Some(value) => current = value,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

fn parse_path(path: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        let mut rest = part;
        // Leading name, then any number of [idx] suffixes.
        if let Some(bracket) = rest.find('[') {
            if bracket > 0 {
                segments.push(Segment::Key(rest[..bracket].to_string()));
            }
            rest = &rest[bracket..];
            while rest.starts_with('[') {
                let Some(end) = rest.find(']') else {
                    return Err(invalid_path(path));
                };
                let idx = rest[1..end]
                    .parse::<usize>()
                    .map_err(|_| invalid_path(path))?;
                segments.push(Segment::Index(idx));
                rest = &rest[end + 1..];
            }
            if !rest.is_empty() {
                return Err(invalid_path(path));
            }
        } else if !rest.is_empty() {
            segments.push(Segment::Key(rest.to_string()));
        }
    }
    Ok(segments)
}

fn invalid_path(path: &str) -> String {
    format!("invalid selector path '{}'", path)
}

/// Compact one-line rendering of a YAML value for failure descriptions.
fn display_value(value: &Value) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|json| serde_json::to_string(&json).ok())
        .unwrap_or_else(|| format!("{value:?}"))
}
