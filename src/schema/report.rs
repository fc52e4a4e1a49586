//! The first-violation report and JSON Pointer helpers.

use serde_json::Value;
use std::fmt;

/// Separator printed after a validation report
pub const REPORT_RULE: &str = "------------------------------------------";

/// One step in a path through a document: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member name
    Key(String),
    /// Array position
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Details of the first schema violation found in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Human-readable message from the validator
    pub message: String,
    /// The schema keyword that failed (`type`, `format`, `required`, ...)
    pub keyword: String,
    /// The failing keyword's value in the schema
    pub expected: Value,
    /// Path from the document root to the offending node
    pub data_path: Vec<PathSegment>,
    /// Path from the schema root to the failing keyword
    pub schema_path: Vec<PathSegment>,
}

impl ValidationReport {
    /// The expected value as printed in the report: strings bare, anything
    /// else as compact JSON.
    #[must_use]
    pub fn expected_text(&self) -> String {
        match &self.expected {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🚨 Validation Error!")?;
        writeln!(f, "🔹 Message: {}", self.message)?;
        writeln!(f, "🔹 Failed Validator: {}", self.keyword)?;
        writeln!(f, "🔹 Expected: {}", self.expected_text())?;
        writeln!(f, "🔹 Data Path: {}", format_path(&self.data_path))?;
        writeln!(f, "🔹 Schema Path: {}", format_path(&self.schema_path))?;
        write!(f, "{REPORT_RULE}")
    }
}

/// Render a path as a list: keys quoted, indices bare.
///
/// `[]` for the root, `["servers", 0, "port"]` otherwise.
#[must_use]
pub fn format_path(path: &[PathSegment]) -> String {
    let parts: Vec<String> = path
        .iter()
        .map(|segment| match segment {
            PathSegment::Key(key) => Value::String(key.clone()).to_string(),
            PathSegment::Index(index) => index.to_string(),
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

/// Split a JSON Pointer (RFC 6901) into segments.
///
/// A numeric token becomes [`PathSegment::Index`] when the node it applies
/// to in `document` is an array. When the walk leaves the document (for
/// example through a `$ref`), numeric tokens are taken as indices.
pub(crate) fn decode_pointer(pointer: &str, document: &Value) -> Vec<PathSegment> {
    if pointer.is_empty() {
        return Vec::new();
    }

    let mut current = Some(document);
    pointer
        .split('/')
        .skip(1)
        .map(|token| {
            let token = token.replace("~1", "/").replace("~0", "~");
            let index = token.parse::<usize>().ok();
            let segment = match (current, index) {
                (Some(Value::Array(_)), Some(i)) => PathSegment::Index(i),
                (Some(Value::Object(_)), _) => PathSegment::Key(token.clone()),
                (None, Some(i)) if !token.starts_with('0') || token == "0" => {
                    PathSegment::Index(i)
                }
                _ => PathSegment::Key(token.clone()),
            };
            current = current.and_then(|node| step(node, &segment));
            segment
        })
        .collect()
}

fn step<'a>(node: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (node, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Array(items), PathSegment::Index(i)) => items.get(*i),
        _ => None,
    }
}

/// Find the schema value at `path`, following local `$ref`s.
///
/// A `$ref` segment, or a key missing from an object that carries a local
/// `$ref`, continues the walk at the referenced subschema.
pub(crate) fn resolve_schema_value<'a>(root: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        if matches!(segment, PathSegment::Key(key) if key == "$ref") {
            if let Some(target) = follow_local_ref(root, current) {
                current = target;
                continue;
            }
        }

        current = match step(current, segment) {
            Some(next) => next,
            None => {
                let target = follow_local_ref(root, current)?;
                step(target, segment)?
            }
        };
    }
    Some(current)
}

fn follow_local_ref<'a>(root: &'a Value, node: &Value) -> Option<&'a Value> {
    let reference = node.get("$ref")?.as_str()?;
    let fragment = reference.strip_prefix('#')?;
    root.pointer(fragment)
}
