//! Loading YAML and JSON documents into `serde_json::Value` trees.
//!
//! Configurations are YAML and schemas are JSON, but everything downstream
//! (validation, naming, rendering) works on a single JSON value tree. YAML is
//! parsed with `serde_yaml` and converted node by node, so integers stay
//! integers and the data the schema sees is exactly the data the template
//! sees.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ngxgen::document::{load_json, load_yaml};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), ngxgen::core::NgxError> {
//! let config = load_yaml(Path::new("api.yaml"))?;
//! let schema = load_json(Path::new("schema-nginx.json"))?;
//! assert!(config.get("name").is_some());
//! # let _ = schema;
//! # Ok(())
//! # }
//! ```

use serde_json::Value;
use std::fmt;
use std::path::Path;

use crate::core::NgxError;
use crate::core::file_error::{FileOperation, FileResultExt};

/// Structured-data formats understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML 1.2 (configurations)
    Yaml,
    /// JSON (schemas)
    Json,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "YAML"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

/// Load a YAML document.
pub fn load_yaml(path: &Path) -> Result<Value, NgxError> {
    load_as(path, DocumentFormat::Yaml)
}

/// Load a JSON document.
pub fn load_json(path: &Path) -> Result<Value, NgxError> {
    load_as(path, DocumentFormat::Json)
}

fn load_as(path: &Path, format: DocumentFormat) -> Result<Value, NgxError> {
    let content = std::fs::read_to_string(path).with_file_context(
        FileOperation::Read,
        path,
        format!("loading {format} document"),
        "document::load",
    )?;

    tracing::debug!("Loaded {} bytes of {} from {}", content.len(), format, path.display());
    parse_str(&content, format, path)
}

/// Parse in-memory text in the given format.
///
/// `origin` is only used for error messages.
pub fn parse_str(content: &str, format: DocumentFormat, origin: &Path) -> Result<Value, NgxError> {
    let parse_error = |reason: String| NgxError::ParseError {
        path: origin.to_path_buf(),
        format,
        reason,
    };

    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        DocumentFormat::Yaml => {
            // An empty (or comment-only) document is null, not an error.
            if content.trim().is_empty() || is_comment_only(content) {
                return Ok(Value::Null);
            }
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
            yaml_to_json_value(&yaml).map_err(parse_error)
        }
    }
}

fn is_comment_only(content: &str) -> bool {
    content.lines().map(str::trim).all(|line| line.is_empty() || line.starts_with('#'))
}

/// Convert a `serde_yaml::Value` into the equivalent `serde_json::Value`.
///
/// Tags are dropped (the tagged value is kept). Map keys must be scalars;
/// numbers and booleans become their string form. Non-finite floats have no
/// JSON representation and are rejected.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            seq.iter().map(yaml_to_json_value).collect::<Result<Vec<_>, _>>().map(Value::Array)
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
