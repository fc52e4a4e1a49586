//! Template rendering engine with Tera.
//!
//! [`TemplateRenderer`] loads a template and everything it pulls in from
//! the template directory, applies the Jinja whitespace pass to each source
//! and renders it with the configuration bound as `nginx`.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::error::TemplateError;
use super::whitespace::{apply_block_whitespace, without_raw_bodies};

/// Name the configuration is bound to inside templates
pub const CONTEXT_NAME: &str = "nginx";

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
/// This represents a 50% similarity threshold for variable name suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Nesting depth explored when listing known variables for suggestions
const MAX_SUGGESTION_DEPTH: usize = 6;

/// `include`, `extends` and `import` tags; group 1 is the referenced name
const REFERENCE_PATTERN: &str =
    r#"\{%[-+]?\s*(?:include|extends|import)\s+["'`]([^"'`]+)["'`]([^%]*?)[-+]?%\}"#;

/// Renders templates from a directory with Jinja-compatible block whitespace.
///
/// Templates referenced by name through `{% include %}`, `{% extends %}` or
/// `{% import %}` are resolved against the root directory and loaded
/// recursively, each going through the same whitespace pass.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    root: PathBuf,
}

impl TemplateRenderer {
    /// Create a renderer that resolves referenced templates under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// Directory referenced templates are loaded from
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Render template source with `config` bound as `nginx`.
    ///
    /// `name` identifies the template in errors and must not clash with a
    /// referenced template name.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::Load`] if a referenced template cannot be read
    /// - [`TemplateError::VariableNotFound`] for undefined variables
    /// - [`TemplateError::Syntax`] for anything else Tera rejects
    pub fn render(&self, name: &str, source: &str, config: &Value) -> Result<String, TemplateError> {
        let templates = self.collect_templates(name, source)?;
        tracing::debug!("Loaded {} template(s) for '{}'", templates.len(), name);

        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.add_raw_templates(templates)
            .map_err(|e| Self::parse_tera_error(&e, name, config))?;

        let mut context = TeraContext::new();
        context.insert(CONTEXT_NAME, config);

        tracing::debug!("Rendering template with context");
        Self::log_context_as_kv(config);

        let rendered = tera
            .render(name, &context)
            .map_err(|e| Self::parse_tera_error(&e, name, config))?;

        tracing::debug!("Template rendering complete ({} bytes)", rendered.len());
        Ok(rendered)
    }

    /// Gather the main template and every template it references,
    /// whitespace-adjusted and keyed by name.
    fn collect_templates(
        &self,
        name: &str,
        source: &str,
    ) -> Result<Vec<(String, String)>, TemplateError> {
        let mut seen = BTreeSet::from([name.to_string()]);
        let mut pending = vec![(name.to_string(), source.to_string())];
        let mut templates = Vec::new();

        while let Some((current, raw)) = pending.pop() {
            let adjusted = apply_block_whitespace(&raw);
            for (reference, optional) in Self::references(&without_raw_bodies(&adjusted)) {
                if !seen.insert(reference.clone()) {
                    continue;
                }

                let path = self.root.join(&reference);
                match std::fs::read_to_string(&path) {
                    Ok(content) => {
                        tracing::debug!("Loading '{}' referenced by '{}'", reference, current);
                        pending.push((reference, content));
                    }
                    Err(e) if optional && e.kind() == std::io::ErrorKind::NotFound => {
                        tracing::debug!("Skipping missing optional include '{}'", reference);
                    }
                    Err(e) => {
                        return Err(TemplateError::Load {
                            name: reference,
                            source: Box::new(e),
                        });
                    }
                }
            }
            templates.push((current, adjusted));
        }

        Ok(templates)
    }

    /// Template names referenced by a source, with whether the reference is
    /// an `ignore missing` include.
    ///
    /// Comments and raw bodies must already be removed from `source`.
    fn references(source: &str) -> Vec<(String, bool)> {
        let Ok(re) = Regex::new(REFERENCE_PATTERN) else {
            return Vec::new();
        };
        re.captures_iter(source)
            .map(|caps| {
                let optional = caps.get(2).is_some_and(|m| m.as_str().contains("ignore missing"));
                (caps[1].to_string(), optional)
            })
            .collect()
    }

    /// Parse a Tera error into a structured TemplateError
    fn parse_tera_error(error: &tera::Error, template: &str, config: &Value) -> TemplateError {
        let message = Self::format_tera_error(error);
        let line = Self::extract_line_from_tera_error(&message);

        if let Some(variable) = Self::extract_variable_name(&message) {
            let available = Self::available_variables(config);
            let suggestions = Self::find_similar_variables(&variable, &available);
            return TemplateError::VariableNotFound {
                variable,
                suggestions,
                template: template.to_string(),
                line,
            };
        }

        TemplateError::Syntax {
            message,
            template: template.to_string(),
            line,
        }
    }

    /// Extract variable name from "Variable `foo` not found" message
    fn extract_variable_name(error_msg: &str) -> Option<String> {
        let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
        re.captures(error_msg).map(|caps| caps[1].to_string())
    }

    /// Extract line number from a Tera error message
    ///
    /// Tera includes line:column information in parse error messages.
    /// Examples: "1:7", "15:23", "864:1"
    fn extract_line_from_tera_error(error_msg: &str) -> Option<usize> {
        let re = Regex::new(r"(\d+):(\d+)").ok()?;
        re.captures(error_msg).and_then(|caps| caps[1].parse::<usize>().ok())
    }

    /// Dotted paths of every value in the configuration, rooted at `nginx`.
    fn available_variables(config: &Value) -> Vec<String> {
        fn walk(prefix: &str, value: &Value, depth: usize, out: &mut Vec<String>) {
            out.push(prefix.to_string());
            if depth >= MAX_SUGGESTION_DEPTH {
                return;
            }
            if let Value::Object(map) = value {
                for (key, child) in map {
                    walk(&format!("{prefix}.{key}"), child, depth + 1, out);
                }
            }
        }

        let mut vars = Vec::new();
        walk(CONTEXT_NAME, config, 0, &mut vars);
        vars
    }

    /// Find similar variable names using Levenshtein distance
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> = available
            .iter()
            .filter(|var| var.as_str() != target)
            .map(|var| (var.clone(), levenshtein(target, var)))
            .collect();

        scored.sort_by_key(|(_, dist)| *dist);

        // Return top 3 suggestions within reasonable distance
        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Flatten a Tera error chain into one message.
    ///
    /// The outer "Failed to render" wrappers carry no information beyond the
    /// template name, so only the innermost useful messages are kept.
    pub fn format_tera_error(error: &tera::Error) -> String {
        use std::error::Error;

        let mut all_messages = vec![error.to_string()];
        let mut current_error: Option<&dyn Error> = error.source();
        while let Some(err) = current_error {
            all_messages.push(err.to_string());
            current_error = err.source();
        }

        let messages: Vec<String> = all_messages
            .into_iter()
            .map(|msg| msg.trim().to_string())
            .filter(|msg| {
                !msg.is_empty()
                    && !(msg.starts_with("Failed to render '") && msg.ends_with('\''))
            })
            .collect();

        if messages.is_empty() {
            "Template syntax error (see details above)".to_string()
        } else {
            messages.join("\n  → ")
        }
    }

    /// Format the template context as a string for debug logging.
    fn format_context_as_string(config: &Value) -> String {
        fn format_value(key: &str, value: &Value, indent: usize) -> Vec<String> {
            let prefix = "  ".repeat(indent);
            let mut lines = Vec::new();

            match value {
                Value::Object(map) => {
                    lines.push(format!("{prefix}{key}:"));
                    for (k, v) in map {
                        lines.extend(format_value(k, v, indent + 1));
                    }
                }
                Value::Array(arr) => {
                    lines.push(format!("{prefix}{key}: [{} items]", arr.len()));
                    // Only show first few items to avoid spam
                    for (i, item) in arr.iter().take(3).enumerate() {
                        lines.extend(format_value(&format!("[{i}]"), item, indent + 1));
                    }
                    if arr.len() > 3 {
                        lines.push(format!("{prefix}  ... {} more items", arr.len() - 3));
                    }
                }
                Value::String(s) => {
                    let count = s.chars().count();
                    if count > 100 {
                        let head: String = s.chars().take(97).collect();
                        lines.push(format!("{prefix}{key}: \"{head}...\" ({count} chars)"));
                    } else {
                        lines.push(format!("{prefix}{key}: \"{s}\""));
                    }
                }
                other => lines.push(format!("{prefix}{key}: {other}")),
            }
            lines
        }

        format_value(CONTEXT_NAME, config, 1).join("\n")
    }

    /// Log the template context as key-value pairs at debug level.
    fn log_context_as_kv(config: &Value) {
        let formatted = Self::format_context_as_string(config);
        for line in formatted.lines() {
            tracing::debug!("{}", line);
        }
    }
}
