//! Template error handling
//!
//! Structured errors for template rendering, with a detailed multi-line
//! rendering for the `details:` block of the error display.

use std::fmt::Write as _;

/// Errors raised while loading or rendering a template
#[derive(Debug)]
pub enum TemplateError {
    /// The template referenced a variable the configuration does not define
    VariableNotFound {
        variable: String,
        /// Known variables close to the missing one
        suggestions: Vec<String>,
        template: String,
        line: Option<usize>,
    },

    /// The template could not be parsed or a tag/filter failed
    Syntax {
        message: String,
        template: String,
        line: Option<usize>,
    },

    /// A template pulled in through `include`, `extends` or `import` could
    /// not be read
    Load {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::VariableNotFound {
                variable,
                ..
            } => write!(f, "Template variable not found: '{variable}'"),
            TemplateError::Syntax {
                message,
                ..
            } => write!(f, "Template syntax error: {message}"),
            TemplateError::Load {
                name,
                source,
            } => write!(f, "Failed to load template '{name}': {source}"),
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::Load {
                source,
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl TemplateError {
    /// Line reported by the template engine, if any
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            TemplateError::VariableNotFound {
                line,
                ..
            }
            | TemplateError::Syntax {
                line,
                ..
            } => *line,
            TemplateError::Load {
                ..
            } => None,
        }
    }

    /// Generate user-friendly error message with context and suggestions
    #[must_use]
    pub fn format_with_context(&self) -> String {
        match self {
            TemplateError::VariableNotFound {
                variable,
                suggestions,
                template,
                line,
            } => format_variable_not_found_error(variable, suggestions, template, *line),
            TemplateError::Syntax {
                message,
                template,
                line,
            } => format_syntax_error(message, template, *line),
            TemplateError::Load {
                name,
                source,
            } => format_load_error(name, source.as_ref()),
        }
    }
}

fn format_variable_not_found_error(
    variable: &str,
    suggestions: &[String],
    template: &str,
    line: Option<usize>,
) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Variable Not Found\n\n");
    let _ = writeln!(msg, "Variable: {variable}");
    let _ = writeln!(msg, "Template: {template}");
    if let Some(line) = line {
        let _ = writeln!(msg, "Line: {line}");
    }
    msg.push('\n');

    if !suggestions.is_empty() {
        msg.push_str("Did you mean one of these?\n");
        for suggestion in suggestions {
            let _ = writeln!(msg, "  - {suggestion}");
        }
        msg.push('\n');
    }

    if !variable.starts_with("nginx.") && variable != "nginx" {
        msg.push_str(
            "SUGGESTION: Configuration values are available under 'nginx', e.g. {{ nginx.port }}\n",
        );
    } else {
        msg.push_str("SUGGESTION: Add the key to the YAML configuration or guard it with\n");
        let _ = writeln!(msg, "{{% if {variable} is defined %}}");
    }

    msg
}

fn format_syntax_error(message: &str, template: &str, line: Option<usize>) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Syntax Error\n\n");
    let _ = writeln!(msg, "Error: {message}");
    let _ = writeln!(msg, "Template: {template}");
    if let Some(line) = line {
        let _ = writeln!(msg, "Line: {line}");
    }

    msg.push_str("\nSUGGESTION: Check template syntax for unclosed tags or invalid expressions.\n");
    msg.push_str("Common issues:\n");
    msg.push_str("  - Unclosed {{ }} or {% %} delimiters\n");
    msg.push_str("  - Invalid filter names\n");
    msg.push_str("  - Missing quotes around string values\n");

    msg
}

fn format_load_error(name: &str, source: &(dyn std::error::Error + Send + Sync)) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Load Failed\n\n");
    let _ = writeln!(msg, "Template: {name}");
    let _ = writeln!(msg, "Error: {source}");
    msg.push_str(
        "\nSUGGESTION: Included, extended and imported templates are looked up next to the main template.\n",
    );

    msg
}
