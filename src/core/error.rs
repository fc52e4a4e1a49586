//! Error handling for ngxgen
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`NgxError`]) for precise handling in code
//! 2. **User-friendly display** ([`ErrorContext`]) for the terminal
//!
//! # Error Classes
//!
//! Failures fall into two classes with different exit behaviour:
//!
//! - **Operator-actionable** (exit code 1): a missing input, schema or
//!   template file, and schema validation failures. These print a short,
//!   stable report on stdout.
//! - **Unexpected** (exit code 2): malformed YAML/JSON, schemas that do not
//!   compile, template errors and write failures. These print a colored
//!   `error:`/`details:`/`suggestion:` block on stderr.
//!
//! Use [`user_friendly_error`] to turn any [`anyhow::Error`] into an
//! [`ErrorContext`] ready for display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ngxgen::core::{NgxError, user_friendly_error};
//! use std::path::PathBuf;
//!
//! let error = NgxError::SchemaNotFound {
//!     path: PathBuf::from("schema-nginx.json"),
//! };
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display();
//! std::process::exit(context.exit_code());
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::file_error::FileOperationError;
use crate::document::DocumentFormat;
use crate::schema::ValidationReport;
use crate::templating::TemplateError;

/// Exit code for operator-actionable failures (missing files, invalid data).
pub const EXIT_ACTIONABLE: i32 = 1;

/// Exit code for every other failure.
pub const EXIT_UNEXPECTED: i32 = 2;

/// The main error type for ngxgen operations.
///
/// # Error Categories
///
/// ## Missing files
/// - [`InputNotFound`] - the YAML configuration passed on the command line
/// - [`SchemaNotFound`] - the derived `schema-<template>.json`
/// - [`TemplateNotFound`] - the derived `template-<template>.j2`
///
/// ## Data problems
/// - [`ParseError`] - a document is not well-formed YAML/JSON
/// - [`SchemaCompile`] - the schema itself is not a valid JSON Schema
/// - [`ValidationFailed`] - the configuration violates the schema
///
/// ## Rendering and output
/// - [`Template`] - template syntax errors and undefined variables
/// - [`FileOperation`] - read/write failures with file context
///
/// [`InputNotFound`]: NgxError::InputNotFound
/// [`SchemaNotFound`]: NgxError::SchemaNotFound
/// [`TemplateNotFound`]: NgxError::TemplateNotFound
/// [`ParseError`]: NgxError::ParseError
/// [`SchemaCompile`]: NgxError::SchemaCompile
/// [`ValidationFailed`]: NgxError::ValidationFailed
/// [`Template`]: NgxError::Template
/// [`FileOperation`]: NgxError::FileOperation
#[derive(Error, Debug)]
pub enum NgxError {
    /// The configuration file given on the command line does not exist
    #[error("YAML file '{}' not found", .path.display())]
    InputNotFound {
        /// Path as given by the user
        path: PathBuf,
    },

    /// The schema derived from the `template` field does not exist
    #[error("JSON Schema file '{}' not found", .path.display())]
    SchemaNotFound {
        /// Derived schema path
        path: PathBuf,
    },

    /// The template derived from the `template` field does not exist
    #[error("Jinja2 template file '{}' not found", .path.display())]
    TemplateNotFound {
        /// Derived template path
        path: PathBuf,
    },

    /// A document could not be parsed in its expected format
    #[error("Invalid {format} in {}: {reason}", .path.display())]
    ParseError {
        /// Path of the document that failed to parse
        path: PathBuf,
        /// Format the document was parsed as
        format: DocumentFormat,
        /// Parser message
        reason: String,
    },

    /// The schema document is not a usable JSON Schema
    #[error("Schema {} could not be compiled: {reason}", .path.display())]
    SchemaCompile {
        /// Path of the schema
        path: PathBuf,
        /// Compiler message
        reason: String,
    },

    /// The configuration does not conform to its schema
    #[error("Schema validation failed: {}", .0.message)]
    ValidationFailed(Box<ValidationReport>),

    /// Template rendering failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A file could not be read or written
    #[error(transparent)]
    FileOperation(#[from] FileOperationError),

    /// Any other failure
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl NgxError {
    /// Whether this error is one the operator is expected to fix and is
    /// reported with a short stdout message and exit code 1.
    #[must_use]
    pub fn is_operator_actionable(&self) -> bool {
        matches!(
            self,
            Self::InputNotFound { .. }
                | Self::SchemaNotFound { .. }
                | Self::TemplateNotFound { .. }
                | Self::ValidationFailed(_)
        )
    }

    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.is_operator_actionable() {
            EXIT_ACTIONABLE
        } else {
            EXIT_UNEXPECTED
        }
    }

    /// The stdout report for operator-actionable errors.
    ///
    /// Missing files produce a single `Error: ... not found.` line and
    /// validation failures the multi-line [`ValidationReport`]. Other
    /// variants fall back to their `Display` text.
    #[must_use]
    pub fn operator_message(&self) -> String {
        match self {
            Self::InputNotFound { .. }
            | Self::SchemaNotFound { .. }
            | Self::TemplateNotFound { .. } => format!("Error: {self}."),
            Self::ValidationFailed(report) => report.to_string(),
            other => other.to_string(),
        }
    }
}

/// Error wrapper carrying user-facing suggestions and details.
///
/// `ErrorContext` wraps an [`NgxError`] and adds an optional suggestion
/// (displayed in green) and optional details (displayed in yellow).
///
/// # Examples
///
/// ```rust,no_run
/// use ngxgen::core::{ErrorContext, NgxError};
///
/// let context = ErrorContext::new(NgxError::Other {
///     message: "disk full".to_string(),
/// })
/// .with_suggestion("Free some space and run again")
/// .with_details("The output file could not be written");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: NgxError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: NgxError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Process exit code for the wrapped error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }

    /// Display the error to the terminal.
    ///
    /// Operator-actionable errors print their plain report to stdout.
    /// Everything else prints to stderr with color coding:
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        if self.error.is_operator_actionable() {
            println!("{}", self.error.operator_message());
            return;
        }

        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Build the display context for a known [`NgxError`].
#[must_use]
pub fn create_error_context(error: NgxError) -> ErrorContext {
    match &error {
        NgxError::InputNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Check the path to the YAML configuration file"),
        NgxError::SchemaNotFound { .. } => ErrorContext::new(error).with_suggestion(
            "Create the schema next to the configuration or fix the 'template' field",
        ),
        NgxError::TemplateNotFound { .. } => ErrorContext::new(error).with_suggestion(
            "Create the template next to the configuration or fix the 'template' field",
        ),
        NgxError::ValidationFailed(_) => ErrorContext::new(error),
        NgxError::ParseError { format, .. } => {
            let details = format!("The file is not well-formed {format}");
            ErrorContext::new(error)
                .with_suggestion("Fix the syntax error at the reported line and column")
                .with_details(details)
        }
        NgxError::SchemaCompile { .. } => ErrorContext::new(error)
            .with_suggestion("Check the schema against the JSON Schema specification")
            .with_details("The schema was parsed as JSON but is not a valid JSON Schema"),
        NgxError::Template(template_error) => {
            let details = template_error.format_with_context();
            ErrorContext::new(error)
                .with_suggestion("Check your template syntax and variable names")
                .with_details(details)
        }
        NgxError::FileOperation(file_error) => {
            let details = file_error.user_message();
            let suggestion = if file_error.source.kind() == std::io::ErrorKind::PermissionDenied {
                "Check file permissions and try running with appropriate privileges"
            } else {
                "Check that the path exists and you have the necessary permissions"
            };
            ErrorContext::new(error).with_suggestion(suggestion).with_details(details)
        }
        NgxError::Other { .. } => ErrorContext::new(error)
            .with_suggestion("Run again with --verbose for more information"),
    }
}

/// Convert any error into an [`ErrorContext`] for display.
///
/// [`NgxError`] values get tailored suggestions; anything else keeps its
/// full cause chain in the details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<NgxError>() {
        Ok(ngx_error) => return create_error_context(ngx_error),
        Err(other) => other,
    };

    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let context = ErrorContext::new(NgxError::Other {
        message: error.to_string(),
    })
    .with_suggestion("Check the error message above for more details");

    if chain.is_empty() {
        context
    } else {
        context.with_details(chain.join("\n  → "))
    }
}
