//! Core types shared across ngxgen
//!
//! - [`error`] - [`NgxError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`file_error`] - file operations that carry their own context
//!
//! Library functions return `Result<_, NgxError>`; the binary converts
//! failures into an [`ErrorContext`] for display and an exit code.

pub mod error;
pub mod file_error;

pub use error::{
    EXIT_ACTIONABLE, EXIT_UNEXPECTED, ErrorContext, NgxError, create_error_context,
    user_friendly_error,
};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
