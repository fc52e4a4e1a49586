//! File system helpers for reading inputs and writing the rendered output.
//!
//! Both helpers attach a [`FileOperationError`] context naming the operation,
//! the path and why the file was touched, so failures surface with a useful
//! message instead of a bare `io::Error`.

use std::fs;
use std::path::Path;

use crate::core::file_error::{FileOperation, FileOperationError, FileResultExt};

/// Reads a UTF-8 text file.
///
/// # Errors
/// Returns a [`FileOperationError`] if the file cannot be read or is not
/// valid UTF-8.
pub fn read_text_file(path: &Path, purpose: &str) -> Result<String, FileOperationError> {
    fs::read_to_string(path).with_file_context(
        FileOperation::Read,
        path,
        purpose,
        "utils::fs::read_text_file",
    )
}

/// Writes text to a file, creating it or truncating an existing one.
///
/// The content is written verbatim; no trailing newline is added. The parent
/// directory must already exist.
///
/// # Errors
/// Returns a [`FileOperationError`] on permission or path errors.
pub fn write_text_file(path: &Path, content: &str) -> Result<(), FileOperationError> {
    fs::write(path, content).with_file_context(
        FileOperation::Write,
        path,
        "writing rendered configuration",
        "utils::fs::write_text_file",
    )?;
    tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
