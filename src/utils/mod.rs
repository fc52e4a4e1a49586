//! Shared utilities
//!
//! - [`fs`] - reading inputs and writing the rendered output with file
//!   context attached to errors

pub mod fs;

pub use fs::{read_text_file, write_text_file};
