//! Integration test suite for ngxgen
//!
//! End-to-end tests that run the compiled binary against files in a
//! temporary directory.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **generate**: successful runs, derived file names and overwrites
//! - **missing_files**: missing configuration, schema and template
//! - **validation**: schema violations and the validation report
//! - **rendering**: template whitespace, includes and template errors

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod generate;
mod rendering;
mod validation;
