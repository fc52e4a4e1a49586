//! ngxgen - NGINX configuration generator
//!
//! Turns a YAML service description into an NGINX configuration file in
//! four steps: load the YAML, validate it against a JSON Schema, render a
//! Jinja-style template with it, and write the result.
//!
//! # Derived Files
//!
//! The configuration's `template` and `name` fields select every other file
//! involved, relative to the working directory:
//!
//! - `schema-<template>.json` - the JSON Schema the configuration must satisfy
//! - `template-<template>.j2` - the template to render
//! - `<template>-<name>.conf` - the generated configuration
//!
//! # Core Modules
//!
//! - [`document`] - YAML/JSON loading into `serde_json::Value` trees
//! - [`naming`] - derivation of the schema, template and output paths
//! - [`schema`] - JSON Schema validation and the first-violation report
//! - [`templating`] - Tera rendering with Jinja block whitespace rules
//! - [`pipeline`] - the load → validate → render → write sequence
//!
//! ## Supporting Modules
//! - [`cli`] - argument parsing, logging setup and status output
//! - [`core`] - error types and user-facing error display
//! - [`utils`] - file system helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use ngxgen::pipeline::Pipeline;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), ngxgen::core::NgxError> {
//! let report = Pipeline::default().run(Path::new("api.yaml"))?;
//! println!("wrote {}", report.paths.output.display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod document;
pub mod naming;
pub mod pipeline;
pub mod schema;
pub mod templating;
pub mod utils;
