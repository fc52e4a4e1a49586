//! Derived file names.
//!
//! A configuration names its template family and service:
//!
//! ```yaml
//! name: api
//! template: nginx
//! ```
//!
//! From those two fields the tool derives, relative to the working
//! directory:
//!
//! | Role     | Pattern                     | Example             |
//! |----------|-----------------------------|---------------------|
//! | schema   | `schema-<template>.json`    | `schema-nginx.json` |
//! | template | `template-<template>.j2`    | `template-nginx.j2` |
//! | output   | `<template>-<name>.conf`    | `nginx-api.conf`    |
//!
//! The fields are not validated here. A missing or `null` field yields an
//! empty identifier, so the derived schema (`schema-.json`) is not found and
//! the run stops with a missing-file error.

use serde_json::Value;
use std::path::{Path, PathBuf};

/// Configuration key holding the service identifier
pub const NAME_FIELD: &str = "name";

/// Configuration key holding the template family identifier
pub const TEMPLATE_FIELD: &str = "template";

/// Paths derived from a configuration's `name` and `template` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPaths {
    /// Service identifier text
    pub name: String,
    /// Template family identifier text
    pub template: String,
    /// `schema-<template>.json`
    pub schema: PathBuf,
    /// `template-<template>.j2`
    pub template_file: PathBuf,
    /// `<template>-<name>.conf`
    pub output: PathBuf,
}

impl DerivedPaths {
    /// Derive the paths from a loaded configuration document.
    #[must_use]
    pub fn from_config(config: &Value) -> Self {
        let name = identifier_text(config.get(NAME_FIELD));
        let template = identifier_text(config.get(TEMPLATE_FIELD));
        Self::from_identifiers(name, template)
    }

    /// Derive the paths from identifier text directly.
    #[must_use]
    pub fn from_identifiers(name: impl Into<String>, template: impl Into<String>) -> Self {
        let name = name.into();
        let template = template.into();
        Self {
            schema: PathBuf::from(format!("schema-{template}.json")),
            template_file: PathBuf::from(format!("template-{template}.j2")),
            output: PathBuf::from(format!("{template}-{name}.conf")),
            name,
            template,
        }
    }

    /// Resolve all three paths against a working directory.
    ///
    /// Identifiers that contain path separators are kept as they are, so
    /// `template: sites/nginx` looks for `schema-sites/nginx.json`.
    #[must_use]
    pub fn resolve_in(&self, workdir: &Path) -> Self {
        Self {
            name: self.name.clone(),
            template: self.template.clone(),
            schema: workdir.join(&self.schema),
            template_file: workdir.join(&self.template_file),
            output: workdir.join(&self.output),
        }
    }
}

/// Text used for an identifier field inside a file name.
///
/// Strings are used verbatim, numbers and booleans use their JSON text,
/// absent and `null` fields are empty, and composite values use their
/// compact JSON form.
#[must_use]
pub fn identifier_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
