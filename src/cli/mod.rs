//! Command-line interface for ngxgen.
//!
//! ngxgen takes a single YAML configuration, validates it against the JSON
//! Schema named by its `template` field and renders the matching template
//! into `<template>-<name>.conf`:
//!
//! ```bash
//! ngxgen api.yaml              # validate and render
//! ngxgen --verbose api.yaml    # with debug logging on stderr
//! ngxgen --no-color api.yaml   # plain output
//! ```
//!
//! # Output
//!
//! Status lines go to stdout. Logging goes to stderr and only shows
//! warnings by default; `RUST_LOG` applies when neither `--verbose` nor
//! `--quiet` is given.
//!
//! # Exit Codes
//!
//! - `0`: the configuration was generated
//! - `1`: a file is missing or the configuration failed validation
//! - `2`: any other failure (malformed YAML/JSON, bad schema, template error,
//!   write error)

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::pipeline::{Pipeline, Stage};

/// Printed as soon as the configuration passes schema validation
pub const VALIDATION_PASSED: &str = "✅ Validation Passed!";

/// Prefix of the final success line, followed by the output path
pub const GENERATED_PREFIX: &str = "✅ NGINX configuration successfully generated:";

/// Level used when no flag is given and `RUST_LOG` is unset
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Runtime configuration for CLI execution.
///
/// Built from the parsed flags by [`Cli::build_config`] and applied once
/// before the pipeline runs. Tests can construct it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter directive for the tracing subscriber.
    ///
    /// `None` defers to `RUST_LOG`, falling back to `warn`.
    pub log_level: Option<String>,

    /// Whether to disable ANSI colors on stdout and stderr
    pub no_color: bool,
}

impl CliConfig {
    /// Create a new CLI configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log filter directive
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Disable colored output
    #[must_use]
    pub const fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// The filter the subscriber is installed with.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        }
    }

    /// Apply color settings and install the logging subscriber.
    ///
    /// A second call leaves the first subscriber in place.
    pub fn apply(&self) {
        if self.no_color {
            colored::control::set_override(false);
        }

        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(!self.no_color)
            .try_init();
    }
}

/// Generate an NGINX configuration from a validated YAML file.
#[derive(Parser, Debug)]
#[command(
    name = "ngxgen",
    about = "Validate a YAML configuration against its JSON Schema and render an NGINX config",
    version,
    long_about = "Reads a YAML configuration, validates it against schema-<template>.json and \
                  renders template-<template>.j2 into <template>-<name>.conf, where <template> \
                  and <name> are the configuration's 'template' and 'name' fields."
)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(value_name = "YAML_FILE")]
    yaml_file: PathBuf,

    /// Enable debug logging on stderr.
    ///
    /// Shows the derived paths, every pipeline stage and the rendering
    /// context. Mutually exclusive with `--quiet`.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable all logging.
    ///
    /// Status lines and error reports are still printed.
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    /// The configuration file given on the command line
    #[must_use]
    pub fn yaml_file(&self) -> &PathBuf {
        &self.yaml_file
    }

    /// Build the configuration from the flags and run the pipeline.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Build a [`CliConfig`] from the parsed CLI arguments.
    ///
    /// - `--verbose`: `debug`
    /// - `--quiet`: `off`
    /// - neither: `RUST_LOG` or `warn`
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("off".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            no_color: self.no_color,
        }
    }

    /// Execute with an explicit configuration.
    ///
    /// Prints the validation and success lines on stdout; errors are
    /// returned for `main` to display.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply();
        tracing::debug!("Processing {}", self.yaml_file.display());

        let mut pipeline = Pipeline::default();
        let report = pipeline.run_observed(&self.yaml_file, |stage| {
            if stage == Stage::Validated {
                println!("{}", VALIDATION_PASSED.green());
            }
        })?;

        println!(
            "{}",
            format!("{GENERATED_PREFIX} {}", report.paths.output.display()).green()
        );
        Ok(())
    }
}
