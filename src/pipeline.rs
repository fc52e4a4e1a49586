//! The generation pipeline.
//!
//! One run walks a fixed sequence of stages:
//!
//! ```text
//! Start → Loaded → Named → Validated → Rendered → Written → Done
//! ```
//!
//! Any step can fail, which ends the run in [`Stage::Failed`]. Nothing is
//! retried and no stage is entered twice. The derived schema and template
//! must both exist before validation starts, and the output file is only
//! touched after the configuration validated and the template rendered.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::NgxError;
use crate::core::file_error::path_exists;
use crate::document::{load_json, load_yaml};
use crate::naming::DerivedPaths;
use crate::schema::validate_document;
use crate::templating::render_file;
use crate::utils::fs::write_text_file;

/// Progress of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet
    Start,
    /// The configuration document was parsed
    Loaded,
    /// Schema, template and output paths were derived
    Named,
    /// The configuration conforms to its schema
    Validated,
    /// The template was rendered
    Rendered,
    /// The output file was written
    Written,
    /// The run completed
    Done,
    /// The run stopped with an error
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Loaded => "loaded",
            Stage::Named => "named",
            Stage::Validated => "validated",
            Stage::Rendered => "rendered",
            Stage::Written => "written",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The configuration file that was processed
    pub input: PathBuf,
    /// Schema, template and output paths used
    pub paths: DerivedPaths,
    /// Size of the rendered output
    pub bytes_written: usize,
}

/// Drives one configuration through load, validation, rendering and output.
#[derive(Debug)]
pub struct Pipeline {
    workdir: PathBuf,
    stage: Stage,
    failed_after: Option<Stage>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

impl Pipeline {
    /// Create a pipeline that derives and writes files in `workdir`.
    ///
    /// An empty path means the process working directory, and keeps the
    /// derived paths relative in messages (`schema-nginx.json` rather than
    /// `./schema-nginx.json`).
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            stage: Stage::Start,
            failed_after: None,
        }
    }

    /// Current stage
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Last stage completed before a failure, if the run failed
    #[must_use]
    pub const fn failed_after(&self) -> Option<Stage> {
        self.failed_after
    }

    /// Process one configuration file.
    ///
    /// `input` is resolved against the working directory unless absolute.
    ///
    /// # Errors
    ///
    /// - [`NgxError::InputNotFound`], [`NgxError::SchemaNotFound`] or
    ///   [`NgxError::TemplateNotFound`] when a file is missing
    /// - [`NgxError::ValidationFailed`] when the configuration violates the
    ///   schema
    /// - parse, schema, template and write errors otherwise
    pub fn run(&mut self, input: &Path) -> Result<RunReport, NgxError> {
        self.run_observed(input, |_| {})
    }

    /// Like [`Pipeline::run`], calling `observer` after every stage is
    /// reached.
    pub fn run_observed<F>(&mut self, input: &Path, mut observer: F) -> Result<RunReport, NgxError>
    where
        F: FnMut(Stage),
    {
        if self.stage != Stage::Start {
            return Err(NgxError::Other {
                message: format!("pipeline already ran (stage: {})", self.stage),
            });
        }

        let result = self.execute(input, &mut observer);
        if let Err(error) = &result {
            tracing::debug!("Pipeline failed after stage '{}': {}", self.stage, error);
            self.failed_after = Some(self.stage);
            self.stage = Stage::Failed;
            observer(Stage::Failed);
        }
        result
    }

    fn execute<F>(&mut self, input: &Path, observer: &mut F) -> Result<RunReport, NgxError>
    where
        F: FnMut(Stage),
    {
        let input_path = self.workdir.join(input);
        if !path_exists(&input_path, "locating configuration", "pipeline::run")? {
            return Err(NgxError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let config = load_yaml(&input_path)?;
        self.advance(Stage::Loaded, observer);

        let paths = DerivedPaths::from_config(&config).resolve_in(&self.workdir);
        tracing::debug!(
            "Derived schema={}, template={}, output={}",
            paths.schema.display(),
            paths.template_file.display(),
            paths.output.display()
        );
        self.advance(Stage::Named, observer);

        if !path_exists(&paths.schema, "locating schema", "pipeline::run")? {
            return Err(NgxError::SchemaNotFound {
                path: paths.schema,
            });
        }
        if !path_exists(&paths.template_file, "locating template", "pipeline::run")? {
            return Err(NgxError::TemplateNotFound {
                path: paths.template_file,
            });
        }

        let schema = load_json(&paths.schema)?;
        validate_document(&config, &schema, &paths.schema)?;
        self.advance(Stage::Validated, observer);

        let rendered = render_file(&paths.template_file, &config)?;
        self.advance(Stage::Rendered, observer);

        write_text_file(&paths.output, &rendered)?;
        self.advance(Stage::Written, observer);

        self.advance(Stage::Done, observer);
        Ok(RunReport {
            input: input_path,
            paths,
            bytes_written: rendered.len(),
        })
    }

    fn advance<F>(&mut self, next: Stage, observer: &mut F)
    where
        F: FnMut(Stage),
    {
        tracing::debug!("Pipeline stage: {} -> {}", self.stage, next);
        self.stage = next;
        observer(next);
    }
}
