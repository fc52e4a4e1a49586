//! JSON Schema validation of configuration documents.
//!
//! Validation is delegated to the `jsonschema` crate with format checking
//! switched on, so keywords like `"format": "ipv4"` or `"format": "email"`
//! are enforced whatever draft the schema declares.
//!
//! Only the first violation is reported, in the order the validator walks
//! the schema. It is described by a [`ValidationReport`]: the message, the
//! failing keyword, the keyword's value in the schema, and the paths to the
//! offending node in the document and in the schema.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ngxgen::schema::SchemaValidator;
//! use serde_json::json;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), ngxgen::core::NgxError> {
//! let schema = json!({
//!     "type": "object",
//!     "properties": {"port": {"type": "integer"}}
//! });
//! let validator = SchemaValidator::new(&schema, Path::new("schema-nginx.json"))?;
//!
//! let report = validator.validate(&json!({"port": "eighty"})).unwrap_err();
//! assert_eq!(report.keyword, "type");
//! # Ok(())
//! # }
//! ```

mod report;

pub use report::{PathSegment, ValidationReport, format_path};

use serde_json::Value;
use std::path::Path;

use crate::core::NgxError;

/// A compiled schema together with its source document.
///
/// The source is kept to look up the expected value of a failing keyword.
pub struct SchemaValidator {
    schema: Value,
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compile a schema with format checking enabled.
    ///
    /// `origin` names the schema in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`NgxError::SchemaCompile`] if the document is not a valid
    /// JSON Schema.
    pub fn new(schema: &Value, origin: &Path) -> Result<Self, NgxError> {
        let mut options = jsonschema::options();
        options.should_validate_formats(true);

        let validator = options.build(schema).map_err(|e| NgxError::SchemaCompile {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            schema: schema.clone(),
            validator,
        })
    }

    /// Whether the instance conforms to the schema.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Validate an instance, reporting the first violation.
    pub fn validate(&self, instance: &Value) -> Result<(), ValidationReport> {
        let Some(error) = self.validator.iter_errors(instance).next() else {
            return Ok(());
        };

        let instance_pointer = error.instance_path.to_string();
        let schema_pointer = error.schema_path.to_string();
        tracing::debug!(
            "First violation at '{}' (schema '{}'): {}",
            instance_pointer,
            schema_pointer,
            error
        );

        let data_path = report::decode_pointer(&instance_pointer, instance);
        let schema_path = report::decode_pointer(&schema_pointer, &self.schema);
        let keyword = match schema_path.last() {
            Some(segment) => segment.to_string(),
            None => "schema".to_string(),
        };
        let expected = report::resolve_schema_value(&self.schema, &schema_path)
            .cloned()
            .unwrap_or(Value::Null);

        Err(ValidationReport {
            message: error.to_string(),
            keyword,
            expected,
            data_path,
            schema_path,
        })
    }
}

/// Compile `schema` and validate `instance` against it.
///
/// # Errors
///
/// [`NgxError::SchemaCompile`] for an unusable schema and
/// [`NgxError::ValidationFailed`] for a non-conforming instance.
pub fn validate_document(instance: &Value, schema: &Value, origin: &Path) -> Result<(), NgxError> {
    SchemaValidator::new(schema, origin)?
        .validate(instance)
        .map_err(|report| NgxError::ValidationFailed(Box::new(report)))
}
