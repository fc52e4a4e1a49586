//! Template rendering for NGINX configurations.
//!
//! Templates are Jinja-style text files rendered with [Tera](https://keats.github.io/tera/).
//! The whole configuration document is bound under a single top-level name,
//! `nginx`, so a template reads its values as `{{ nginx.port }}`.
//!
//! # Whitespace Control
//!
//! Block tags behave as with Jinja's `trim_blocks` and `lstrip_blocks`: a
//! `{% ... %}` tag on its own line leaves no blank line or indentation
//! behind. See [`whitespace`] for the exact rules.
//!
//! # Template Loading
//!
//! `{% include %}`, `{% extends %}` and `{% import %}` resolve names
//! against the directory of the main template.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ngxgen::templating::render_file;
//! use serde_json::json;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), ngxgen::core::NgxError> {
//! let config = json!({"name": "api", "template": "nginx", "port": 8080});
//! let text = render_file(Path::new("template-nginx.j2"), &config)?;
//! assert!(text.contains("listen 8080;"));
//! # Ok(())
//! # }
//! ```
//!
//! A template for that configuration:
//!
//! ```text
//! server {
//!     listen {{ nginx.port }};
//!     {% if nginx.server_name is defined %}
//!     server_name {{ nginx.server_name }};
//!     {% endif %}
//! }
//! ```

pub mod error;
pub mod renderer;
pub mod whitespace;

pub use error::TemplateError;
pub use renderer::{CONTEXT_NAME, TemplateRenderer};

use serde_json::Value;
use std::path::Path;

use crate::core::NgxError;
use crate::utils::fs::read_text_file;

/// Read and render a template file with `config` bound as `nginx`.
///
/// Referenced templates are loaded from the file's directory.
///
/// # Errors
///
/// [`NgxError::FileOperation`] if the template cannot be read and
/// [`NgxError::Template`] if it cannot be rendered.
pub fn render_file(template_path: &Path, config: &Value) -> Result<String, NgxError> {
    let source = read_text_file(template_path, "loading template")?;
    let name = template_path
        .file_name()
        .map_or_else(|| template_path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let root = template_path.parent().unwrap_or_else(|| Path::new(""));

    tracing::debug!("Rendering {} (root: {})", name, root.display());
    Ok(TemplateRenderer::new(root).render(&name, &source, config)?)
}
