//! Common test utilities for ngxgen integration tests
//!
//! [`TestProject`] lays out a configuration, schema and template in a
//! temporary directory and runs the binary there.

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Schema used by most tests
pub const NGINX_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "type": "object",
  "required": ["name", "template", "port"],
  "properties": {
    "name": {"type": "string"},
    "template": {"type": "string"},
    "port": {"type": "integer", "minimum": 1, "maximum": 65535},
    "listen_address": {"type": "string", "format": "ipv4"},
    "server_name": {"type": "string"},
    "locations": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["path"],
        "properties": {
          "path": {"type": "string", "pattern": "^/"},
          "proxy_pass": {"type": "string"}
        }
      }
    }
  }
}
"#;

/// Template used by most tests
pub const NGINX_TEMPLATE: &str = "\
server {
    listen {{ nginx.port }};
    {% if nginx.server_name is defined %}
    server_name {{ nginx.server_name }};
    {% endif %}
    {% if nginx.locations is defined %}
    {% for location in nginx.locations %}
    location {{ location.path }} {
        proxy_pass {{ location.proxy_pass }};
    }
    {% endfor %}
    {% endif %}
}
";

/// Configuration matching [`NGINX_SCHEMA`]
pub const API_CONFIG: &str = "\
name: api
template: nginx
port: 8080
server_name: api.example.com
";

/// Temporary project directory for running ngxgen
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
}

impl TestProject {
    /// Create an empty project
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(&project_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// Create a project with the standard `nginx` schema and template and
    /// `api.yaml` configuration
    pub fn with_nginx_files() -> Result<Self> {
        let project = Self::new()?;
        project.write_file("schema-nginx.json", NGINX_SCHEMA)?;
        project.write_file("template-nginx.j2", NGINX_TEMPLATE)?;
        project.write_file("api.yaml", API_CONFIG)?;
        Ok(project)
    }

    /// Project directory path
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// Write a file relative to the project directory
    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write {}", file_path.display()))?;
        Ok(())
    }

    /// Read a file relative to the project directory
    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))
    }

    /// Remove a file relative to the project directory
    pub fn remove_file(&self, path: &str) -> Result<()> {
        fs::remove_file(self.project_dir.join(path))?;
        Ok(())
    }

    /// Whether a file exists relative to the project directory
    pub fn file_exists(&self, path: &str) -> bool {
        self.project_dir.join(path).exists()
    }

    /// An `assert_cmd` command for the binary, run in the project directory
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("ngxgen").unwrap();
        cmd.current_dir(&self.project_dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
        cmd
    }

    /// Run ngxgen in the project directory
    pub fn run_ngxgen(&self, args: &[&str]) -> Result<CommandOutput> {
        let binary = env!("CARGO_BIN_EXE_ngxgen");
        let output = Command::new(binary)
            .args(args)
            .current_dir(&self.project_dir)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .context("Failed to run ngxgen")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded, showing both streams otherwise
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStdout: {}\nStderr: {}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    /// Assert the command exited with `code`
    pub fn assert_code(&self, code: i32) -> &Self {
        assert_eq!(
            self.code,
            Some(code),
            "Unexpected exit code\nStdout: {}\nStderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    /// Assert stdout contains `expected`
    pub fn assert_stdout_contains(&self, expected: &str) -> &Self {
        assert!(
            self.stdout.contains(expected),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            expected,
            self.stdout
        );
        self
    }

    /// Assert stderr contains `expected`
    pub fn assert_stderr_contains(&self, expected: &str) -> &Self {
        assert!(
            self.stderr.contains(expected),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            expected,
            self.stderr
        );
        self
    }
}
