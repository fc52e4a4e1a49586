//! ngxgen CLI entry point
//!
//! Parses arguments, runs the generation pipeline and maps failures to the
//! error display and exit code.

use anyhow::Result;
use clap::Parser;
use ngxgen::cli;
use ngxgen::core::error::user_friendly_error;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(error_ctx.exit_code());
        }
    }
}
