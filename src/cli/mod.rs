//! cli
//!
//! Command-line host for the resolver.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Open repositories and load settings (the host side of resolution)
//! - Delegate to command handlers and report failures
//!
//! # Architecture
//!
//! The CLI layer is thin. It turns arguments into an
//! [`ActiveLocation`](crate::core::types::ActiveLocation) and a
//! [`ResolutionConfig`](crate::core::types::ResolutionConfig), then hands
//! them to [`crate::resolve`] together with a [`LocalGit`](crate::git::LocalGit)
//! host.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;
use std::process::ExitCode;

use crate::ui::output::{self, Format};

/// Execution context shared by all command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory to run in (defaults to the process working directory)
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled
    pub debug: bool,
    /// Output format
    pub format: Format,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`, after logging is set
/// up. Failures are reported here; the return value is the exit status.
pub fn run(cli: Cli) -> ExitCode {
    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        format: if cli.json { Format::Json } else { Format::Text },
    };

    match commands::dispatch(cli.command, &ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::report_error(&err, ctx.format);
            ExitCode::FAILURE
        }
    }
}
