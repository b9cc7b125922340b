//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Results go to stdout, diagnostics to stderr. When `--json` is enabled,
//! results and errors are single-line JSON objects on stdout. Error messages
//! are always passed through [`crate::redact::sanitize`] before display.

use std::fmt::Display;

use serde_json::json;

use crate::core::config::ConfigError;
use crate::git::GitError;
use crate::redact;
use crate::resolve::ResolveError;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Plain text
    #[default]
    Text,
    /// JSON objects
    Json,
}

/// Print a single named result.
///
/// Text mode prints the bare value; JSON mode prints `{ "<field>": value }`.
pub fn result(field: &str, value: &str, format: Format) {
    match format {
        Format::Text => println!("{}", value),
        Format::Json => println!("{}", json!({ field: value })),
    }
}

/// Print a warning message.
pub fn warn(message: impl Display) {
    eprintln!("warning: {}", redact::sanitize(&message.to_string()));
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Report a command failure.
pub fn report_error(err: &anyhow::Error, format: Format) {
    let message = redact::sanitize(&format!("{:#}", err));
    match format {
        Format::Text => error(message),
        Format::Json => println!(
            "{}",
            json!({ "error": error_kind(err), "message": message })
        ),
    }
}

/// Machine-readable kind of the first typed error in the chain.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ResolveError>() {
            return e.kind();
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return "config";
        }
        if cause.downcast_ref::<GitError>().is_some() {
            return "git";
        }
    }
    "error"
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn kind_found_through_context() {
        let err = Err::<(), _>(ResolveError::NoGitRemoteFound)
            .context("failed to build url")
            .unwrap_err();
        assert_eq!(error_kind(&err), "no_git_remote_found");
    }

    #[test]
    fn untyped_errors_are_generic() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(error_kind(&err), "error");
    }
}
