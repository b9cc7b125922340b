//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--json`: Machine-readable output

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::types::Selection;

/// ghlink - Shareable web URLs for files in Git repositories
#[derive(Parser, Debug)]
#[command(name = "ghlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if ghlink was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Print results and errors as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the web URL of a file
    #[command(
        name = "url",
        long_about = "Print the web URL of a file in its hosted repository.\n\n\
            The URL points at the current branch by default. Use --perma to pin it \
            to the current commit, or --default to point at the repository's \
            default branch.",
        after_help = "\
EXAMPLES:
    # Link to line 42 on the current branch
    ghlink url src/main.rs --line 42

    # Permanent link to a range of lines
    ghlink url src/main.rs --lines 10-20 --perma

    # Link on the default branch, then open it
    ghlink url README.md --default --open"
    )]
    Url {
        /// File to link to
        file: PathBuf,

        /// Line to anchor (one-based)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..), conflicts_with = "lines")]
        line: Option<u32>,

        /// Line range to anchor, as START-END (one-based, inclusive)
        #[arg(long, value_parser = parse_line_range)]
        lines: Option<LineRange>,

        /// Pin the URL to the current commit
        #[arg(long, conflicts_with = "default")]
        perma: bool,

        /// Use the repository's default branch
        #[arg(long)]
        default: bool,

        /// Host to prefer among remotes (self-hosted forges)
        #[arg(long, value_name = "HOST")]
        domain: Option<String>,

        /// Repository folder to use when the file's own repository is unknown
        #[arg(long, value_name = "PATH")]
        root_git_folder: Option<String>,

        /// Branch to use as the default branch
        #[arg(long, value_name = "BRANCH")]
        default_branch_fallback: Option<String>,

        /// Treat the file as binary (never add a line anchor)
        #[arg(long, conflicts_with_all = ["line", "lines"])]
        binary: bool,

        /// Open the URL in the browser
        #[arg(long)]
        open: bool,
    },

    /// Print the repository's default branch
    #[command(name = "default-branch")]
    DefaultBranch {
        /// Branch to use instead of detecting one
        #[arg(long, value_name = "BRANCH")]
        default_branch_fallback: Option<String>,
    },

    /// Percent-encode a repository-relative path for use in a URL
    #[command(name = "encode-path")]
    EncodePath {
        /// Path to encode
        path: String,

        /// Separator used in PATH
        #[arg(long, default_value = "/")]
        separator: String,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    ghlink completion bash > /etc/bash_completion.d/ghlink

    # Zsh
    ghlink completion zsh > \"${fpath[1]}/_ghlink\""
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// An inclusive, one-based line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// The zero-based selection covering this range.
    pub fn to_selection(self) -> Selection {
        Selection::new(self.start - 1, self.end - 1)
    }
}

/// Parse `START-END` (or a single `N`).
fn parse_line_range(value: &str) -> Result<LineRange, String> {
    let parse = |s: &str| -> Result<u32, String> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid line number '{}'", s.trim()))?;
        if n == 0 {
            return Err("line numbers start at 1".to_string());
        }
        Ok(n)
    };

    let (start, end) = match value.split_once('-') {
        Some((a, b)) => (parse(a)?, parse(b)?),
        None => {
            let n = parse(value)?;
            (n, n)
        }
    };

    Ok(LineRange {
        start: start.min(end),
        end: start.max(end),
    })
}

/// Selection for the `url` command's line flags.
pub fn selection_from_flags(line: Option<u32>, lines: Option<LineRange>) -> Option<Selection> {
    match (line, lines) {
        (Some(n), _) => Some(Selection::line(n.saturating_sub(1))),
        (None, Some(range)) => Some(range.to_selection()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn line_range_parses() {
        assert_eq!(
            parse_line_range("10-20"),
            Ok(LineRange { start: 10, end: 20 })
        );
        assert_eq!(parse_line_range("7"), Ok(LineRange { start: 7, end: 7 }));
        assert_eq!(parse_line_range("9-3"), Ok(LineRange { start: 3, end: 9 }));
    }

    #[test]
    fn line_range_rejects_zero_and_garbage() {
        assert!(parse_line_range("0-4").is_err());
        assert!(parse_line_range("a-b").is_err());
    }

    #[test]
    fn one_based_flags_become_zero_based_selection() {
        assert_eq!(
            selection_from_flags(Some(5), None),
            Some(Selection::new(4, 4))
        );
        assert_eq!(
            selection_from_flags(None, Some(LineRange { start: 31, end: 41 })),
            Some(Selection::new(30, 40))
        );
        assert_eq!(selection_from_flags(None, None), None);
    }

    #[test]
    fn url_flags_parse() {
        let cli = Cli::try_parse_from([
            "ghlink",
            "--json",
            "url",
            "src/lib.rs",
            "--lines",
            "1-2",
            "--perma",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Url { lines, perma, .. } => {
                assert_eq!(lines, Some(LineRange { start: 1, end: 2 }));
                assert!(perma);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn binary_conflicts_with_lines() {
        let result = Cli::try_parse_from(["ghlink", "url", "a.png", "--binary", "--line", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn perma_conflicts_with_default() {
        let result = Cli::try_parse_from(["ghlink", "url", "a.rs", "--perma", "--default"]);
        assert!(result.is_err());
    }
}
