//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Opens repositories and loads settings through [`Workspace`]
//! 3. Runs the resolver on a tokio runtime
//! 4. Formats and displays output
//!
//! # Async Commands
//!
//! Resolution is async (it waits on the host and on retry delays). Handlers
//! stay synchronous and drive it with `Runtime::block_on`.

mod completion;
mod default_branch;
mod encode_path;
mod url;

pub use completion::completion;
pub use default_branch::default_branch;
pub use encode_path::encode_path;
pub use url::{url, UrlArgs};

use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};
use std::time::Duration;

use anyhow::{Context as _, Result};
use tracing::debug;

use super::args::{selection_from_flags, Command};
use super::Context;
use crate::core::config::Settings;
use crate::core::types::Repository;
use crate::git::LocalGit;
use crate::resolve::{ResolutionContext, Timing};
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Url {
            file,
            line,
            lines,
            perma,
            default,
            domain,
            root_git_folder,
            default_branch_fallback,
            binary,
            open,
        } => url::url(
            ctx,
            UrlArgs {
                file,
                selection: if binary {
                    None
                } else {
                    selection_from_flags(line, lines)
                },
                perma,
                default,
                domain,
                root_git_folder,
                default_branch_fallback,
                open,
            },
        ),
        Command::DefaultBranch {
            default_branch_fallback,
        } => default_branch::default_branch(ctx, default_branch_fallback),
        Command::EncodePath { path, separator } => encode_path::encode_path(ctx, &path, &separator),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Repositories and settings visible from the working directory.
///
/// The CLI opens every repository it can reach before resolving, so the
/// resolver's discovery wait would never see anything new. Its timeout is
/// therefore zero here.
pub(crate) struct Workspace {
    /// The Git host with repositories opened
    pub host: LocalGit,
    /// Working directory (canonical when possible)
    pub cwd: PathBuf,
    /// Repositories opened, in discovery order
    pub repositories: Vec<Repository>,
    /// Merged settings for the first repository
    pub settings: Settings,
}

impl Workspace {
    /// Open repositories containing `paths` (and `cwd`).
    pub fn open(cwd: PathBuf, paths: &[PathBuf]) -> Result<Self> {
        let host = LocalGit::new();
        let mut candidates: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
        candidates.push(&cwd);
        let repositories = host.discover(candidates);
        debug!(count = repositories.len(), "repositories opened");

        let repo_root = repositories.first().map(|r| PathBuf::from(&r.root));
        let loaded = Settings::load(repo_root.as_deref()).context("failed to load settings")?;
        debug!(
            global = ?loaded.settings.global_config_loaded_from(),
            repo = ?loaded.settings.repo_config_loaded_from(),
            "settings loaded"
        );
        for warning in &loaded.warnings {
            output::warn(format!("{}: {}", warning.path.display(), warning.message));
        }

        Ok(Self {
            host,
            cwd,
            repositories,
            settings: loaded.settings,
        })
    }

    /// Resolution context: the working directory plus every repository root.
    pub fn resolution_context(&self) -> ResolutionContext {
        let mut folders = vec![self.cwd.to_string_lossy().into_owned()];
        folders.extend(self.repositories.iter().map(|r| r.root.clone()));
        ResolutionContext::new(folders).with_timing(Timing {
            discovery_timeout: Duration::ZERO,
            ..Timing::default()
        })
    }
}

/// The directory the command runs in.
pub(crate) fn working_dir(ctx: &Context) -> Result<PathBuf> {
    let cwd = match &ctx.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to read working directory")?,
    };
    Ok(canonical(&cwd))
}

/// Canonicalize a path, keeping it as-is when it does not exist.
pub(crate) fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Path separator of the platform the CLI runs on.
pub(crate) fn platform_separator() -> &'static str {
    MAIN_SEPARATOR_STR
}

/// Build a tokio runtime for one command.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
