//! default-branch command - Print the default branch of the current repository

use anyhow::{Context as _, Result};

use super::{platform_separator, runtime, working_dir, Workspace};
use crate::cli::Context;
use crate::core::types::RefStrategy;
use crate::git::GitError;
use crate::resolve::resolve_default_branch;
use crate::ui::output;

/// Print the branch `--default` links would point at.
pub fn default_branch(ctx: &Context, default_branch_fallback: Option<String>) -> Result<()> {
    let cwd = working_dir(ctx)?;
    let workspace = Workspace::open(cwd.clone(), &[])?;

    let repository = workspace
        .repositories
        .first()
        .cloned()
        .ok_or(GitError::NotARepo { path: cwd })?;

    let mut config = workspace
        .settings
        .to_resolution_config(RefStrategy::DefaultBranch, platform_separator());
    if let Some(fallback) = default_branch_fallback {
        config.default_branch_fallback = Some(fallback);
    }

    let resolution = workspace.resolution_context();
    let branch = runtime()?
        .block_on(resolve_default_branch(
            &workspace.host,
            &resolution,
            &repository,
            &config,
        ))
        .with_context(|| format!("failed to determine default branch of {}", repository.root))?;

    output::result("branch", &branch, ctx.format);
    Ok(())
}
