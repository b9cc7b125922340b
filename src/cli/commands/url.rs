//! url command - Print the web URL of a file

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::debug;

use super::{canonical, platform_separator, runtime, working_dir, Workspace};
use crate::cli::Context;
use crate::core::types::{ActiveLocation, RefStrategy, Selection};
use crate::resolve::resolve_url;
use crate::ui::output;

/// Arguments for the url command, after flag validation.
#[derive(Debug, Clone)]
pub struct UrlArgs {
    /// File to link to
    pub file: PathBuf,
    /// Zero-based selection; `None` links the file without an anchor
    pub selection: Option<Selection>,
    /// Pin to the current commit
    pub perma: bool,
    /// Use the default branch
    pub default: bool,
    /// Domain override from the command line
    pub domain: Option<String>,
    /// Repository folder hint from the command line
    pub root_git_folder: Option<String>,
    /// Default branch fallback from the command line
    pub default_branch_fallback: Option<String>,
    /// Open the URL in the browser
    pub open: bool,
}

/// Print (and optionally open) the URL for a file.
pub fn url(ctx: &Context, args: UrlArgs) -> Result<()> {
    let cwd = working_dir(ctx)?;
    let file = canonical(&cwd.join(&args.file));
    let dir = file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.clone());
    let mut paths = vec![dir];

    // A hinted repository may not contain the file at all.
    if let Some(hint) = &args.root_git_folder {
        paths.push(cwd.join(hint));
    }

    let workspace = Workspace::open(cwd, &paths)?;
    let file = file.to_string_lossy().into_owned();

    let location = match args.selection {
        Some(selection) => ActiveLocation::text(file, selection),
        None => ActiveLocation::file(file),
    };

    let strategy = RefStrategy::from_flags(args.perma, args.default);
    let mut config = workspace
        .settings
        .to_resolution_config(strategy, platform_separator());
    if let Some(domain) = args.domain {
        config.domain_override = Some(domain);
    }
    if let Some(hint) = args.root_git_folder {
        config.root_git_folder = Some(hint);
    }
    if let Some(fallback) = args.default_branch_fallback {
        config.default_branch_fallback = Some(fallback);
    }
    debug!(?location, strategy = %config.strategy, "url request");

    let resolution = workspace.resolution_context();
    let request = resolve_url(&workspace.host, &resolution, Some(&location), &config);
    let url = runtime()?
        .block_on(request)
        .with_context(|| format!("failed to build url for {}", args.file.display()))?;

    output::result("url", &url, ctx.format);

    if args.open {
        // The URL is already printed, so a missing browser is not fatal.
        if let Err(e) = open::that(&url) {
            output::warn(format!("could not open browser: {}", e));
        }
    }

    Ok(())
}
