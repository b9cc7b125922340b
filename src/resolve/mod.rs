//! resolve
//!
//! The URL resolution pipeline.
//!
//! # Pipeline
//!
//! ```text
//! ActiveLocation
//!     -> repository (containment, hint, discovery wait, remote polling)
//!     -> web URL    (tracked remote, domain override, first parsable remote)
//!     -> ref        (current branch | default branch | commit)
//!     -> path       (relative to the repository, percent-encoded)
//!     -> https://<host>/<owner>/<repo>/blob/<ref>/<path>#L<a>-L<b>
//! ```
//!
//! Steps run strictly in sequence. Each component owns its retries; a
//! failure in one step is never retried by restarting an earlier one.
//!
//! # Execution Context
//!
//! Workspace folders and every wait bound live in [`ResolutionContext`],
//! passed explicitly into each call. Tests shorten the bounds or run on a
//! paused tokio clock instead of flipping a global switch.
//!
//! # Example
//!
//! ```
//! use ghlink::core::types::{ActiveLocation, Repository, ResolutionConfig, Selection};
//! use ghlink::git::MockGit;
//! use ghlink::resolve::{resolve_url, ResolutionContext};
//!
//! # tokio_test::block_on(async {
//! let host = MockGit::new();
//! host.add_repository(
//!     Repository::new("/work/repo")
//!         .with_branch("main")
//!         .with_remote("origin", "git@github.com:owner/repo.git"),
//! );
//!
//! let ctx = ResolutionContext::new(vec!["/work".to_string()]);
//! let location = ActiveLocation::text("/work/repo/src/lib.rs", Selection::new(9, 11));
//! let config = ResolutionConfig::default().separator("/");
//!
//! let url = resolve_url(&host, &ctx, Some(&location), &config).await.unwrap();
//! assert_eq!(url, "https://github.com/owner/repo/blob/main/src/lib.rs#L10-L12");
//! # });
//! ```

mod assemble;
pub mod default_branch;
mod errors;
mod repository;
pub mod retry;

pub use assemble::assemble_url;
pub use default_branch::resolve_default_branch;
pub use errors::ResolveError;
pub use repository::{resolve_repository, ResolvedRepository};

use std::time::Duration;

use tracing::debug;

use self::retry::RetryPolicy;
use crate::core::paths::{is_path_prefix, normalize_path_for_url, relative_path};
use crate::core::types::{ActiveLocation, RefStrategy, Repository, ResolutionConfig};
use crate::git::GitHost;
use crate::remote::select_web_url;

/// How long to wait for a repository to be discovered.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Polling for a repository's remotes: 10 attempts, 500 ms apart.
pub const REMOTE_POLLING: RetryPolicy = RetryPolicy::fixed(10, Duration::from_millis(500));

/// Retrying `git branch -r`: 3 attempts, 500 ms apart.
pub const BRANCH_LISTING: RetryPolicy = RetryPolicy::fixed(3, Duration::from_millis(500));

/// Wait bounds for one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Bound on waiting for repository discovery
    pub discovery_timeout: Duration,
    /// Remote population polling
    pub remote_polling: RetryPolicy,
    /// Remote branch listing retries
    pub branch_listing: RetryPolicy,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            discovery_timeout: DISCOVERY_TIMEOUT,
            remote_polling: REMOTE_POLLING,
            branch_listing: BRANCH_LISTING,
        }
    }
}

/// Execution context threaded into every resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Open workspace (project) folders
    pub workspace_folders: Vec<String>,
    /// Wait bounds
    pub timing: Timing,
}

impl ResolutionContext {
    /// A context with default timing.
    pub fn new(workspace_folders: Vec<String>) -> Self {
        Self {
            workspace_folders,
            timing: Timing::default(),
        }
    }

    /// Replace the wait bounds.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// The innermost workspace folder containing `path`.
    pub fn workspace_folder_for(&self, path: &str, separator: &str) -> Option<&str> {
        self.workspace_folders
            .iter()
            .filter(|folder| is_path_prefix(folder, path, separator))
            .max_by_key(|folder| folder.len())
            .map(String::as_str)
    }
}

/// Resolve the web URL for `location`.
///
/// `location` is `None` when the host has neither an open document nor a
/// file reference.
///
/// # Errors
///
/// Any [`ResolveError`]; see the variant docs for when each occurs.
pub async fn resolve_url(
    host: &dyn GitHost,
    ctx: &ResolutionContext,
    location: Option<&ActiveLocation>,
    config: &ResolutionConfig,
) -> Result<String, ResolveError> {
    let location = location.ok_or(ResolveError::NoActiveFile)?;
    let file_path = location.path();
    let separator = config.path_separator.as_str();
    debug!(path = file_path, strategy = %config.strategy, "resolving url");

    let resolved = resolve_repository(host, ctx, file_path, config).await?;
    let repository = &resolved.repository;

    let web_url = select_web_url(repository, config)?;
    let reference = select_reference(host, ctx, repository, config).await?;

    let relative = relative_path(&repository.root, file_path, separator)
        .or_else(|| relative_path(&resolved.workspace_folder, file_path, separator))
        .ok_or_else(|| ResolveError::NoWorkspaceFolder {
            path: file_path.to_string(),
        })?;
    let normalized = normalize_path_for_url(&relative, separator);

    let url = assemble_url(&web_url, &reference, &normalized, location.line_anchor());
    debug!(url = %url, "resolved");
    Ok(url)
}

/// Pick the ref for the configured strategy.
///
/// The current-branch strategy falls back to the commit on a detached HEAD.
async fn select_reference(
    host: &dyn GitHost,
    ctx: &ResolutionContext,
    repository: &Repository,
    config: &ResolutionConfig,
) -> Result<String, ResolveError> {
    let commit = || {
        repository
            .head
            .commit
            .clone()
            .ok_or_else(|| ResolveError::NoCommitAvailable {
                root: repository.root.clone(),
            })
    };

    match config.strategy {
        RefStrategy::Permalink => commit(),
        RefStrategy::DefaultBranch => resolve_default_branch(host, ctx, repository, config).await,
        RefStrategy::CurrentBranch => match &repository.head.branch {
            Some(branch) => Ok(branch.clone()),
            None => {
                debug!("detached HEAD, using commit");
                commit()
            }
        },
    }
}
