//! resolve::default_branch
//!
//! Determining a repository's default branch.
//!
//! # Cascade
//!
//! First non-empty answer wins:
//! 1. `default_branch_fallback` from settings, taken as an override
//! 2. `[branch "main"]` or `[branch "master"]` declared in the Git config file
//! 3. `git branch -r`, retried on failure: the `origin/HEAD -> ...` marker,
//!    else the only remote branch, else `main`, else `master`
//!
//! Failures of the config file read are logged and skipped. The branch
//! listing is the last strategy, so its final error is attached to
//! [`ResolveError::DefaultBranchUndetermined`].

use tracing::debug;

use super::errors::ResolveError;
use super::retry::retry;
use super::ResolutionContext;
use crate::core::types::{Repository, ResolutionConfig};
use crate::git::{GitError, GitHost};
use crate::redact;

/// Branch names probed for, in order of preference.
const PREFERRED_BRANCHES: [&str; 2] = ["main", "master"];

/// Resolve the default branch of `repository`.
///
/// # Errors
///
/// [`ResolveError::DefaultBranchUndetermined`] once every strategy has come
/// up empty.
pub async fn resolve_default_branch(
    host: &dyn GitHost,
    ctx: &ResolutionContext,
    repository: &Repository,
    config: &ResolutionConfig,
) -> Result<String, ResolveError> {
    if let Some(fallback) = config
        .default_branch_fallback
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
    {
        debug!(branch = fallback, "default branch from settings");
        return Ok(fallback.to_string());
    }

    let root = repository.root.as_str();
    let mut last_error: Option<GitError> = None;

    match host.read_config_file(root).await {
        Ok(text) => {
            if let Some(branch) = declared_branch(&text) {
                debug!(branch, "default branch from git config");
                return Ok(branch.to_string());
            }
        }
        Err(err) => {
            debug!(error = %redact::sanitize(&err.to_string()), "git config unavailable");
            last_error = Some(err);
        }
    }

    let listing = retry(
        &ctx.timing.branch_listing,
        |attempt| {
            debug!(attempt, "listing remote branches");
            host.list_remote_branches(root)
        },
        |_| true,
    )
    .await;

    match listing {
        Ok(text) => {
            if let Some(branch) = branch_from_listing(&text) {
                debug!(branch = %branch, "default branch from remote listing");
                return Ok(branch);
            }
        }
        Err(err) => {
            debug!(
                error = %redact::sanitize(&err.to_string()),
                "remote branch listing failed"
            );
            last_error = Some(err);
        }
    }

    Err(ResolveError::DefaultBranchUndetermined { last_error })
}

/// The preferred branch declared by a `[branch "..."]` section.
///
/// Section names are case-insensitive; branch names are not.
///
/// # Example
///
/// ```
/// use ghlink::resolve::default_branch::declared_branch;
///
/// let config = "[core]\n\tbare = false\n[branch \"develop\"]\n[branch \"main\"]\n";
/// assert_eq!(declared_branch(config), Some("main"));
/// ```
pub fn declared_branch(config_text: &str) -> Option<&'static str> {
    let declared: Vec<&str> = config_text
        .lines()
        .filter_map(branch_section_name)
        .collect();

    PREFERRED_BRANCHES
        .into_iter()
        .find(|preferred| declared.contains(preferred))
}

/// Extract `name` from a `[branch "name"]` header line.
fn branch_section_name(line: &str) -> Option<&str> {
    let inner = line.trim().strip_prefix('[')?.strip_suffix(']')?.trim();
    let (section, rest) = inner.split_once(char::is_whitespace)?;
    if !section.eq_ignore_ascii_case("branch") {
        return None;
    }
    rest.trim().strip_prefix('"')?.strip_suffix('"')
}

/// Pick the default branch from `git branch -r` output.
///
/// # Example
///
/// ```
/// use ghlink::resolve::default_branch::branch_from_listing;
///
/// let listing = "  origin/HEAD -> origin/trunk\n  origin/main\n  origin/trunk\n";
/// assert_eq!(branch_from_listing(listing).as_deref(), Some("trunk"));
/// assert_eq!(branch_from_listing("  origin/dev\n  origin/master\n").as_deref(), Some("master"));
/// assert_eq!(branch_from_listing("  origin/a\n  origin/b\n"), None);
/// ```
pub fn branch_from_listing(listing: &str) -> Option<String> {
    let lines: Vec<&str> = listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if let Some(target) = lines
        .iter()
        .find_map(|line| line.split_once("->").map(|(_, target)| target.trim()))
    {
        return Some(strip_remote(target).to_string());
    }

    let mut branches: Vec<&str> = Vec::new();
    for line in &lines {
        let branch = strip_remote(line);
        if !branches.contains(&branch) {
            branches.push(branch);
        }
    }

    if let [only] = branches.as_slice() {
        return Some(only.to_string());
    }

    PREFERRED_BRANCHES
        .into_iter()
        .find(|preferred| branches.contains(preferred))
        .map(String::from)
}

/// `origin/feature/x` -> `feature/x`.
fn strip_remote(name: &str) -> &str {
    name.split_once('/').map_or(name, |(_, branch)| branch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockGit;

    const ROOT: &str = "/repo";

    fn repo() -> Repository {
        Repository::new(ROOT).with_remote("origin", "https://github.com/o/r.git")
    }

    fn ctx() -> ResolutionContext {
        ResolutionContext::new(vec![ROOT.to_string()])
    }

    fn failure() -> GitError {
        GitError::Command {
            message: "fatal: not a git repository".into(),
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn main_preferred_over_develop() {
            let text = "[branch \"develop\"]\n\tremote = origin\n[branch \"main\"]\n";
            assert_eq!(declared_branch(text), Some("main"));
        }

        #[test]
        fn master_when_no_main() {
            assert_eq!(declared_branch("[Branch \"master\"]\n"), Some("master"));
        }

        #[test]
        fn other_branches_ignored() {
            assert_eq!(
                declared_branch("[branch \"develop\"]\n[remote \"main\"]\n"),
                None
            );
        }

        #[test]
        fn head_marker_wins() {
            let listing = "  origin/HEAD -> origin/release\n  origin/main\n  origin/release\n";
            assert_eq!(branch_from_listing(listing).as_deref(), Some("release"));
        }

        #[test]
        fn single_branch_across_remotes() {
            let listing = "  origin/develop\n  upstream/develop\n";
            assert_eq!(branch_from_listing(listing).as_deref(), Some("develop"));
        }

        #[test]
        fn nested_branch_names_keep_slashes() {
            assert_eq!(
                branch_from_listing("  origin/feature/x\n").as_deref(),
                Some("feature/x")
            );
        }

        #[test]
        fn empty_listing_is_none() {
            assert_eq!(branch_from_listing(""), None);
        }
    }

    mod cascade {
        use super::*;

        #[tokio::test]
        async fn fallback_is_authoritative() {
            let host = MockGit::new();
            host.set_config_file(ROOT, "[branch \"main\"]\n");

            let mut config = ResolutionConfig::default();
            config.default_branch_fallback = Some("trunk".into());

            let branch = resolve_default_branch(&host, &ctx(), &repo(), &config)
                .await
                .unwrap();
            assert_eq!(branch, "trunk");
            assert!(host.operations().is_empty());
        }

        #[tokio::test]
        async fn config_file_skips_listing() {
            let host = MockGit::new();
            host.set_config_file(ROOT, "[branch \"main\"]\n[branch \"develop\"]\n");

            let config = ResolutionConfig::default();
            let branch = resolve_default_branch(&host, &ctx(), &repo(), &config)
                .await
                .unwrap();
            assert_eq!(branch, "main");
            assert_eq!(host.list_count(ROOT), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn listing_retried_after_failure() {
            let host = MockGit::new();
            host.set_config_file(ROOT, "[core]\n");
            host.script_remote_branches(
                ROOT,
                vec![Err(failure()), Ok("  origin/HEAD -> origin/main\n".into())],
            );

            let config = ResolutionConfig::default();
            let branch = resolve_default_branch(&host, &ctx(), &repo(), &config)
                .await
                .unwrap();
            assert_eq!(branch, "main");
            assert_eq!(host.list_count(ROOT), 2);
        }

        #[tokio::test(start_paused = true)]
        async fn exhausted_listing_surfaces_last_error() {
            let host = MockGit::new();
            host.set_config_file(ROOT, "[core]\n");
            host.script_remote_branches(ROOT, vec![Err(failure())]);

            let config = ResolutionConfig::default();
            let err = resolve_default_branch(&host, &ctx(), &repo(), &config)
                .await
                .unwrap_err();
            assert_eq!(
                err,
                ResolveError::DefaultBranchUndetermined {
                    last_error: Some(failure())
                }
            );
            assert_eq!(host.list_count(ROOT), 3);
        }

        #[tokio::test]
        async fn ambiguous_listing_is_undetermined() {
            let host = MockGit::new();
            host.set_config_file(ROOT, "");
            host.set_remote_branches(ROOT, "  origin/a\n  origin/b\n");

            let config = ResolutionConfig::default();
            let err = resolve_default_branch(&host, &ctx(), &repo(), &config)
                .await
                .unwrap_err();
            assert_eq!(
                err,
                ResolveError::DefaultBranchUndetermined { last_error: None }
            );
        }
    }
}
