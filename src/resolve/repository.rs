//! resolve::repository
//!
//! Finding the repository that owns the active file.
//!
//! # Algorithm
//!
//! 1. The file must sit inside a workspace folder (longest match wins).
//! 2. The first known repository whose root contains the file is chosen.
//! 3. Otherwise the configured `root_git_folder` hint, joined onto the
//!    workspace folder, selects a repository containing the hint path.
//! 4. Otherwise wait for the host to discover a matching repository.
//! 5. Poll the chosen repository until it reports at least one remote.
//!
//! Direct containment always beats the hint. The hint only rescues files
//! whose own repository is unknown to the host.

use tracing::{debug, warn};

use super::errors::ResolveError;
use super::retry::retry;
use super::ResolutionContext;
use crate::core::paths::{is_path_prefix, join_path};
use crate::core::types::{Repository, ResolutionConfig};
use crate::git::{GitError, GitHost};
use crate::redact;

/// A repository chosen for the active file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRepository {
    /// Snapshot with at least one remote
    pub repository: Repository,
    /// Workspace folder containing the active file
    pub workspace_folder: String,
}

/// Why one remote polling attempt came back empty-handed.
#[derive(Debug)]
enum PollFailure {
    NotReady,
    Host(GitError),
}

/// Resolve the repository owning `file_path`.
///
/// # Errors
///
/// - [`ResolveError::NoWorkspaceFolder`] if no workspace folder contains the file
/// - [`ResolveError::RepositoryDiscoveryTimeout`] if no repository appears in time
/// - [`ResolveError::RemotesNotPopulatedTimeout`] if the repository never reports remotes
pub async fn resolve_repository(
    host: &dyn GitHost,
    ctx: &ResolutionContext,
    file_path: &str,
    config: &ResolutionConfig,
) -> Result<ResolvedRepository, ResolveError> {
    let separator = config.path_separator.as_str();

    let workspace_folder = ctx
        .workspace_folder_for(file_path, separator)
        .ok_or_else(|| ResolveError::NoWorkspaceFolder {
            path: file_path.to_string(),
        })?
        .to_string();

    let hint_path = config
        .root_git_folder
        .as_deref()
        .map(str::trim)
        .filter(|hint| !hint.is_empty())
        .map(|hint| join_path(&workspace_folder, hint, separator));

    // Subscribe before taking the snapshot so nothing slips between the two.
    let mut subscription = host.subscribe();
    let known = host.repositories().await;

    let found = find_owner(&known, file_path, separator).or_else(|| {
        hint_path
            .as_deref()
            .and_then(|hint| find_owner(&known, hint, separator))
    });

    let repository = match found {
        Some(repo) => {
            debug!(root = %repo.root, "repository found");
            repo.clone()
        }
        None => {
            debug!(
                timeout_ms = ctx.timing.discovery_timeout.as_millis() as u64,
                "waiting for repository discovery"
            );
            let wait = async {
                while let Some(repo) = subscription.next().await {
                    let owns_file = is_path_prefix(&repo.root, file_path, separator);
                    let matches_hint = hint_path
                        .as_deref()
                        .is_some_and(|hint| is_path_prefix(&repo.root, hint, separator));
                    if owns_file || matches_hint {
                        return Some(repo);
                    }
                }
                None
            };

            match tokio::time::timeout(ctx.timing.discovery_timeout, wait).await {
                Ok(Some(repo)) => {
                    debug!(root = %repo.root, "repository discovered");
                    repo
                }
                Ok(None) | Err(_) => {
                    debug!("no repository discovered");
                    return Err(ResolveError::RepositoryDiscoveryTimeout {
                        path: file_path.to_string(),
                    });
                }
            }
        }
    };
    drop(subscription);

    let repository = wait_for_remotes(host, ctx, repository).await?;
    Ok(ResolvedRepository {
        repository,
        workspace_folder,
    })
}

/// First repository (in discovery order) whose root contains `path`.
fn find_owner<'a>(
    repositories: &'a [Repository],
    path: &str,
    separator: &str,
) -> Option<&'a Repository> {
    repositories
        .iter()
        .find(|repo| is_path_prefix(&repo.root, path, separator))
}

/// Poll until the repository reports at least one remote.
///
/// The first attempt uses the snapshot in hand; later attempts refresh it
/// from the host.
async fn wait_for_remotes(
    host: &dyn GitHost,
    ctx: &ResolutionContext,
    repository: Repository,
) -> Result<Repository, ResolveError> {
    if repository.is_ready() {
        return Ok(repository);
    }

    let root = repository.root.clone();
    let snapshot = &repository;
    let root_ref = root.as_str();
    let result = retry(
        &ctx.timing.remote_polling,
        move |attempt| {
            let initial = (attempt == 1).then(|| snapshot.clone());
            async move {
                let current = match initial {
                    Some(repo) => repo,
                    None => host.refresh(root_ref).await.map_err(PollFailure::Host)?,
                };
                if current.is_ready() {
                    Ok(current)
                } else {
                    Err(PollFailure::NotReady)
                }
            }
        },
        |failure| {
            if let PollFailure::Host(err) = failure {
                debug!(error = %redact::sanitize(&err.to_string()), "refresh failed");
            }
            true
        },
    )
    .await;

    result.map_err(|_| {
        warn!(root = %redact::sanitize(&root), "remotes never populated");
        ResolveError::RemotesNotPopulatedTimeout { root: root.clone() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockGit;
    use std::time::Duration;

    fn ctx(folder: &str) -> ResolutionContext {
        ResolutionContext::new(vec![folder.to_string()])
    }

    fn config() -> ResolutionConfig {
        ResolutionConfig::default().separator("/")
    }

    fn ready(root: &str) -> Repository {
        Repository::new(root).with_remote("origin", "https://github.com/o/r.git")
    }

    #[tokio::test]
    async fn file_outside_workspace_fails() {
        let host = MockGit::new();
        let result = resolve_repository(&host, &ctx("/ws"), "/elsewhere/a.rs", &config()).await;
        assert_eq!(result.unwrap_err().kind(), "no_workspace_folder");
    }

    #[tokio::test]
    async fn first_containing_repository_wins() {
        let host = MockGit::new();
        host.add_repository(ready("/ws/a"));
        host.add_repository(ready("/ws"));

        let resolved = resolve_repository(&host, &ctx("/ws"), "/ws/a/b.rs", &config())
            .await
            .unwrap();
        assert_eq!(resolved.repository.root, "/ws/a");
        assert_eq!(resolved.workspace_folder, "/ws");
    }

    #[tokio::test]
    async fn owning_repository_beats_hint() {
        let host = MockGit::new();
        host.add_repository(ready("/ws/nested/repo"));
        host.add_repository(ready("/ws/own"));

        let mut cfg = config();
        cfg.root_git_folder = Some("nested/repo".into());

        let resolved = resolve_repository(&host, &ctx("/ws"), "/ws/own/file.md", &cfg)
            .await
            .unwrap();
        assert_eq!(resolved.repository.root, "/ws/own");
    }

    #[tokio::test]
    async fn hint_used_when_no_owner() {
        let host = MockGit::new();
        host.add_repository(ready("/ws/nested/repo"));

        let mut cfg = config();
        cfg.root_git_folder = Some("nested/repo".into());

        let resolved = resolve_repository(&host, &ctx("/ws"), "/ws/docs/readme.md", &cfg)
            .await
            .unwrap();
        assert_eq!(resolved.repository.root, "/ws/nested/repo");
    }

    #[tokio::test]
    async fn longest_workspace_folder_wins() {
        let host = MockGit::new();
        host.add_repository(ready("/ws/inner"));

        let ctx = ResolutionContext::new(vec!["/ws".to_string(), "/ws/inner".to_string()]);
        let resolved = resolve_repository(&host, &ctx, "/ws/inner/a.rs", &config())
            .await
            .unwrap();
        assert_eq!(resolved.workspace_folder, "/ws/inner");
    }

    #[tokio::test(start_paused = true)]
    async fn discovery_times_out() {
        let host = MockGit::new();
        let result = resolve_repository(&host, &ctx("/ws"), "/ws/a.rs", &config()).await;
        assert_eq!(
            result.unwrap_err(),
            ResolveError::RepositoryDiscoveryTimeout {
                path: "/ws/a.rs".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unrelated_discovery_is_ignored() {
        let host = MockGit::new();
        host.announce_after(ready("/other"), Duration::from_millis(100));
        host.announce_after(ready("/ws"), Duration::from_millis(200));

        let resolved = resolve_repository(&host, &ctx("/ws"), "/ws/a.rs", &config())
            .await
            .unwrap();
        assert_eq!(resolved.repository.root, "/ws");
    }

    #[tokio::test(start_paused = true)]
    async fn remotes_polled_until_populated() {
        let host = MockGit::new();
        host.add_repository(Repository::new("/ws"));
        host.queue_refresh(Repository::new("/ws"));
        host.queue_refresh(ready("/ws"));

        let resolved = resolve_repository(&host, &ctx("/ws"), "/ws/a.rs", &config())
            .await
            .unwrap();
        assert!(resolved.repository.is_ready());
        assert_eq!(host.refresh_count("/ws"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn remotes_never_populated() {
        let host = MockGit::new();
        host.add_repository(Repository::new("/ws"));

        let result = resolve_repository(&host, &ctx("/ws"), "/ws/a.rs", &config()).await;
        assert_eq!(
            result.unwrap_err(),
            ResolveError::RemotesNotPopulatedTimeout { root: "/ws".into() }
        );
        assert_eq!(host.refresh_count("/ws"), 9);
    }
}
