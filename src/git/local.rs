//! git::local
//!
//! The real Git host, reading repositories from disk.
//!
//! # Design
//!
//! Repository state (HEAD, remotes, branch upstreams) is read with `git2`.
//! The on-disk config file is read with `tokio::fs`, and the remote branch
//! listing runs `git branch -r` through `tokio::process` so the caller's
//! runtime is never blocked on a child process.
//!
//! Snapshots are taken when a repository is opened and again on every
//! [`GitHost::refresh`]. Opening a repository announces it to discovery
//! subscribers.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::interface::{DiscoverySubscription, GitError, GitHost};
use super::registry::RepositoryRegistry;
use crate::core::types::{Head, Remote, Repository, TrackingRef};
use crate::redact;

/// Git host backed by repositories on the local filesystem.
#[derive(Debug, Default)]
pub struct LocalGit {
    registry: RepositoryRegistry,
}

impl LocalGit {
    /// A host with no repositories opened yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the repository containing `path` and announce it.
    ///
    /// `path` can be any file or directory inside the working tree.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository contains `path`, or the
    ///   repository is bare
    /// - [`GitError::Internal`] if repository state cannot be read
    pub fn open_repository(&self, path: &Path) -> Result<Repository, GitError> {
        let repository = read_snapshot(path)?;
        debug!(root = %repository.root, remotes = repository.remotes.len(), "opened repository");
        self.registry.announce(repository.clone());
        Ok(repository)
    }

    /// Open every repository containing one of `paths`.
    ///
    /// Paths outside any repository are skipped. Repositories reached from
    /// more than one path are announced once per path but keep a single
    /// registry entry.
    pub fn discover<'a, I>(&self, paths: I) -> Vec<Repository>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut opened = Vec::new();
        for path in paths {
            match self.open_repository(path) {
                Ok(repo) => {
                    if !opened.iter().any(|r: &Repository| r.root == repo.root) {
                        opened.push(repo);
                    }
                }
                Err(err) => debug!(
                    error = %redact::sanitize(&err.to_string()),
                    "no repository"
                ),
            }
        }
        opened
    }
}

#[async_trait]
impl GitHost for LocalGit {
    async fn repositories(&self) -> Vec<Repository> {
        self.registry.snapshot()
    }

    fn subscribe(&self) -> DiscoverySubscription {
        self.registry.subscribe()
    }

    async fn refresh(&self, root: &str) -> Result<Repository, GitError> {
        let path = PathBuf::from(root);
        let repository = tokio::task::spawn_blocking(move || read_snapshot(&path))
            .await
            .map_err(|e| GitError::Internal {
                message: e.to_string(),
            })??;
        self.registry.update(repository.clone());
        Ok(repository)
    }

    async fn read_config_file(&self, root: &str) -> Result<String, GitError> {
        let root = PathBuf::from(root);
        let path = tokio::task::spawn_blocking(move || config_file_path(&root))
            .await
            .map_err(|e| GitError::Internal {
                message: e.to_string(),
            })??;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| GitError::Io {
                path,
                message: e.to_string(),
            })
    }

    async fn list_remote_branches(&self, root: &str) -> Result<String, GitError> {
        let output = Command::new("git")
            .args(["branch", "-r"])
            .current_dir(root)
            .output()
            .await
            .map_err(|e| GitError::Command {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(GitError::Command {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// =============================================================================
// Snapshot reading
// =============================================================================

/// Open the repository containing `path`, rejecting bare repositories.
fn open(path: &Path) -> Result<git2::Repository, GitError> {
    let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
        path: path.to_path_buf(),
    })?;
    if repo.is_bare() {
        return Err(GitError::NotARepo {
            path: path.to_path_buf(),
        });
    }
    Ok(repo)
}

/// Path of the shared config file (`<commondir>/config`).
///
/// Linked worktrees share the main repository's config.
fn config_file_path(root: &Path) -> Result<PathBuf, GitError> {
    let repo = open(root)?;
    Ok(repo.commondir().join("config"))
}

/// Read a full snapshot of the repository containing `path`.
fn read_snapshot(path: &Path) -> Result<Repository, GitError> {
    let repo = open(path)?;
    let workdir = repo.workdir().ok_or_else(|| GitError::NotARepo {
        path: path.to_path_buf(),
    })?;

    Ok(Repository {
        root: root_string(workdir),
        head: read_head(&repo)?,
        remotes: read_remotes(&repo)?,
        refs: read_tracking_refs(&repo)?,
    })
}

/// Working directory as a string without a trailing separator.
fn root_string(workdir: &Path) -> String {
    let root = workdir.to_string_lossy();
    let trimmed = root.trim_end_matches(['/', MAIN_SEPARATOR]);
    if trimmed.is_empty() {
        root.into_owned()
    } else {
        trimmed.to_string()
    }
}

fn read_head(repo: &git2::Repository) -> Result<Head, GitError> {
    let head = match repo.head() {
        Ok(h) => h,
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(Head::default()),
        Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(Head::default()),
        Err(e) => return Err(e.into()),
    };

    let branch = if head.is_branch() {
        head.shorthand().map(String::from)
    } else {
        None
    };

    Ok(Head {
        branch,
        commit: head.target().map(|oid| oid.to_string()),
    })
}

/// Remotes in configuration order. Remotes without a URL are skipped.
fn read_remotes(repo: &git2::Repository) -> Result<Vec<Remote>, GitError> {
    let names = repo.remotes()?;
    let mut remotes = Vec::new();
    for name in names.iter().flatten() {
        match repo.find_remote(name) {
            Ok(remote) => {
                if let Some(url) = remote.url() {
                    remotes.push(Remote::new(name, url));
                }
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(remotes)
}

/// Local branches with the remote each one tracks.
fn read_tracking_refs(repo: &git2::Repository) -> Result<Vec<TrackingRef>, GitError> {
    let mut refs = Vec::new();
    for entry in repo.branches(Some(git2::BranchType::Local))? {
        let (branch, _) = entry?;
        let Some(name) = branch.name()?.map(String::from) else {
            continue;
        };
        let Some(refname) = branch.get().name() else {
            continue;
        };

        let remote = match repo.branch_upstream_remote(refname) {
            Ok(buf) => buf.as_str().map(String::from),
            Err(e) if e.code() == git2::ErrorCode::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        refs.push(TrackingRef { name, remote });
    }
    Ok(refs)
}
