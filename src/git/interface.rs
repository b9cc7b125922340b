//! git::interface
//!
//! The host Git integration seam.
//!
//! Resolution never talks to Git directly. Everything it needs (repository
//! snapshots, discovery notifications, the on-disk config file, the remote
//! branch listing) comes through [`GitHost`], which keeps the pipeline
//! testable and lets editor integrations plug in their own Git state.
//!
//! # Error Handling
//!
//! Host failures are categorized into typed variants:
//! - [`GitError::NotARepo`]: Path is not inside a Git repository
//! - [`GitError::Io`]: Filesystem read failed
//! - [`GitError::Command`]: An external `git` invocation failed
//! - [`GitError::Internal`]: Anything else reported by the Git backend
//!
//! # Example
//!
//! ```ignore
//! use ghlink::git::{GitHost, LocalGit};
//!
//! let host = LocalGit::new();
//! host.open_repository(Path::new("."))?;
//! for repo in host.repositories().await {
//!     println!("{} ({} remotes)", repo.root, repo.remotes.len());
//! }
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::core::types::Repository;

/// Errors from the host Git integration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Filesystem error.
    #[error("failed to read {path}: {message}")]
    Io {
        /// The path being read
        path: PathBuf,
        /// Description of the error
        message: String,
    },

    /// An external git command failed.
    #[error("git command failed: {message}")]
    Command {
        /// Stderr or spawn error
        message: String,
    },

    /// Internal Git backend error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// A scoped subscription to repository discovery.
///
/// Yields each repository the host opens after the subscription was made.
/// Dropping the subscription unsubscribes, so a caller that stops waiting
/// (timeout or cancellation) leaves nothing behind.
#[derive(Debug)]
pub struct DiscoverySubscription {
    receiver: broadcast::Receiver<Repository>,
}

impl DiscoverySubscription {
    /// Wrap a broadcast receiver.
    pub fn new(receiver: broadcast::Receiver<Repository>) -> Self {
        Self { receiver }
    }

    /// Wait for the next discovered repository.
    ///
    /// Returns `None` once the host will never announce another repository.
    pub async fn next(&mut self) -> Option<Repository> {
        loop {
            match self.receiver.recv().await {
                Ok(repo) => return Some(repo),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// The host's Git integration, as seen by the resolver.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; independent resolutions may run
/// concurrently against one host.
#[async_trait]
pub trait GitHost: Send + Sync {
    /// Snapshots of all currently known repositories, in discovery order.
    async fn repositories(&self) -> Vec<Repository>;

    /// Subscribe to repositories opened from now on.
    fn subscribe(&self) -> DiscoverySubscription;

    /// Re-read the live state of the repository rooted at `root`.
    async fn refresh(&self, root: &str) -> Result<Repository, GitError>;

    /// Text of the repository's Git config file.
    async fn read_config_file(&self, root: &str) -> Result<String, GitError>;

    /// Newline-delimited remote branch listing (`git branch -r` format).
    async fn list_remote_branches(&self, root: &str) -> Result<String, GitError>;
}
