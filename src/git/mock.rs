//! git::mock
//!
//! Mock Git host for deterministic testing.
//!
//! # Design
//!
//! The mock stores repository snapshots in memory and lets tests script
//! everything the resolver asks the host for: config file contents, the
//! sequence of `git branch -r` results (including failures), the states
//! returned by successive refreshes, and repositories that appear after a
//! delay. Every host call is recorded for verification.
//!
//! # Example
//!
//! ```
//! use ghlink::core::types::Repository;
//! use ghlink::git::{GitHost, MockGit};
//!
//! # tokio_test::block_on(async {
//! let host = MockGit::new();
//! host.add_repository(
//!     Repository::new("/work/repo")
//!         .with_branch("main")
//!         .with_remote("origin", "git@github.com:owner/repo.git"),
//! );
//! host.set_remote_branches("/work/repo", "  origin/HEAD -> origin/main\n  origin/main\n");
//!
//! assert_eq!(host.repositories().await.len(), 1);
//! let listing = host.list_remote_branches("/work/repo").await.unwrap();
//! assert!(listing.contains("origin/HEAD"));
//! # });
//! ```

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use super::interface::{DiscoverySubscription, GitError, GitHost};
use super::registry::RepositoryRegistry;
use crate::core::types::Repository;

/// Mock Git host for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockGit {
    /// Known repositories and discovery broadcast.
    registry: Arc<RepositoryRegistry>,
    /// Scripted responses and recorded calls.
    inner: Arc<Mutex<MockGitInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockGitInner {
    /// Config file text (or failure) by repository root.
    config_files: HashMap<String, Result<String, GitError>>,
    /// Scripted branch listing results by repository root.
    ///
    /// Results are consumed in order; the last one repeats forever.
    branch_listings: HashMap<String, VecDeque<Result<String, GitError>>>,
    /// States returned by successive refreshes, by repository root.
    refreshes: HashMap<String, VecDeque<Repository>>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Recorded host call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Refresh { root: String },
    ReadConfigFile { root: String },
    ListRemoteBranches { root: String },
}

impl MockGit {
    /// An empty host.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockGitInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Register a repository and announce it to subscribers.
    pub fn add_repository(&self, repository: Repository) {
        self.registry.announce(repository);
    }

    /// Register a repository after `delay`, as if the host discovered it late.
    ///
    /// Must be called from within a tokio runtime.
    pub fn announce_after(&self, repository: Repository, delay: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(&self.registry);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            registry.announce(repository);
        })
    }

    /// Queue a state to be returned by the next refresh of its root.
    ///
    /// Once the queue is drained, refresh returns the last known snapshot.
    pub fn queue_refresh(&self, repository: Repository) {
        self.lock()
            .refreshes
            .entry(repository.root.clone())
            .or_default()
            .push_back(repository);
    }

    /// Set the config file text for a repository.
    pub fn set_config_file(&self, root: &str, text: &str) {
        self.lock()
            .config_files
            .insert(root.to_string(), Ok(text.to_string()));
    }

    /// Make reading the config file fail.
    pub fn fail_config_file(&self, root: &str, error: GitError) {
        self.lock()
            .config_files
            .insert(root.to_string(), Err(error));
    }

    /// Set a fixed remote branch listing.
    pub fn set_remote_branches(&self, root: &str, listing: &str) {
        self.script_remote_branches(root, vec![Ok(listing.to_string())]);
    }

    /// Script successive branch listing results.
    pub fn script_remote_branches(&self, root: &str, results: Vec<Result<String, GitError>>) {
        self.lock()
            .branch_listings
            .insert(root.to_string(), results.into_iter().collect());
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// All recorded operations, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Number of refreshes issued for `root`.
    pub fn refresh_count(&self, root: &str) -> usize {
        self.count(|op| matches!(op, MockOperation::Refresh { root: r } if r == root))
    }

    /// Number of branch listings issued for `root`.
    pub fn list_count(&self, root: &str) -> usize {
        self.count(|op| matches!(op, MockOperation::ListRemoteBranches { root: r } if r == root))
    }

    /// Number of config file reads issued for `root`.
    pub fn config_read_count(&self, root: &str) -> usize {
        self.count(|op| matches!(op, MockOperation::ReadConfigFile { root: r } if r == root))
    }

    fn count(&self, predicate: impl Fn(&MockOperation) -> bool) -> usize {
        self.lock()
            .operations
            .iter()
            .filter(|op| predicate(op))
            .count()
    }
}

#[async_trait]
impl GitHost for MockGit {
    async fn repositories(&self) -> Vec<Repository> {
        self.registry.snapshot()
    }

    fn subscribe(&self) -> DiscoverySubscription {
        self.registry.subscribe()
    }

    async fn refresh(&self, root: &str) -> Result<Repository, GitError> {
        let queued = {
            let mut inner = self.lock();
            inner.operations.push(MockOperation::Refresh {
                root: root.to_string(),
            });
            inner.refreshes.get_mut(root).and_then(|q| q.pop_front())
        };

        match queued {
            Some(repository) => {
                self.registry.update(repository.clone());
                Ok(repository)
            }
            None => self.registry.get(root).ok_or_else(|| GitError::NotARepo {
                path: PathBuf::from(root),
            }),
        }
    }

    async fn read_config_file(&self, root: &str) -> Result<String, GitError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::ReadConfigFile {
            root: root.to_string(),
        });
        inner.config_files.get(root).cloned().unwrap_or_else(|| {
            Err(GitError::Io {
                path: PathBuf::from(root).join(".git/config"),
                message: "file not found".to_string(),
            })
        })
    }

    async fn list_remote_branches(&self, root: &str) -> Result<String, GitError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::ListRemoteBranches {
            root: root.to_string(),
        });
        let Some(results) = inner.branch_listings.get_mut(root) else {
            return Ok(String::new());
        };
        if results.len() > 1 {
            results.pop_front().unwrap_or_else(|| Ok(String::new()))
        } else {
            results
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }
}
