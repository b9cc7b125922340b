//! git
//!
//! Host Git integration.
//!
//! # Architecture
//!
//! This module is the only doorway to Git. Resolution code sees repositories
//! exclusively as [`Repository`](crate::core::types::Repository) snapshots
//! handed out by a [`GitHost`]. No other module imports `git2` or spawns
//! `git`.
//!
//! # Hosts
//!
//! - [`LocalGit`]: repositories on disk (`git2` + `git branch -r`)
//! - [`MockGit`]: in-memory, scriptable host for tests
//!
//! # Invariants
//!
//! - Snapshots are immutable once handed out; refreshing produces a new one
//! - Discovery subscriptions only observe repositories opened after
//!   subscribing, so callers subscribe before checking the snapshot list

mod interface;
mod local;
pub mod mock;
mod registry;

pub use interface::{DiscoverySubscription, GitError, GitHost};
pub use local::LocalGit;
pub use mock::MockGit;
pub use registry::RepositoryRegistry;
