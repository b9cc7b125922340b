//! git::registry
//!
//! The set of repositories a host knows about, plus discovery broadcast.

use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

use super::interface::DiscoverySubscription;
use crate::core::types::Repository;

/// Capacity of the discovery channel. Slow subscribers skip old entries.
const DISCOVERY_CHANNEL_CAPACITY: usize = 64;

/// Known repositories in discovery order.
#[derive(Debug)]
pub struct RepositoryRegistry {
    repositories: Mutex<Vec<Repository>>,
    sender: broadcast::Sender<Repository>,
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DISCOVERY_CHANNEL_CAPACITY);
        Self {
            repositories: Mutex::new(Vec::new()),
            sender,
        }
    }

    /// Insert or update a repository and notify subscribers.
    ///
    /// A repository already known by root keeps its discovery position.
    pub fn announce(&self, repository: Repository) {
        {
            let mut repos = self
                .repositories
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match repos.iter_mut().find(|r| r.root == repository.root) {
                Some(existing) => *existing = repository.clone(),
                None => repos.push(repository.clone()),
            }
        }
        // No receivers is fine
        let _ = self.sender.send(repository);
    }

    /// Update a known repository without announcing it.
    pub fn update(&self, repository: Repository) {
        let mut repos = self
            .repositories
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = repos.iter_mut().find(|r| r.root == repository.root) {
            *existing = repository;
        }
    }

    /// Snapshot of all known repositories.
    pub fn snapshot(&self) -> Vec<Repository> {
        self.repositories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look up a repository by root.
    pub fn get(&self, root: &str) -> Option<Repository> {
        self.repositories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| r.root == root)
            .cloned()
    }

    /// Subscribe to future announcements.
    pub fn subscribe(&self) -> DiscoverySubscription {
        DiscoverySubscription::new(self.sender.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announce_keeps_discovery_order() {
        let registry = RepositoryRegistry::new();
        registry.announce(Repository::new("/a"));
        registry.announce(Repository::new("/b"));
        registry.announce(Repository::new("/a").with_branch("main"));

        let roots: Vec<_> = registry.snapshot().into_iter().map(|r| r.root).collect();
        assert_eq!(roots, vec!["/a", "/b"]);
        assert_eq!(
            registry.get("/a").and_then(|r| r.head.branch),
            Some("main".to_string())
        );
    }

    #[test]
    fn update_ignores_unknown() {
        let registry = RepositoryRegistry::new();
        registry.update(Repository::new("/nowhere"));
        assert!(registry.snapshot().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_later_announcements() {
        let registry = RepositoryRegistry::new();
        registry.announce(Repository::new("/before"));

        let mut subscription = registry.subscribe();
        registry.announce(Repository::new("/after"));

        let seen = subscription.next().await.map(|r| r.root);
        assert_eq!(seen.as_deref(), Some("/after"));
    }
}
