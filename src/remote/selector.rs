//! remote::selector
//!
//! Choose which remote a web URL is built from.
//!
//! # Order
//!
//! First success wins:
//! 1. The remote tracked by the current branch
//! 2. A remote whose fetch URL mentions the domain override (rebuilt on the
//!    override host)
//! 3. Every remote in configuration order
//!
//! Remotes that fail to parse are skipped, never fatal. Exhaustion yields
//! [`RemoteError::NoRemoteFound`], or the parse error itself when the
//! repository has exactly one remote.

use tracing::debug;

use super::url::{normalize_remote_to_web_url, RemoteUrl};
use super::RemoteError;
use crate::core::types::{Repository, ResolutionConfig};
use crate::redact;

/// Select the web URL (`https://<host>/<owner>/<repo>`) for a repository.
///
/// # Errors
///
/// - [`RemoteError::UnrecognizedFormat`] if the only remote cannot be parsed
/// - [`RemoteError::NoRemoteFound`] if no remote produces a web URL
///
/// # Example
///
/// ```
/// use ghlink::core::types::{Repository, ResolutionConfig, TrackingRef};
/// use ghlink::remote::select_web_url;
///
/// let repo = Repository::new("/repo")
///     .with_branch("feature")
///     .with_remote("origin", "https://github.com/user1/repo.git")
///     .with_remote("upstream", "https://github.com/user2/repo.git")
///     .with_ref(TrackingRef::tracking("feature", "upstream"));
///
/// let url = select_web_url(&repo, &ResolutionConfig::default()).unwrap();
/// assert_eq!(url, "https://github.com/user2/repo");
/// ```
pub fn select_web_url(
    repository: &Repository,
    config: &ResolutionConfig,
) -> Result<String, RemoteError> {
    let domain = config
        .domain_override
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    let candidates: Vec<&str> = domain.into_iter().collect();

    // 1. Branch-tracked remote
    if let Some(remote) = repository.upstream_remote() {
        match normalize_remote_to_web_url(&remote.fetch_url, &candidates) {
            Ok(url) => {
                debug!(remote = %remote.name, "using remote tracked by current branch");
                return Ok(url);
            }
            Err(e) => debug!(
                remote = %remote.name,
                error = %redact::sanitize(&e.to_string()),
                "tracked remote unusable"
            ),
        }
    }

    // 2. Domain override
    if let Some(domain) = domain {
        let needle = domain.to_ascii_lowercase();
        for remote in &repository.remotes {
            if !remote.fetch_url.to_ascii_lowercase().contains(&needle) {
                continue;
            }
            match RemoteUrl::parse(&remote.fetch_url) {
                Ok(parsed) => {
                    debug!(remote = %remote.name, domain, "using remote matching domain override");
                    return Ok(parsed.with_host(needle.clone()).web_url());
                }
                Err(e) => debug!(
                    remote = %remote.name,
                    error = %redact::sanitize(&e.to_string()),
                    "skipping remote"
                ),
            }
        }
    }

    // 3. First remote that parses
    let mut last_error = None;
    for remote in &repository.remotes {
        match normalize_remote_to_web_url(&remote.fetch_url, &candidates) {
            Ok(url) => {
                debug!(remote = %remote.name, "using first parseable remote");
                return Ok(url);
            }
            Err(e) => {
                debug!(
                    remote = %remote.name,
                    error = %redact::sanitize(&e.to_string()),
                    "skipping remote"
                );
                last_error = Some(e);
            }
        }
    }

    match (repository.remotes.len(), last_error) {
        (1, Some(e)) => Err(e),
        _ => Err(RemoteError::NoRemoteFound),
    }
}
