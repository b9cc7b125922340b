//! remote
//!
//! Turning Git remotes into web URLs.
//!
//! # Modules
//!
//! - `url`: Remote URL normalizer (`https://<host>/<owner>/<repo>`)
//! - `selector`: Remote selection for a repository
//!
//! # Example
//!
//! ```
//! use ghlink::remote::{normalize_remote_to_web_url, RemoteUrl};
//!
//! let parsed = RemoteUrl::parse("ssh://git@github.com/octocat/hello-world.git").unwrap();
//! assert_eq!(parsed.owner(), "octocat");
//! assert_eq!(parsed.repo(), "hello-world");
//! assert_eq!(
//!     normalize_remote_to_web_url("ssh://git@github.com/octocat/hello-world.git", &[]).unwrap(),
//!     "https://github.com/octocat/hello-world"
//! );
//! ```

mod selector;
mod url;

pub use self::selector::select_web_url;
pub use self::url::{normalize_remote_to_web_url, RemoteUrl};

use thiserror::Error;

/// Errors from remote normalization and selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// A remote string is not a recognizable Git remote.
    #[error("unrecognized remote format: {url}")]
    UnrecognizedFormat {
        /// The fetch URL that failed to parse
        url: String,
    },

    /// No remote produced a usable web URL.
    #[error("no usable git remote found")]
    NoRemoteFound,
}
