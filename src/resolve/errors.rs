//! resolve::errors
//!
//! Typed failures of a URL resolution.
//!
//! Only exhaustion of every candidate inside a component surfaces here.
//! Per-remote and per-strategy failures are absorbed by the component that
//! owns them and show up at most as the `last_error` of the final variant.

use thiserror::Error;

use crate::git::GitError;
use crate::remote::RemoteError;

/// Errors from URL resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Neither a text document nor a file reference was supplied.
    #[error("no active file")]
    NoActiveFile,

    /// The active file is not inside any known workspace folder.
    #[error("file is not inside a workspace folder: {path}")]
    NoWorkspaceFolder {
        /// The active file
        path: String,
    },

    /// No owning repository appeared within the discovery window.
    #[error("timed out waiting for a git repository containing {path}")]
    RepositoryDiscoveryTimeout {
        /// The active file
        path: String,
    },

    /// The repository never reported any remotes.
    #[error("repository at {root} has no remotes")]
    RemotesNotPopulatedTimeout {
        /// Root of the repository that was polled
        root: String,
    },

    /// The repository has remotes but none map to a web URL.
    #[error("no git remote with a recognizable URL found")]
    NoGitRemoteFound,

    /// The repository's only remote could not be parsed.
    #[error("unrecognized remote URL format: {url}")]
    UnrecognizedRemoteFormat {
        /// The remote's fetch URL
        url: String,
    },

    /// Every default branch strategy came up empty.
    #[error(
        "could not determine the default branch{}. Configure default_branch_fallback to set it explicitly",
        last_error.as_ref().map(|e| format!(" ({})", e)).unwrap_or_default()
    )]
    DefaultBranchUndetermined {
        /// The error from the last strategy that failed, if any
        last_error: Option<GitError>,
    },

    /// A commit hash was needed but the repository has none yet.
    #[error("no commit available for repository at {root}")]
    NoCommitAvailable {
        /// Root of the repository
        root: String,
    },
}

impl ResolveError {
    /// Stable machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::NoActiveFile => "no_active_file",
            ResolveError::NoWorkspaceFolder { .. } => "no_workspace_folder",
            ResolveError::RepositoryDiscoveryTimeout { .. } => "repository_discovery_timeout",
            ResolveError::RemotesNotPopulatedTimeout { .. } => "remotes_not_populated_timeout",
            ResolveError::NoGitRemoteFound => "no_git_remote_found",
            ResolveError::UnrecognizedRemoteFormat { .. } => "unrecognized_remote_format",
            ResolveError::DefaultBranchUndetermined { .. } => "default_branch_undetermined",
            ResolveError::NoCommitAvailable { .. } => "no_commit_available",
        }
    }
}

impl From<RemoteError> for ResolveError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::UnrecognizedFormat { url } => {
                ResolveError::UnrecognizedRemoteFormat { url }
            }
            RemoteError::NoRemoteFound => ResolveError::NoGitRemoteFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_map_onto_taxonomy() {
        let err: ResolveError = RemoteError::NoRemoteFound.into();
        assert_eq!(err, ResolveError::NoGitRemoteFound);

        let err: ResolveError = RemoteError::UnrecognizedFormat {
            url: "not a url".into(),
        }
        .into();
        assert_eq!(err.kind(), "unrecognized_remote_format");
    }

    #[test]
    fn undetermined_default_branch_names_the_setting() {
        let err = ResolveError::DefaultBranchUndetermined { last_error: None };
        assert!(err.to_string().contains("default_branch_fallback"));

        let err = ResolveError::DefaultBranchUndetermined {
            last_error: Some(GitError::Command {
                message: "git not found".into(),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("git not found"));
        assert!(message.contains("default_branch_fallback"));
    }
}
