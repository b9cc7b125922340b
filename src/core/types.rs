//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ActiveLocation`] - The file (and optional selection) a URL is built for
//! - [`Selection`] - Zero-based line range inside a text document
//! - [`LineAnchor`] - The `#L..` fragment derived from a selection
//! - [`RefStrategy`] - Which ref (branch, default branch, commit) goes in the URL
//! - [`Repository`] - Read-only snapshot of a repository's live state
//! - [`ResolutionConfig`] - Per-call settings for a resolution
//!
//! # Paths
//!
//! Paths are carried as strings together with an explicit separator rather
//! than as `PathBuf`. The editor may report Windows paths (`T:\foo\bar.md`)
//! while this code runs elsewhere, and all prefix matching is done
//! case-insensitively on the string form.
//!
//! # Examples
//!
//! ```
//! use ghlink::core::types::{ActiveLocation, LineAnchor, Selection};
//!
//! let location = ActiveLocation::text("/repo/src/main.rs", Selection::new(4, 4));
//! assert_eq!(location.line_anchor(), LineAnchor::Line(5));
//! assert_eq!(location.line_anchor().to_string(), "#L5");
//!
//! let binary = ActiveLocation::file("/repo/logo.png");
//! assert_eq!(binary.line_anchor().to_string(), "");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A zero-based line selection inside a text document.
///
/// `start_line` and `end_line` are editor line indices; the first line of a
/// document is `0`. A selection whose start and end are equal is a single
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// First selected line (zero-based)
    pub start_line: u32,
    /// Last selected line (zero-based)
    pub end_line: u32,
}

impl Selection {
    /// Create a selection. Reversed bounds are reordered.
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line: start_line.min(end_line),
            end_line: start_line.max(end_line),
        }
    }

    /// A selection covering exactly one line.
    pub fn line(line: u32) -> Self {
        Self::new(line, line)
    }

    /// Check if the selection covers a single line.
    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }
}

/// The line fragment appended to a blob URL.
///
/// Line numbers stored here are already one-based, as they appear in the
/// rendered anchor.
///
/// # Example
///
/// ```
/// use ghlink::core::types::{LineAnchor, Selection};
///
/// assert_eq!(LineAnchor::from(Selection::new(0, 1)).to_string(), "#L1-L2");
/// assert_eq!(LineAnchor::from(Selection::new(30, 40)).to_string(), "#L31-L41");
/// assert_eq!(LineAnchor::None.to_string(), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAnchor {
    /// No anchor (non-text files)
    None,
    /// A single line
    Line(u32),
    /// An inclusive range of lines
    Range(u32, u32),
}

impl From<Selection> for LineAnchor {
    fn from(selection: Selection) -> Self {
        if selection.is_single_line() {
            LineAnchor::Line(selection.start_line.saturating_add(1))
        } else {
            LineAnchor::Range(
                selection.start_line.saturating_add(1),
                selection.end_line.saturating_add(1),
            )
        }
    }
}

impl fmt::Display for LineAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineAnchor::None => Ok(()),
            LineAnchor::Line(line) => write!(f, "#L{}", line),
            LineAnchor::Range(start, end) => write!(f, "#L{}-L{}", start, end),
        }
    }
}

/// The location a URL is requested for.
///
/// Text documents carry a selection; other files (images, PDFs, binaries
/// opened in a non-text editor) are referenced by path only and never get
/// a line anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveLocation {
    /// An open text document with a selection.
    Text {
        /// Absolute path of the document
        path: String,
        /// Current selection
        selection: Selection,
    },
    /// A bare file reference without a text selection.
    File {
        /// Absolute path of the file
        path: String,
    },
}

impl ActiveLocation {
    /// A text document location.
    pub fn text(path: impl Into<String>, selection: Selection) -> Self {
        ActiveLocation::Text {
            path: path.into(),
            selection,
        }
    }

    /// A non-text file location.
    pub fn file(path: impl Into<String>) -> Self {
        ActiveLocation::File { path: path.into() }
    }

    /// Absolute path of the file.
    pub fn path(&self) -> &str {
        match self {
            ActiveLocation::Text { path, .. } | ActiveLocation::File { path } => path,
        }
    }

    /// The line anchor for this location.
    pub fn line_anchor(&self) -> LineAnchor {
        match self {
            ActiveLocation::Text { selection, .. } => LineAnchor::from(*selection),
            ActiveLocation::File { .. } => LineAnchor::None,
        }
    }
}

/// Which ref the URL points at.
///
/// Exactly one strategy is active per resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefStrategy {
    /// The repository's current branch
    #[default]
    CurrentBranch,
    /// The repository's default branch (`main`, `master`, ...)
    DefaultBranch,
    /// The current commit hash
    Permalink,
}

impl RefStrategy {
    /// Map the legacy `perma` / `default` flag pair onto a strategy.
    ///
    /// `perma` wins when both are set.
    ///
    /// # Example
    ///
    /// ```
    /// use ghlink::core::types::RefStrategy;
    ///
    /// assert_eq!(RefStrategy::from_flags(false, false), RefStrategy::CurrentBranch);
    /// assert_eq!(RefStrategy::from_flags(true, true), RefStrategy::Permalink);
    /// assert_eq!(RefStrategy::from_flags(false, true), RefStrategy::DefaultBranch);
    /// ```
    pub fn from_flags(perma: bool, default: bool) -> Self {
        if perma {
            RefStrategy::Permalink
        } else if default {
            RefStrategy::DefaultBranch
        } else {
            RefStrategy::CurrentBranch
        }
    }

    /// Short name used in logs and JSON output.
    pub fn name(&self) -> &'static str {
        match self {
            RefStrategy::CurrentBranch => "current",
            RefStrategy::DefaultBranch => "default",
            RefStrategy::Permalink => "permalink",
        }
    }
}

impl fmt::Display for RefStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named remote and its fetch URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Fetch URL as configured
    pub fetch_url: String,
}

impl Remote {
    /// Create a remote.
    pub fn new(name: impl Into<String>, fetch_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fetch_url: fetch_url.into(),
        }
    }
}

/// A local branch and the remote it tracks, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRef {
    /// Local branch name
    pub name: String,
    /// Name of the tracked remote
    pub remote: Option<String>,
}

impl TrackingRef {
    /// A branch tracking `remote`.
    pub fn tracking(name: impl Into<String>, remote: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote: Some(remote.into()),
        }
    }
}

/// What HEAD points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    /// Current branch name (`None` when detached or unborn)
    pub branch: Option<String>,
    /// Current commit hash (`None` in an empty repository)
    pub commit: Option<String>,
}

/// A read-only snapshot of a repository known to the host.
///
/// The snapshot is owned by the caller for the duration of one resolution.
/// A repository without remotes is considered not yet ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Working directory root
    pub root: String,
    /// HEAD state
    pub head: Head,
    /// Remotes in configuration order
    pub remotes: Vec<Remote>,
    /// Branch-to-remote tracking associations
    pub refs: Vec<TrackingRef>,
}

impl Repository {
    /// A repository rooted at `root` with no state yet.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            head: Head::default(),
            remotes: Vec::new(),
            refs: Vec::new(),
        }
    }

    /// Set the current branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.head.branch = Some(branch.into());
        self
    }

    /// Set the current commit.
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.head.commit = Some(commit.into());
        self
    }

    /// Append a remote.
    pub fn with_remote(mut self, name: impl Into<String>, fetch_url: impl Into<String>) -> Self {
        self.remotes.push(Remote::new(name, fetch_url));
        self
    }

    /// Append a tracking ref.
    pub fn with_ref(mut self, tracking: TrackingRef) -> Self {
        self.refs.push(tracking);
        self
    }

    /// Check whether the repository has reported any remotes yet.
    pub fn is_ready(&self) -> bool {
        !self.remotes.is_empty()
    }

    /// Find a remote by name.
    pub fn remote(&self, name: &str) -> Option<&Remote> {
        self.remotes.iter().find(|r| r.name == name)
    }

    /// The remote tracked by the current branch, if any.
    pub fn upstream_remote(&self) -> Option<&Remote> {
        let branch = self.head.branch.as_deref()?;
        let tracked = self
            .refs
            .iter()
            .find(|r| r.name == branch)
            .and_then(|r| r.remote.as_deref())?;
        self.remote(tracked)
    }
}

/// Per-call resolution settings.
///
/// Built by the host from user settings and the invoked command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// Which ref to put in the URL
    pub strategy: RefStrategy,
    /// Host name to prefer among remotes (self-hosted forges)
    pub domain_override: Option<String>,
    /// Repository folder, relative to the workspace root, used when the
    /// active file's own repository cannot be found
    pub root_git_folder: Option<String>,
    /// Branch to use as the default branch
    pub default_branch_fallback: Option<String>,
    /// Separator used in file paths reported by the editor
    pub path_separator: String,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            strategy: RefStrategy::CurrentBranch,
            domain_override: None,
            root_git_folder: None,
            default_branch_fallback: None,
            path_separator: std::path::MAIN_SEPARATOR_STR.to_string(),
        }
    }
}

impl ResolutionConfig {
    /// Default settings with the given strategy.
    pub fn with_strategy(strategy: RefStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Use `separator` for file paths.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.path_separator = separator.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod anchors {
        use super::*;

        #[test]
        fn single_line_is_one_based() {
            assert_eq!(LineAnchor::from(Selection::new(4, 4)).to_string(), "#L5");
        }

        #[test]
        fn range_is_one_based_inclusive() {
            assert_eq!(LineAnchor::from(Selection::new(0, 1)).to_string(), "#L1-L2");
            assert_eq!(
                LineAnchor::from(Selection::new(30, 40)).to_string(),
                "#L31-L41"
            );
        }

        #[test]
        fn last_line_index_does_not_overflow() {
            let last = u32::MAX;
            assert_eq!(
                LineAnchor::from(Selection::new(last, last)).to_string(),
                "#L4294967295"
            );
            assert_eq!(
                LineAnchor::from(Selection::new(last - 1, last)),
                LineAnchor::Range(last, last)
            );
        }

        #[test]
        fn reversed_selection_is_reordered() {
            let selection = Selection::new(9, 3);
            assert_eq!(selection.start_line, 3);
            assert_eq!(selection.end_line, 9);
        }

        #[test]
        fn file_location_has_no_anchor() {
            let location = ActiveLocation::file("/repo/image.png");
            assert_eq!(location.line_anchor(), LineAnchor::None);
            assert_eq!(location.line_anchor().to_string(), "");
        }
    }

    mod repository {
        use super::*;

        #[test]
        fn empty_remotes_is_not_ready() {
            assert!(!Repository::new("/repo").is_ready());
            assert!(Repository::new("/repo")
                .with_remote("origin", "https://github.com/o/r.git")
                .is_ready());
        }

        #[test]
        fn upstream_remote_follows_current_branch() {
            let repo = Repository::new("/repo")
                .with_branch("feature")
                .with_remote("origin", "https://github.com/user1/repo.git")
                .with_remote("upstream", "https://github.com/user2/repo.git")
                .with_ref(TrackingRef::tracking("feature", "upstream"));

            assert_eq!(
                repo.upstream_remote().map(|r| r.name.as_str()),
                Some("upstream")
            );
        }

        #[test]
        fn upstream_remote_missing_is_none() {
            let repo = Repository::new("/repo")
                .with_branch("feature")
                .with_remote("origin", "https://github.com/user/repo.git")
                .with_ref(TrackingRef::tracking("feature", "missing"));

            assert!(repo.upstream_remote().is_none());
        }

        #[test]
        fn detached_head_has_no_upstream() {
            let repo = Repository::new("/repo")
                .with_commit("abc123")
                .with_remote("origin", "https://github.com/user/repo.git")
                .with_ref(TrackingRef::tracking("main", "origin"));

            assert!(repo.upstream_remote().is_none());
        }
    }
}
