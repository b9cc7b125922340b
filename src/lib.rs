//! ghlink - Web links to files in Git repositories
//!
//! ghlink turns a file (optionally a line range) inside a local Git
//! checkout into the URL of that file on its hosting site, pinned to a
//! branch, the default branch, or the current commit.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line host (parses args, opens repositories)
//! - [`resolve`] - The URL resolution pipeline
//! - [`remote`] - Remote URL parsing and web URL selection
//! - [`git`] - Git host abstraction with local and mock implementations
//! - [`core`] - Domain types, path handling, configuration
//! - [`redact`] - Scrubbing sensitive data from diagnostics
//! - [`ui`] - Output formatting
//!
//! # Resolution
//!
//! The resolver never talks to Git directly. It goes through
//! [`git::GitHost`], which the CLI backs with libgit2 and tests back with
//! [`git::MockGit`]. Repository discovery and remote population may finish
//! after a request starts, so the resolver waits and polls with bounded
//! timeouts instead of failing on the first look.

pub mod cli;
pub mod core;
pub mod git;
pub mod redact;
pub mod remote;
pub mod resolve;
pub mod ui;
