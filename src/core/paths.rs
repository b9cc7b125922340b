//! core::paths
//!
//! Path matching and URL path encoding.
//!
//! # Overview
//!
//! Editors report absolute paths using the platform separator, which is not
//! necessarily the separator of the machine this code runs on. Every helper
//! here takes the separator explicitly and works on strings.
//!
//! Prefix matching is ASCII case-insensitive and respects component
//! boundaries: `/work/repo` owns `/work/repo/a.rs` and `/WORK/Repo/a.rs`, but
//! not `/work/repository/a.rs`.
//!
//! # Example
//!
//! ```
//! use ghlink::core::paths::{normalize_path_for_url, relative_path};
//!
//! let rel = relative_path("T:\\foo", "T:\\foo\\docs\\read me.md", "\\").unwrap();
//! assert_eq!(rel, "docs\\read me.md");
//! assert_eq!(normalize_path_for_url(&rel, "\\"), "docs/read%20me.md");
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left unescaped in a URL path segment.
///
/// Only the RFC 3986 unreserved set survives. `!`, `'`, `(`, `)` and `*`
/// are escaped along with the URL metacharacters `#` and `?`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Normalize a repository-relative path into a URL path.
///
/// The path is split on `separator`, each segment is percent-encoded
/// independently and the segments are joined with `/`. A character that is
/// not the separator (for example a `\` in a Unix file name) stays inside its
/// segment and is encoded, so it never introduces a path boundary.
///
/// # Example
///
/// ```
/// use ghlink::core::paths::normalize_path_for_url;
///
/// assert_eq!(normalize_path_for_url("a/b/c", "/"), "a/b/c");
/// assert_eq!(normalize_path_for_url("src\\lib.rs", "\\"), "src/lib.rs");
/// assert_eq!(normalize_path_for_url("what?#1.md", "/"), "what%3F%231.md");
/// assert_eq!(normalize_path_for_url("a\\b.md", "/"), "a%5Cb.md");
/// ```
pub fn normalize_path_for_url(relative_path: &str, separator: &str) -> String {
    split_path(relative_path, separator)
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a path on `separator`.
///
/// An empty separator yields the whole path as one segment.
fn split_path<'a>(path: &'a str, separator: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
    if separator.is_empty() {
        Box::new(std::iter::once(path))
    } else {
        Box::new(path.split(separator))
    }
}

/// Rewrite `/` into `\` for Windows-style paths.
///
/// Windows accepts both separators, and forward slashes cannot appear in
/// Windows file names, so the rewrite is lossless there. Other separators
/// are returned unchanged.
fn canonical(path: &str, separator: &str) -> String {
    if separator == "\\" {
        path.replace('/', "\\")
    } else {
        path.to_string()
    }
}

/// Strip trailing separators, keeping a bare root intact.
fn trim_trailing<'a>(path: &'a str, separator: &str) -> &'a str {
    if separator.is_empty() {
        return path;
    }
    let mut trimmed = path;
    while trimmed.len() > separator.len() && trimmed.ends_with(separator) {
        trimmed = &trimmed[..trimmed.len() - separator.len()];
    }
    trimmed
}

/// Check if `root` is `path` or one of its ancestors.
///
/// # Example
///
/// ```
/// use ghlink::core::paths::is_path_prefix;
///
/// assert!(is_path_prefix("/work/repo", "/work/repo/src/a.rs", "/"));
/// assert!(is_path_prefix("C:\\Work", "c:\\work\\a.rs", "\\"));
/// assert!(!is_path_prefix("/work/repo", "/work/repository/a.rs", "/"));
/// ```
pub fn is_path_prefix(root: &str, path: &str, separator: &str) -> bool {
    relative_path(root, path, separator).is_some()
}

/// Compute `path` relative to `root`.
///
/// Returns `None` when `root` is not an ancestor of (or equal to) `path`.
/// The returned path uses `separator` and has no leading separator; it is
/// empty when both paths are the same.
pub fn relative_path(root: &str, path: &str, separator: &str) -> Option<String> {
    let root = canonical(root, separator);
    let path = canonical(path, separator);
    let root = trim_trailing(&root, separator);

    if path.len() < root.len()
        || !path.is_char_boundary(root.len())
        || !path[..root.len()].eq_ignore_ascii_case(root)
    {
        return None;
    }

    let rest = &path[root.len()..];
    if rest.is_empty() {
        return Some(String::new());
    }

    if !separator.is_empty() && root.ends_with(separator) {
        return Some(rest.to_string());
    }

    if separator.is_empty() {
        return Some(rest.to_string());
    }

    let rest = rest.strip_prefix(separator)?;
    Some(rest.trim_start_matches(separator).to_string())
}

/// Join a possibly-relative `child` onto `base`.
///
/// Absolute children (leading separator, `/`, or a drive letter) are returned
/// as-is. Forward slashes in `child` are treated as separators.
///
/// # Example
///
/// ```
/// use ghlink::core::paths::join_path;
///
/// assert_eq!(join_path("/workspace/root", "nested/git/repo", "/"), "/workspace/root/nested/git/repo");
/// assert_eq!(join_path("T:\\ws", "nested/repo", "\\"), "T:\\ws\\nested\\repo");
/// assert_eq!(join_path("/ws", "/abs/repo", "/"), "/abs/repo");
/// ```
pub fn join_path(base: &str, child: &str, separator: &str) -> String {
    let child = canonical(child, separator);
    if is_absolute(&child, separator) {
        return child;
    }

    let base = canonical(base, separator);
    let base = trim_trailing(&base, separator);
    let child = child.trim_start_matches("./");
    let child = trim_trailing(child, separator);

    if separator.is_empty() || base.ends_with(separator) {
        format!("{}{}", base, child)
    } else {
        format!("{}{}{}", base, separator, child)
    }
}

/// Check if a path is absolute for the given separator convention.
fn is_absolute(path: &str, separator: &str) -> bool {
    if path.starts_with('/') || (!separator.is_empty() && path.starts_with(separator)) {
        return true;
    }
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
