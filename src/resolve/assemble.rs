//! resolve::assemble
//!
//! Final URL assembly.

use crate::core::types::LineAnchor;

/// Build `<web_url>/blob/<reference>/<path><anchor>`.
///
/// `normalized_path` must already be URL-encoded.
///
/// # Example
///
/// ```
/// use ghlink::core::types::LineAnchor;
/// use ghlink::resolve::assemble_url;
///
/// assert_eq!(
///     assemble_url("https://github.com/o/r", "main", "src/lib.rs", LineAnchor::Line(3)),
///     "https://github.com/o/r/blob/main/src/lib.rs#L3"
/// );
/// ```
pub fn assemble_url(
    web_url: &str,
    reference: &str,
    normalized_path: &str,
    anchor: LineAnchor,
) -> String {
    format!("{}/blob/{}/{}{}", web_url, reference, normalized_path, anchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_anchor() {
        assert_eq!(
            assemble_url(
                "https://github.com/foo/bar-baz",
                "test-branch",
                "bar.md",
                LineAnchor::Range(31, 41),
            ),
            "https://github.com/foo/bar-baz/blob/test-branch/bar.md#L31-L41"
        );
    }

    #[test]
    fn no_anchor_for_files() {
        let url = assemble_url("https://h/o/r", "abc123", "logo.png", LineAnchor::None);
        assert_eq!(url, "https://h/o/r/blob/abc123/logo.png");
        assert!(!url.contains("#L"));
    }
}
