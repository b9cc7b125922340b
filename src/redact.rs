//! redact
//!
//! Scrubbing error messages before they are logged or shown.
//!
//! Errors can carry file paths, remote URLs with embedded credentials, and
//! other data that should not leave the machine. [`sanitize`] rewrites the
//! known shapes into placeholders:
//!
//! | Input                         | Output                 |
//! |-------------------------------|------------------------|
//! | `/home/me/src/app.rs`         | `<file>app.rs`         |
//! | `C:\Users\me\notes.txt`       | `<file>notes.txt`      |
//! | `https://u:p@host/x?token=1`  | `https://host<path>`   |
//! | `me@example.com`              | `<email>`              |
//! | `10.0.0.1`, full IPv6         | `<ip>`                 |
//! | `token=abc`, `password: x`    | `token=<redacted>`     |
//! | UUIDs                         | `<uuid>`               |
//! | binary base64 over 20 chars   | `<base64>`             |
//!
//! Whitespace runs collapse to one space and the result is capped at
//! [`MAX_LENGTH`] characters followed by `...`.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::{Captures, Regex};

/// Longest message kept before truncation.
pub const MAX_LENGTH: usize = 500;

/// Shortest base64 run considered for redaction is one longer than this.
const MIN_BASE64_LENGTH: usize = 20;

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(https?|ssh|git)://(?:[^\s/<>"@]+@)?([^\s/<>"?#:]+)[^\s<>"]*"#)
        .expect("static regex: url pattern")
});

static UNIX_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:/[\w.\-]+)+/[\w.\-/]+").expect("static regex: unix path pattern")
});

static WINDOWS_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]:\\[\w\-\\]+\\[\w.\-\\]+").expect("static regex: windows path pattern")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}")
        .expect("static regex: email pattern")
});

static IPV4_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)",
    )
    .expect("static regex: ipv4 pattern")
});

static IPV6_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Fa-f0-9]{1,4}:){7}[A-Fa-f0-9]{1,4}").expect("static regex: ipv6 pattern")
});

static CREDENTIAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(api[_\-]?key|token|key|secret|password|pwd|auth)[:=]\s*['"]?\w+['"]?"#)
        .expect("static regex: credential pattern")
});

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("static regex: uuid pattern")
});

static BASE64_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{4})")
        .expect("static regex: base64 pattern")
});

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex: whitespace pattern"));

/// Remove sensitive data from a message.
///
/// # Example
///
/// ```
/// use ghlink::redact::sanitize;
///
/// assert_eq!(
///     sanitize("Error reading file /home/user/secret/file.txt"),
///     "Error reading file <file>file.txt"
/// );
/// assert_eq!(sanitize("Invalid user: john.doe@company.com"), "Invalid user: <email>");
/// ```
pub fn sanitize(message: &str) -> String {
    let message = URL_REGEX.replace_all(message, |caps: &Captures| {
        format!("{}://{}<path>", caps[1].to_ascii_lowercase(), &caps[2])
    });
    let message = UNIX_PATH_REGEX.replace_all(&message, |caps: &Captures| {
        format!("<file>{}", last_segment(&caps[0], '/'))
    });
    let message = WINDOWS_PATH_REGEX.replace_all(&message, |caps: &Captures| {
        format!("<file>{}", last_segment(&caps[0], '\\'))
    });
    let message = EMAIL_REGEX.replace_all(&message, "<email>");
    let message = IPV4_REGEX.replace_all(&message, "<ip>");
    let message = IPV6_REGEX.replace_all(&message, "<ip>");
    let message = CREDENTIAL_REGEX.replace_all(&message, "${1}=<redacted>");
    let message = UUID_REGEX.replace_all(&message, "<uuid>");
    let message = BASE64_REGEX.replace_all(&message, |caps: &Captures| {
        let matched = &caps[0];
        if is_binary_base64(matched) {
            "<base64>".to_string()
        } else {
            matched.to_string()
        }
    });
    let message = WHITESPACE_REGEX.replace_all(&message, " ");

    truncate(message.trim())
}

fn last_segment(path: &str, separator: char) -> &str {
    path.rsplit(separator).next().unwrap_or(path)
}

/// Long base64 that decodes to something with control characters.
///
/// Short runs and ones that decode to text are left alone, since ordinary
/// words also match the base64 alphabet.
fn is_binary_base64(candidate: &str) -> bool {
    if candidate.len() <= MIN_BASE64_LENGTH {
        return false;
    }
    match STANDARD.decode(candidate) {
        Ok(bytes) => bytes
            .iter()
            .any(|&b| matches!(b, 0x00..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F)),
        Err(_) => false,
    }
}

fn truncate(message: &str) -> String {
    match message.char_indices().nth(MAX_LENGTH) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}
