//! remote::url
//!
//! Git remote URL normalization.
//!
//! # Supported Forms
//!
//! - `https://<host>/<owner>/<repo>[.git]` (and `http://`)
//! - `git@<host>:<owner>/<repo>[.git]` (scp-like, any user)
//! - `ssh://[user@]<host>[:port]/<owner>/<repo>[.git]`
//! - `git+https://<host>/<owner>/<repo>[.git]`
//! - `git+ssh://[user@]<host>/<owner>/<repo>[.git]`
//! - `git://<host>/<owner>/<repo>[.git]`
//!
//! A trailing `#<fragment>` is ignored. Hosts are not checked against an
//! allow-list: any syntactically valid host is accepted, so self-hosted
//! forges work without configuration.
//!
//! # Example
//!
//! ```
//! use ghlink::remote::normalize_remote_to_web_url;
//!
//! assert_eq!(
//!     normalize_remote_to_web_url("git@github.com:user/repo.git#main", &[]).unwrap(),
//!     "https://github.com/user/repo"
//! );
//! ```

use std::fmt;

use url::{Host, Url};

use super::RemoteError;

/// Schemes accepted for URL-style remotes.
const URL_SCHEMES: &[&str] = &["https", "http", "ssh", "git", "git+https", "git+http", "git+ssh"];

/// A parsed remote pointing at an `<owner>/<repo>` on some host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    host: String,
    owner: String,
    repo: String,
}

impl RemoteUrl {
    /// Parse a remote URL.
    ///
    /// # Errors
    ///
    /// [`RemoteError::UnrecognizedFormat`] if no host and owner/repo pair can
    /// be extracted.
    pub fn parse(fetch_url: &str) -> Result<Self, RemoteError> {
        let unrecognized = || RemoteError::UnrecognizedFormat {
            url: fetch_url.to_string(),
        };

        let trimmed = fetch_url.trim();
        let without_fragment = match trimmed.split_once('#') {
            Some((before, _)) => before,
            None => trimmed,
        };

        let (host, segments) = if without_fragment.contains("://") {
            parse_url_form(without_fragment).ok_or_else(unrecognized)?
        } else {
            parse_scp_form(without_fragment).ok_or_else(unrecognized)?
        };

        let [owner, repo] = segments.as_slice() else {
            return Err(unrecognized());
        };

        let repo = repo.strip_suffix(".git").unwrap_or(repo.as_str());
        if owner.is_empty() || repo.is_empty() || !is_valid_host(&host) {
            return Err(unrecognized());
        }

        Ok(Self {
            host: host.to_ascii_lowercase(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// The web host, including a port for HTTP(S) remotes on non-default ports.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The repository owner or organization.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The repository name without `.git`.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Replace the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Canonical `https://<host>/<owner>/<repo>` form.
    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.repo)
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.web_url())
    }
}

/// Parse `scheme://[user@]host[:port]/owner/repo`.
fn parse_url_form(raw: &str) -> Option<(String, Vec<String>)> {
    let url = Url::parse(raw).ok()?;
    if !URL_SCHEMES.contains(&url.scheme()) {
        return None;
    }

    let host = url.host_str()?.to_string();
    let is_web = matches!(url.scheme(), "https" | "http" | "git+https" | "git+http");
    let host = match (is_web, url.port()) {
        (true, Some(port)) => format!("{}:{}", host, port),
        _ => host,
    };

    let segments = url
        .path_segments()?
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    Some((host, segments))
}

/// Parse scp-like `[user@]host:owner/repo`.
fn parse_scp_form(raw: &str) -> Option<(String, Vec<String>)> {
    let (authority, path) = raw.split_once(':')?;
    let host = match authority.rsplit_once('@') {
        Some((_, host)) => host,
        None => authority,
    };
    // `C:/path` is a Windows drive, not a host
    if host.is_empty() || host.contains('/') || (host.len() == 1 && authority.len() == 1) {
        return None;
    }

    let segments = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    Some((host.to_string(), segments))
}

/// Check that `host` (optionally with `:port`) is a syntactically valid host.
fn is_valid_host(host: &str) -> bool {
    let name = match host.rsplit_once(':') {
        Some((name, port)) if port.parse::<u16>().is_ok() => name,
        _ => host,
    };
    !name.is_empty() && Host::parse(name).is_ok()
}

/// Normalize a remote fetch URL into a web URL.
///
/// When the parsed host matches one of `host_candidates` (case-insensitive),
/// the candidate's spelling is used in the output. Hosts that match no
/// candidate are accepted as-is.
///
/// # Errors
///
/// [`RemoteError::UnrecognizedFormat`] if the string is not a recognizable
/// Git remote.
///
/// # Example
///
/// ```
/// use ghlink::remote::normalize_remote_to_web_url;
///
/// let url = normalize_remote_to_web_url(
///     "git+ssh://git@GitHub.Enterprise.com/user/repo.git",
///     &["github.enterprise.com"],
/// )
/// .unwrap();
/// assert_eq!(url, "https://github.enterprise.com/user/repo");
///
/// assert!(normalize_remote_to_web_url("not a remote", &[]).is_err());
/// ```
pub fn normalize_remote_to_web_url(
    fetch_url: &str,
    host_candidates: &[&str],
) -> Result<String, RemoteError> {
    let parsed = RemoteUrl::parse(fetch_url)?;
    let canonical = host_candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty() && c.eq_ignore_ascii_case(parsed.host()));

    let parsed = match canonical {
        Some(host) => parsed.with_host(host.to_string()),
        None => parsed,
    };
    Ok(parsed.web_url())
}
