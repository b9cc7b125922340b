//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Settings File
//!
//! Both scopes share one schema. Located at (in order of precedence):
//! 1. `.git/ghlink/config.toml` in the repository (repo scope)
//! 2. `$GHLINK_CONFIG` if set (global scope)
//! 3. `$XDG_CONFIG_HOME/ghlink/config.toml`
//! 4. `~/.ghlink/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Values are validated after parsing: hostnames must not carry a scheme or
//! path, and the fallback branch must be a plausible branch name.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// User settings.
///
/// # Example
///
/// ```toml
/// domain_override = "github.example.com"
/// root_git_folder = "nested/repo"
/// default_branch_fallback = "main"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// Host to prefer among remotes (self-hosted forges)
    pub domain_override: Option<String>,

    /// Deprecated alias for `domain_override`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,

    /// Repository folder relative to the workspace root
    pub root_git_folder: Option<String>,

    /// Branch used when the default branch cannot be detected
    pub default_branch_fallback: Option<String>,
}

impl SettingsFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("domain_override", &self.domain_override),
            ("git_url", &self.git_url),
        ] {
            if let Some(host) = value {
                validate_host(key, host)?;
            }
        }

        if let Some(branch) = &self.default_branch_fallback {
            let trimmed = branch.trim();
            if trimmed.is_empty()
                || trimmed.contains(char::is_whitespace)
                || trimmed.contains("..")
                || trimmed.starts_with('-')
            {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid default_branch_fallback '{}'",
                    branch
                )));
            }
        }

        Ok(())
    }

    /// The effective domain override, honoring the deprecated alias.
    pub fn effective_domain(&self) -> Option<&str> {
        self.domain_override.as_deref().or(self.git_url.as_deref())
    }
}

/// Check that a configured host is a bare hostname.
fn validate_host(key: &str, host: &str) -> Result<(), ConfigError> {
    let trimmed = host.trim();
    if trimmed.is_empty() || trimmed.contains("://") || trimmed.contains('/') {
        return Err(ConfigError::InvalidValue(format!(
            "invalid {} '{}', expected a host name such as github.example.com",
            key, host
        )));
    }
    Ok(())
}
