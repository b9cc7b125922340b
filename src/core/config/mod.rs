//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Settings have two scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (applied by the caller)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$GHLINK_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/ghlink/config.toml`
//! 3. `~/.ghlink/config.toml`
//!
//! # Repo Config Location
//!
//! `.git/ghlink/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use ghlink::core::config::Settings;
//! use ghlink::core::types::RefStrategy;
//! use std::path::Path;
//!
//! let result = Settings::load(Some(Path::new("/path/to/repo"))).unwrap();
//! let config = result.settings.to_resolution_config(RefStrategy::Permalink, "/");
//! println!("domain override: {:?}", config.domain_override);
//! ```

pub mod schema;

pub use schema::SettingsFile;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{RefStrategy, ResolutionConfig};

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The merged settings.
    pub settings: Settings,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged settings from all sources.
///
/// Accessors apply precedence rules: repo values override global ones.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Global settings
    pub global: SettingsFile,
    /// Repository settings (if in a repo)
    pub repo: Option<SettingsFile>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Settings {
    /// Build settings from already-parsed scopes.
    pub fn new(global: SettingsFile, repo: Option<SettingsFile>) -> Self {
        Self {
            global,
            repo,
            global_path: None,
            repo_path: None,
        }
    }

    /// Load settings from default locations.
    ///
    /// If `repo_root` is provided, also loads repo-specific settings.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(repo_root: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = Self::load_global()?;
        let (repo, repo_path) = match repo_root {
            Some(root) => Self::load_repo(root)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        for (file, path) in [(Some(&global), &global_path), (repo.as_ref(), &repo_path)] {
            if let (Some(file), Some(path)) = (file, path) {
                if file.git_url.is_some() {
                    warnings.push(ConfigWarning {
                        message: "'git_url' is deprecated, use 'domain_override' instead"
                            .to_string(),
                        path: path.clone(),
                    });
                }
            }
        }

        Ok(ConfigLoadResult {
            settings: Settings {
                global,
                repo,
                global_path,
                repo_path,
            },
            warnings,
        })
    }

    /// Load global settings from standard locations.
    fn load_global() -> Result<(SettingsFile, Option<PathBuf>), ConfigError> {
        // 1. Check $GHLINK_CONFIG
        if let Ok(path) = std::env::var("GHLINK_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_settings(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/ghlink/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("ghlink/config.toml");
            if path.exists() {
                let config = Self::read_settings(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.ghlink/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".ghlink/config.toml");
            if path.exists() {
                let config = Self::read_settings(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((SettingsFile::default(), None))
    }

    /// Load repository settings.
    fn load_repo(repo_root: &Path) -> Result<(Option<SettingsFile>, Option<PathBuf>), ConfigError> {
        let path = Self::repo_config_path(repo_root);
        if !path.exists() {
            return Ok((None, None));
        }
        let config = Self::read_settings(&path)?;
        Ok((Some(config), Some(path)))
    }

    /// Read and parse a settings file.
    fn read_settings(path: &Path) -> Result<SettingsFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for repo settings.
    ///
    /// Returns `.git/ghlink/config.toml` relative to the given repo root.
    pub fn repo_config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(".git/ghlink/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the domain override.
    ///
    /// Honors the deprecated `git_url` alias in either scope.
    pub fn domain_override(&self) -> Option<&str> {
        self.repo
            .as_ref()
            .and_then(|r| r.effective_domain())
            .or_else(|| self.global.effective_domain())
    }

    /// Get the repository folder hint.
    pub fn root_git_folder(&self) -> Option<&str> {
        self.repo
            .as_ref()
            .and_then(|r| r.root_git_folder.as_deref())
            .or(self.global.root_git_folder.as_deref())
    }

    /// Get the default branch fallback.
    pub fn default_branch_fallback(&self) -> Option<&str> {
        self.repo
            .as_ref()
            .and_then(|r| r.default_branch_fallback.as_deref())
            .or(self.global.default_branch_fallback.as_deref())
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }

    /// Build the per-call resolution config.
    pub fn to_resolution_config(
        &self,
        strategy: RefStrategy,
        path_separator: &str,
    ) -> ResolutionConfig {
        ResolutionConfig {
            strategy,
            domain_override: self.domain_override().map(|s| s.trim().to_string()),
            root_git_folder: self.root_git_folder().map(String::from),
            default_branch_fallback: self.default_branch_fallback().map(|s| s.trim().to_string()),
            path_separator: path_separator.to_string(),
        }
    }
}
