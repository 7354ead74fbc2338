//! Configuration management for sprintlens
//!
//! Values are layered: CLI flag > environment variable > YAML config file >
//! built-in default. clap resolves the first two into [`Overrides`];
//! [`Config`] is the file layer and [`Config::resolve`] merges everything
//! into [`Settings`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_TTL_HOURS;
use crate::cache::provider::DEFAULT_NOTE_CONCURRENCY;
use crate::client::graphql::DEFAULT_GITLAB_URL;
use crate::client::rate_limit::DEFAULT_PAGE_DELAY;
use crate::error::{ConfigError, Result};
use crate::metrics::store::DEFAULT_METRICS_PATH;

/// Default iteration cache directory, relative to the working directory
pub const DEFAULT_CACHE_DIR: &str = "cache/iterations";

/// Default branch whose pipelines count as deployments
pub const DEFAULT_BRANCH: &str = "main";

/// Contents of the YAML config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_url: Option<String>,

    /// GitLab personal access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_hours: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_path: Option<PathBuf>,

    /// Pause between pages of one connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_delay_ms: Option<u64>,

    /// Concurrent status-history lookups per iteration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_concurrency: Option<usize>,
}

/// Values taken from CLI flags or their environment variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub gitlab_url: Option<String>,
    pub token: Option<String>,
    pub group_path: Option<String>,
    pub project_path: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub cache_ttl_hours: Option<f64>,
    pub metrics_path: Option<PathBuf>,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub gitlab_url: String,
    pub token: Option<String>,
    pub group_path: Option<String>,
    pub project_path: Option<String>,
    pub default_branch: String,
    pub cache_dir: PathBuf,
    pub cache_ttl_hours: f64,
    pub metrics_path: PathBuf,
    pub page_delay_ms: u64,
    pub note_concurrency: usize,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".sprintlens").join("config.yaml"))
    }

    /// Load from `path`, or from the default location.
    ///
    /// A missing file at the default location yields an empty config; an
    /// explicitly named file must exist.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(Path::new(path)),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    log::debug!("No config file at {}", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Merge `overrides` over this file layer and the defaults.
    pub fn resolve(self, overrides: Overrides) -> Result<Settings> {
        let group_path = overrides.group_path.or(self.group_path);
        let settings = Settings {
            gitlab_url: overrides
                .gitlab_url
                .or(self.gitlab_url)
                .unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string()),
            token: overrides.token.or(self.token).filter(|t| !t.trim().is_empty()),
            project_path: overrides
                .project_path
                .or(self.project_path)
                .or_else(|| group_path.clone()),
            group_path,
            default_branch: self
                .default_branch
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            cache_dir: overrides
                .cache_dir
                .or(self.cache_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            cache_ttl_hours: overrides
                .cache_ttl_hours
                .or(self.cache_ttl_hours)
                .unwrap_or(DEFAULT_TTL_HOURS),
            metrics_path: overrides
                .metrics_path
                .or(self.metrics_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_METRICS_PATH)),
            page_delay_ms: self
                .page_delay_ms
                .unwrap_or(DEFAULT_PAGE_DELAY.as_millis() as u64),
            note_concurrency: self.note_concurrency.unwrap_or(DEFAULT_NOTE_CONCURRENCY),
        };

        settings.validate()?;
        Ok(settings)
    }
}

impl Settings {
    /// Reject values no command could use.
    pub fn validate(&self) -> Result<()> {
        if !self.cache_ttl_hours.is_finite() || self.cache_ttl_hours < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cache TTL must be >= 0 hours, got {}",
                self.cache_ttl_hours
            ))
            .into());
        }
        if self.note_concurrency == 0 {
            return Err(ConfigError::Invalid("note_concurrency must be at least 1".into()).into());
        }
        if !self.gitlab_url.starts_with("http://") && !self.gitlab_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "GitLab URL must start with http:// or https://, got '{}'",
                self.gitlab_url
            ))
            .into());
        }
        Ok(())
    }

    /// Token, required by every command that talks to GitLab.
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingToken.into())
    }

    pub fn require_group_path(&self) -> Result<&str> {
        self.group_path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingGroupPath.into())
    }

    /// Project path, falling back to the group path.
    pub fn require_project_path(&self) -> Result<&str> {
        self.project_path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingGroupPath.into())
    }
}
