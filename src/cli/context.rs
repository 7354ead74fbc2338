//! Command execution context
//!
//! Resolves configuration once and builds the cache, client and metrics
//! store on demand, so commands that never talk to GitLab do not need a
//! token.

use std::sync::Arc;

use crate::cache::{CachedIterationProvider, IterationCacheRepository, ProviderConfig};
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::{GitLabClient, GraphQlClient, RateLimitManager};
use crate::config::{Config, Settings};
use crate::error::Result;
use crate::metrics::MetricsStore;

/// Provider type used by the CLI
pub type Provider = CachedIterationProvider<GitLabClient<GraphQlClient>>;

/// Context for command execution containing resolved settings and runtime options.
pub struct CommandContext {
    pub settings: Settings,
    pub format: OutputFormat,
    pub no_cache: bool,
}

impl CommandContext {
    /// Load the config file and layer CLI/env overrides on top.
    ///
    /// # Errors
    /// Returns error if an explicit config file is missing or unparsable, or
    /// if the merged values are invalid.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let settings = Config::load_at(opts.config_ref())?.resolve(opts.overrides.clone())?;
        log::debug!("Resolved settings: cache_dir={}", settings.cache_dir.display());

        Ok(Self {
            settings,
            format: opts.format,
            no_cache: opts.no_cache,
        })
    }

    pub fn repository(&self) -> Result<IterationCacheRepository> {
        Ok(IterationCacheRepository::new(
            &self.settings.cache_dir,
            self.settings.cache_ttl_hours,
        )?)
    }

    pub fn metrics_store(&self) -> MetricsStore {
        MetricsStore::new(&self.settings.metrics_path)
    }

    /// Cached provider over the live GitLab API.
    ///
    /// Requires a token and a group path.
    pub fn provider(&self) -> Result<Provider> {
        let settings = &self.settings;
        let token = settings.require_token()?;
        let group_path = settings.require_group_path()?;
        let project_path = settings.require_project_path()?;

        let executor = GraphQlClient::new(&settings.gitlab_url, token)?;
        let limiter = Arc::new(RateLimitManager::from_millis(settings.page_delay_ms));
        let client = GitLabClient::new(executor, limiter);

        let config = ProviderConfig {
            default_branch: settings.default_branch.clone(),
            note_concurrency: settings.note_concurrency,
            ..ProviderConfig::new(group_path, project_path)
        };
        Ok(CachedIterationProvider::new(client, self.repository()?, config))
    }
}
