//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};
use crate::config::Overrides;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. clap resolves
/// the flag and environment layers; the rest happens in `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.sprintlens/config.yaml)
    pub config: Option<String>,

    /// Refetch instead of reading cached iterations
    pub no_cache: bool,

    pub overrides: Overrides,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            no_cache: cli.no_cache,
            overrides: Overrides {
                gitlab_url: cli.gitlab_url.clone(),
                token: cli.token.clone(),
                group_path: cli.group.clone(),
                project_path: cli.project.clone(),
                cache_dir: cli.cache_dir.clone(),
                cache_ttl_hours: cli.ttl_hours,
                metrics_path: cli.metrics_path.clone(),
            },
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }
}
