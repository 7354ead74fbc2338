//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod cache;
pub mod context;
pub mod iteration;
pub mod metrics;

pub use args::OutputFormat;
pub use context::CommandContext;

use crate::metrics::MetricKind;

/// sprintlens - Sprint delivery metrics for GitLab iterations
#[derive(Parser, Debug)]
#[command(name = "sprintlens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "SPRINTLENS_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "SPRINTLENS_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "SPRINTLENS_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Ignore cached iterations and fetch fresh data from GitLab
    #[arg(long, global = true, env = "SPRINTLENS_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// GitLab instance URL
    #[arg(long, global = true, env = "GITLAB_URL")]
    pub gitlab_url: Option<String>,

    /// GitLab personal access token
    #[arg(long, global = true, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Group path owning the iterations (e.g. acme/platform)
    #[arg(long, global = true, env = "GITLAB_GROUP_PATH")]
    pub group: Option<String>,

    /// Project path for merge requests, pipelines and incidents
    #[arg(long, global = true, env = "GITLAB_PROJECT_PATH")]
    pub project: Option<String>,

    /// Iteration cache directory
    #[arg(long, global = true, env = "SPRINTLENS_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Hours before a cached iteration is refetched (0 = never)
    #[arg(long, global = true, env = "SPRINTLENS_CACHE_TTL_HOURS")]
    pub ttl_hours: Option<f64>,

    /// File where computed metrics are stored
    #[arg(long, global = true, env = "SPRINTLENS_METRICS_PATH")]
    pub metrics_path: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List and fetch iterations
    #[command(subcommand)]
    Iteration(IterationCommands),

    /// Compute a delivery metric for one or more iterations
    Metrics {
        /// Metric to compute
        #[arg(value_enum)]
        name: MetricKind,

        /// Iteration IDs, comma-separated (numeric IDs are expanded to GitLab global IDs)
        #[arg(long, short, value_delimiter = ',', required = true)]
        iterations: Vec<String>,
    },

    /// Inspect or clear the local cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

/// Iteration subcommands
#[derive(Subcommand, Debug)]
pub enum IterationCommands {
    /// List iterations of the configured group (not cached)
    List,

    /// Fetch iterations through the cache
    Fetch {
        /// Iteration IDs
        #[arg(required = true)]
        ids: Vec<String>,

        /// Drop cached entries first
        #[arg(long)]
        refresh: bool,
    },
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Delete cached iterations and stored metrics
    Clear,

    /// Print the cache directory
    Path,
}
