//! sprintlens - Sprint delivery metrics for GitLab iterations

use clap::Parser;

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod metrics;
mod models;
mod output;

use cli::args::GlobalOptions;
use cli::{CacheCommands, Cli, Commands, IterationCommands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--debug`.
fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Iteration(cmd) => match cmd {
            IterationCommands::List => cli::iteration::list(&opts).await,
            IterationCommands::Fetch { ids, refresh } => {
                cli::iteration::fetch(&opts, &ids, refresh).await
            }
        },
        Commands::Metrics { name, iterations } => {
            cli::metrics::run(&opts, name, &iterations).await
        }
        Commands::Cache(cmd) => match cmd {
            CacheCommands::Status => cli::cache::status(&opts).await,
            CacheCommands::Clear => cli::cache::clear(&opts).await,
            CacheCommands::Path => cli::cache::path(&opts),
        },
    }
}
