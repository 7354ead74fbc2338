//! Metrics command

use crate::cli::args::GlobalOptions;
use crate::cli::iteration::{normalize_iteration_id, spinner};
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::metrics::{MetricKind, MetricsService};
use crate::models::display::MetricDisplay;
use crate::output::{self, json};

/// Compute `kind` for each iteration and print the results.
pub async fn run(opts: &GlobalOptions, kind: MetricKind, iterations: &[String]) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let provider = ctx.provider()?;
    let store = ctx.metrics_store();
    let ids: Vec<String> = iterations
        .iter()
        .map(|id| normalize_iteration_id(id))
        .filter(|id| !id.is_empty())
        .collect();

    let bar = spinner(ctx.format, format!("Computing {}...", kind));
    if ctx.no_cache {
        for id in &ids {
            if let Err(e) = provider.refresh_iteration(id).await {
                bar.finish_and_clear();
                return Err(e);
            }
        }
    }
    let metrics = MetricsService::new(&provider, &store)
        .calculate(kind, &ids)
        .await;
    bar.finish_and_clear();
    let metrics = metrics?;

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&metrics)?),
        format => {
            let rows: Vec<MetricDisplay> = metrics.iter().map(MetricDisplay::from).collect();
            output::print(&rows, format)?;
        }
    }
    Ok(())
}
