//! Iteration commands

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::models::display::{FetchDisplay, IterationDisplay};
use crate::output;

const ITERATION_GID_PREFIX: &str = "gid://gitlab/Iteration/";

/// Accept either a global ID or the bare numeric part.
pub fn normalize_iteration_id(id: &str) -> String {
    let id = id.trim();
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        format!("{}{}", ITERATION_GID_PREFIX, id)
    } else {
        id.to_string()
    }
}

/// Spinner on stderr for pretty output; hidden otherwise.
pub fn spinner(format: OutputFormat, message: impl Into<String>) -> ProgressBar {
    if format != OutputFormat::Pretty {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// List the configured group's iterations.
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let provider = ctx.provider()?;

    let bar = spinner(ctx.format, "Listing iterations...");
    let iterations = provider.list_iterations().await;
    bar.finish_and_clear();

    let rows: Vec<IterationDisplay> = iterations?.iter().map(IterationDisplay::from).collect();
    output::print(&rows, ctx.format)
}

/// Fetch iterations through the cache and summarize what was loaded.
pub async fn fetch(opts: &GlobalOptions, ids: &[String], refresh: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let provider = ctx.provider()?;
    let ids: Vec<String> = ids.iter().map(|id| normalize_iteration_id(id)).collect();

    if refresh || ctx.no_cache {
        for id in &ids {
            provider.repository().clear(id).await?;
        }
    }

    let bar = spinner(ctx.format, format!("Fetching {} iteration(s)...", ids.len()));
    let results = provider.fetch_many(&ids).await;
    bar.finish_and_clear();

    let rows: Vec<FetchDisplay> = results?.iter().map(FetchDisplay::from).collect();
    output::print(&rows, ctx.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_numeric_id() {
        assert_eq!(normalize_iteration_id("123"), "gid://gitlab/Iteration/123");
        assert_eq!(normalize_iteration_id(" 7 "), "gid://gitlab/Iteration/7");
    }

    #[test]
    fn test_normalize_keeps_global_id() {
        assert_eq!(
            normalize_iteration_id("gid://gitlab/Iteration/123"),
            "gid://gitlab/Iteration/123"
        );
        assert_eq!(normalize_iteration_id(""), "");
    }

    #[test]
    fn test_spinner_hidden_for_machine_formats() {
        assert!(spinner(OutputFormat::Json, "x").is_hidden());
    }
}
