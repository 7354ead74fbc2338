//! Cache management commands

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output::formatters::{format_local, format_size};

/// Show cache status/statistics
pub async fn status(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let repository = ctx.repository()?;
    let stats = repository.stats().await?;
    let store = ctx.metrics_store();
    let stored_metrics = store.load_all().await.map(|m| m.len());

    match ctx.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "path": repository.dir().display().to_string(),
                "ttlHours": repository.ttl_hours(),
                "totalEntries": stats.total_entries,
                "validEntries": stats.valid_entries,
                "expiredEntries": stats.expired_entries,
                "corruptedEntries": stats.corrupted_entries,
                "totalSizeBytes": stats.total_size_bytes,
                "totalSizeHuman": format_size(stats.total_size_bytes),
                "oldestEntry": stats.oldest_entry,
                "newestEntry": stats.newest_entry,
                "metricsPath": store.path().display().to_string(),
                "storedMetrics": stored_metrics.as_ref().ok(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            let ttl = if repository.ttl_hours() == 0.0 {
                "never expires".to_string()
            } else {
                format!("{} hours", repository.ttl_hours())
            };

            println!("{}", "Cache Status".bold());
            println!("────────────────────────────────────────");
            println!("Location:       {}", repository.dir().display().to_string().cyan());
            println!("TTL:            {}", ttl);
            println!("Valid entries:  {}", stats.valid_entries);
            println!("Expired:        {}", stats.expired_entries);
            if stats.corrupted_entries > 0 {
                println!(
                    "Corrupted:      {}",
                    stats.corrupted_entries.to_string().red()
                );
            }
            println!("Total size:     {}", format_size(stats.total_size_bytes));
            if let Some(oldest) = stats.oldest_entry {
                println!("Oldest entry:   {}", format_local(oldest));
            }
            if let Some(newest) = stats.newest_entry {
                println!("Newest entry:   {}", format_local(newest));
            }
            match stored_metrics {
                Ok(count) => println!(
                    "Stored metrics: {} ({})",
                    count,
                    store.path().display()
                ),
                Err(e) => println!("Stored metrics: {}", e.to_string().red()),
            }
        }
    }

    Ok(())
}

/// Delete every cached iteration and the stored metrics
pub async fn clear(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let stats = ctx.repository()?.clear_all().await?;
    let metrics_removed = ctx.metrics_store().clear().await?;

    match ctx.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entriesRemoved": stats.entries_removed,
                "metricsCleared": metrics_removed,
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            if stats.entries_removed > 0 || metrics_removed {
                println!(
                    "{} Cleared {} cached iteration(s){}",
                    "✓".green(),
                    stats.entries_removed,
                    if metrics_removed { " and stored metrics" } else { "" }
                );
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Show cache path
pub fn path(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    println!("{}", ctx.repository()?.dir().display());
    Ok(())
}
