//! Reusable formatting utilities for CLI output

use chrono::{DateTime, Local, Utc};

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// UTC timestamp in the local zone, minute precision.
pub fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Metric value with at most two decimals and its unit.
///
/// # Example output
/// - `13 points`
/// - `18.25 hours`
/// - `0.14 deployments/day`
pub fn format_value(value: f64, unit: &str) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0} {}", rounded, unit)
    } else {
        let text = format!("{:.2}", rounded);
        format!("{} {}", text.trim_end_matches('0'), unit)
    }
}
