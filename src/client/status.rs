//! Work item status transitions parsed from system notes
//!
//! GitLab records a status change as a system note with metadata action
//! `work_item_status` and a body like `set status to **In progress**`.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::models::Note;

/// Metadata actions that mark a status transition.
const STATUS_ACTIONS: [&str; 2] = ["work_item_status", "status"];

/// Statuses that count as "work started", compared case-insensitively.
const IN_PROGRESS_STATUSES: [&str; 4] = ["in progress", "in-progress", "wip", "working"];

static STATUS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)set status to \*\*(.+?)\*\*").expect("status pattern is valid")
});

/// Target status of a status-transition note, if it is one.
pub fn status_change(note: &Note) -> Option<String> {
    if !note.system {
        return None;
    }
    let action = note.action()?;
    if !STATUS_ACTIONS.contains(&action) {
        return None;
    }
    STATUS_PATTERN
        .captures(&note.body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub fn is_in_progress_status(status: &str) -> bool {
    let status = status.trim().to_lowercase();
    IN_PROGRESS_STATUSES.contains(&status.as_str())
}

/// Timestamp of the first note in `notes` that moves the issue into an
/// in-progress status. Notes must be in chronological order.
pub fn first_in_progress(notes: &[Note]) -> Option<DateTime<Utc>> {
    notes.iter().find_map(|note| {
        status_change(note)
            .filter(|status| is_in_progress_status(status))
            .map(|_| note.created_at)
    })
}
