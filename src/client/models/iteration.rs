//! Iteration models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Iteration (sprint) resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Iteration {
    /// Global ID, e.g. `gid://gitlab/Iteration/123`
    pub id: String,

    /// Group-scoped internal ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iid: Option<String>,

    /// Title (cadence-generated iterations have none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub start_date: NaiveDate,

    pub due_date: NaiveDate,

    /// upcoming, current, closed
    #[serde(default)]
    pub state: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

impl Iteration {
    /// Title for display, falling back to the date range.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => format!("{} - {}", self.start_date, self.due_date),
        }
    }
}

/// Iteration metadata stored alongside the cached payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationMetadata {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl From<&Iteration> for IterationMetadata {
    fn from(iteration: &Iteration) -> Self {
        Self {
            id: iteration.id.clone(),
            title: iteration.display_title(),
            start_date: iteration.start_date,
            due_date: iteration.due_date,
        }
    }
}
