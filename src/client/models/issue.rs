//! Issue and incident models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_labels;

/// Issue assigned to an iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Global ID, e.g. `gid://gitlab/Issue/9`
    pub id: String,

    pub iid: String,

    pub title: String,

    /// opened, closed
    pub state: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,

    /// Story points
    #[serde(default)]
    pub weight: Option<u32>,

    #[serde(default, deserialize_with = "deserialize_labels")]
    pub labels: Vec<String>,

    /// First transition into an in-progress status, taken from system notes
    #[serde(default)]
    pub in_progress_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

impl Issue {
    pub fn is_closed(&self) -> bool {
        self.state.eq_ignore_ascii_case("closed")
    }
}

/// Incident (issue of type INCIDENT) opened during an iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,

    pub iid: String,

    pub title: String,

    pub state: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_labels")]
    pub labels: Vec<String>,
}
