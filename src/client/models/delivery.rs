//! Merge request and pipeline models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Merged merge request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub id: String,

    pub iid: String,

    pub title: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub source_branch: String,

    #[serde(default)]
    pub target_branch: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

/// CI pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: String,

    /// SUCCESS, FAILED, RUNNING, CANCELED, ...
    pub status: String,

    #[serde(rename = "ref", default)]
    pub ref_name: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,

    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<u64>,
}

impl Pipeline {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}
