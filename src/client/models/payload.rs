//! Cached iteration payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Incident, Issue, IterationMetadata, MergeRequest, Pipeline};

/// Everything the metrics need for one iteration.
///
/// Written once per fetch and never mutated afterwards; a refresh replaces
/// the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationPayload {
    pub iteration_id: String,
    pub metadata: IterationMetadata,
    pub issues: Vec<Issue>,
    pub merge_requests: Vec<MergeRequest>,
    pub pipelines: Vec<Pipeline>,
    pub incidents: Vec<Incident>,
    pub fetched_at: DateTime<Utc>,
}
