//! Iteration display models

use serde::Serialize;
use tabled::Tabled;

use crate::cache::{CacheResult, CacheSource};
use crate::client::models::Iteration;

/// Row for `iteration list`
#[derive(Debug, Clone, Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "START")]
    pub start_date: String,

    #[tabled(rename = "DUE")]
    pub due_date: String,

    #[tabled(rename = "STATE")]
    pub state: String,
}

impl From<&Iteration> for IterationDisplay {
    fn from(iteration: &Iteration) -> Self {
        Self {
            id: iteration.id.clone(),
            title: iteration.display_title(),
            start_date: iteration.start_date.to_string(),
            due_date: iteration.due_date.to_string(),
            state: iteration.state.clone(),
        }
    }
}

/// Row for `iteration fetch`, summarizing what was loaded
#[derive(Debug, Clone, Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "SOURCE")]
    pub source: &'static str,

    #[tabled(rename = "ISSUES")]
    pub issues: usize,

    #[tabled(rename = "MRS")]
    pub merge_requests: usize,

    #[tabled(rename = "PIPELINES")]
    pub pipelines: usize,

    #[tabled(rename = "INCIDENTS")]
    pub incidents: usize,
}

impl From<&CacheResult> for FetchDisplay {
    fn from(result: &CacheResult) -> Self {
        let payload = &result.payload;
        Self {
            id: payload.iteration_id.clone(),
            title: payload.metadata.title.clone(),
            source: match result.source {
                CacheSource::Cache => "cache",
                CacheSource::Network => "network",
            },
            issues: payload.issues.len(),
            merge_requests: payload.merge_requests.len(),
            pipelines: payload.pipelines.len(),
            incidents: payload.incidents.len(),
        }
    }
}
