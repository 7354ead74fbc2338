//! Test fixtures and builders for GitLab model types
//!
//! Provides builder patterns for creating test data with sensible defaults.
//! Import via `use crate::client::fixtures::*` in test modules.

#![allow(dead_code)] // Builder methods are available for future tests

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::models::{
    Incident, Issue, Iteration, IterationMetadata, IterationPayload, MergeRequest, Pipeline,
};

/// `2025-01-06T00:00:00Z` plus `hours`; the first day of the default iteration.
pub fn at_hour(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap() + Duration::hours(hours)
}

/// Global ID in GitLab's `gid://gitlab/<Kind>/<n>` form.
pub fn gid(kind: &str, n: u32) -> String {
    format!("gid://gitlab/{}/{}", kind, n)
}

// ============================================================================
// IterationBuilder
// ============================================================================

/// Builder for creating test Iteration instances.
///
/// # Example
/// ```ignore
/// let iteration = IterationBuilder::new(42).title("Sprint 42").build();
/// ```
#[derive(Debug, Clone)]
pub struct IterationBuilder {
    id: String,
    title: Option<String>,
    start_date: NaiveDate,
    due_date: NaiveDate,
    state: String,
}

impl IterationBuilder {
    /// Create a two-week iteration starting 2025-01-06.
    pub fn new(n: u32) -> Self {
        Self {
            id: gid("Iteration", n),
            title: Some(format!("Sprint {}", n)),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 19).unwrap(),
            state: "closed".to_string(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn untitled(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn dates(mut self, start: NaiveDate, due: NaiveDate) -> Self {
        self.start_date = start;
        self.due_date = due;
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn build(self) -> Iteration {
        Iteration {
            iid: self.id.rsplit('/').next().map(str::to_string),
            id: self.id,
            title: self.title,
            start_date: self.start_date,
            due_date: self.due_date,
            state: self.state,
            web_url: None,
        }
    }
}

// ============================================================================
// IssueBuilder
// ============================================================================

/// Builder for creating test Issue instances.
#[derive(Debug, Clone)]
pub struct IssueBuilder {
    issue: Issue,
}

impl IssueBuilder {
    /// An open issue created at the start of the default iteration.
    pub fn new(n: u32) -> Self {
        Self {
            issue: Issue {
                id: gid("Issue", n),
                iid: n.to_string(),
                title: format!("Issue {}", n),
                state: "opened".to_string(),
                created_at: at_hour(0),
                closed_at: None,
                weight: None,
                labels: Vec::new(),
                in_progress_at: None,
                web_url: None,
            },
        }
    }

    /// Mark closed at `at`.
    pub fn closed_at(mut self, at: DateTime<Utc>) -> Self {
        self.issue.state = "closed".to_string();
        self.issue.closed_at = Some(at);
        self
    }

    pub fn weight(mut self, weight: u32) -> Self {
        self.issue.weight = Some(weight);
        self
    }

    pub fn in_progress_at(mut self, at: DateTime<Utc>) -> Self {
        self.issue.in_progress_at = Some(at);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.issue.labels.push(label.into());
        self
    }

    pub fn build(self) -> Issue {
        self.issue
    }
}

// ============================================================================
// Delivery builders
// ============================================================================

/// A merge request opened at `created` and merged at `merged`.
pub fn merge_request(n: u32, created: DateTime<Utc>, merged: Option<DateTime<Utc>>) -> MergeRequest {
    MergeRequest {
        id: gid("MergeRequest", n),
        iid: n.to_string(),
        title: format!("MR {}", n),
        created_at: created,
        merged_at: merged,
        source_branch: format!("feature-{}", n),
        target_branch: "main".to_string(),
        web_url: None,
    }
}

/// A pipeline on `main` with the given GraphQL status (e.g. `SUCCESS`).
pub fn pipeline(n: u32, status: &str, created: DateTime<Utc>) -> Pipeline {
    Pipeline {
        id: gid("Ci::Pipeline", n),
        status: status.to_string(),
        ref_name: Some("main".to_string()),
        created_at: created,
        finished_at: Some(created + Duration::minutes(10)),
        duration: Some(600),
    }
}

/// An incident opened at `created`, closed at `closed` if given.
pub fn incident(n: u32, created: DateTime<Utc>, closed: Option<DateTime<Utc>>) -> Incident {
    Incident {
        id: gid("Issue", 1000 + n),
        iid: (1000 + n).to_string(),
        title: format!("Incident {}", n),
        state: if closed.is_some() { "closed" } else { "opened" }.to_string(),
        created_at: created,
        closed_at: closed,
        labels: vec!["incident".to_string()],
    }
}

// ============================================================================
// PayloadBuilder
// ============================================================================

/// Builder for creating test IterationPayload instances.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    payload: IterationPayload,
}

impl PayloadBuilder {
    /// An empty payload for the default iteration `n`.
    pub fn new(n: u32) -> Self {
        let iteration = IterationBuilder::new(n).build();
        Self {
            payload: IterationPayload {
                iteration_id: iteration.id.clone(),
                metadata: IterationMetadata::from(&iteration),
                issues: Vec::new(),
                merge_requests: Vec::new(),
                pipelines: Vec::new(),
                incidents: Vec::new(),
                fetched_at: at_hour(24 * 14),
            },
        }
    }

    pub fn issues(mut self, issues: Vec<Issue>) -> Self {
        self.payload.issues = issues;
        self
    }

    pub fn merge_requests(mut self, merge_requests: Vec<MergeRequest>) -> Self {
        self.payload.merge_requests = merge_requests;
        self
    }

    pub fn pipelines(mut self, pipelines: Vec<Pipeline>) -> Self {
        self.payload.pipelines = pipelines;
        self
    }

    pub fn incidents(mut self, incidents: Vec<Incident>) -> Self {
        self.payload.incidents = incidents;
        self
    }

    pub fn build(self) -> IterationPayload {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_builder_defaults() {
        let iteration = IterationBuilder::new(3).build();
        assert_eq!(iteration.id, "gid://gitlab/Iteration/3");
        assert_eq!(iteration.iid.as_deref(), Some("3"));
        assert_eq!(iteration.display_title(), "Sprint 3");
    }

    #[test]
    fn test_issue_builder_closed() {
        let issue = IssueBuilder::new(1).weight(5).closed_at(at_hour(30)).build();
        assert!(issue.is_closed());
        assert_eq!(issue.weight, Some(5));
    }

    #[test]
    fn test_payload_builder_metadata() {
        let payload = PayloadBuilder::new(7)
            .pipelines(vec![pipeline(1, "SUCCESS", at_hour(2))])
            .build();
        assert_eq!(payload.metadata.id, payload.iteration_id);
        assert_eq!(payload.pipelines.len(), 1);
    }
}
