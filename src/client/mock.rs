//! Mock GitLab clients for testing
//!
//! [`MockGitLabClient`] implements the domain API traits over canned data.
//! [`ScriptedExecutor`] sits one layer lower and replays raw GraphQL
//! responses so [`GitLabClient`](super::GitLabClient) can be exercised
//! without a server.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use super::DateWindow;
use super::api::{DeliveryApi, IssueApi, IterationApi};
use super::graphql::GraphQlExecutor;
use super::models::{Incident, Issue, Iteration, MergeRequest, Note, Pipeline};
use super::pagination::Connection;
use super::status::first_in_progress;
use crate::error::{ApiError, Error, Result, TransportError};

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockGitLabClient::new()
///     .with_iterations(vec![IterationBuilder::new(1).build()])
///     .await;
///
/// let iterations = mock.list_iterations("acme").await?;
/// assert_eq!(iterations.len(), 1);
/// ```
#[derive(Default)]
pub struct MockGitLabClient {
    iterations: Arc<Mutex<Vec<Iteration>>>,
    issues: Arc<Mutex<Vec<Issue>>>,
    /// Issue ID -> notes in chronological order
    notes: Arc<Mutex<HashMap<String, Vec<Note>>>>,
    merge_requests: Arc<Mutex<Vec<MergeRequest>>>,
    pipelines: Arc<Mutex<Vec<Pipeline>>>,
    incidents: Arc<Mutex<Vec<Incident>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<Error>>>,
    /// Operations that fail on every call
    failing: Arc<Mutex<FailingOperations>>,
    /// Delay added to every call, to widen race windows
    latency: Arc<Mutex<Option<Duration>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub list_iterations: usize,
    pub get_iteration: usize,
    pub list_iteration_issues: usize,
    pub list_issue_notes: usize,
    pub find_in_progress_at: usize,
    pub list_incidents: usize,
    pub list_merged_merge_requests: usize,
    pub list_pipelines: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.list_iterations
            + self.get_iteration
            + self.list_iteration_issues
            + self.list_issue_notes
            + self.find_in_progress_at
            + self.list_incidents
            + self.list_merged_merge_requests
            + self.list_pipelines
    }
}

#[derive(Default, Debug, Clone, Copy)]
struct FailingOperations {
    pipelines: bool,
    incidents: bool,
    notes: bool,
}

fn persistent_failure(context: &str) -> Error {
    TransportError::http_status(context, 500, "Internal Server Error").into()
}

impl MockGitLabClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure iterations to return from list_iterations.
    pub async fn with_iterations(self, iterations: Vec<Iteration>) -> Self {
        *self.iterations.lock().await = iterations;
        self
    }

    /// Configure issues to return from list_iteration_issues.
    pub async fn with_issues(self, issues: Vec<Issue>) -> Self {
        *self.issues.lock().await = issues;
        self
    }

    /// Configure the note history of one issue.
    pub async fn with_notes(self, issue_id: impl Into<String>, notes: Vec<Note>) -> Self {
        self.notes.lock().await.insert(issue_id.into(), notes);
        self
    }

    pub async fn with_merge_requests(self, merge_requests: Vec<MergeRequest>) -> Self {
        *self.merge_requests.lock().await = merge_requests;
        self
    }

    pub async fn with_pipelines(self, pipelines: Vec<Pipeline>) -> Self {
        *self.pipelines.lock().await = pipelines;
        self
    }

    pub async fn with_incidents(self, incidents: Vec<Incident>) -> Self {
        *self.incidents.lock().await = incidents;
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: impl Into<Error>) -> Self {
        *self.error.lock().await = Some(error.into());
        self
    }

    /// Make every list_pipelines call fail.
    pub async fn failing_pipelines(self) -> Self {
        self.failing.lock().await.pipelines = true;
        self
    }

    /// Make every list_incidents call fail.
    pub async fn failing_incidents(self) -> Self {
        self.failing.lock().await.incidents = true;
        self
    }

    /// Make every note lookup fail.
    pub async fn failing_notes(self) -> Self {
        self.failing.lock().await.notes = true;
        self
    }

    /// Sleep this long inside every call.
    pub async fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().await = Some(latency);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Apply latency, then consume any pending one-shot error.
    async fn check_error(&self) -> Result<()> {
        let latency = *self.latency.lock().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut error = self.error.lock().await;
        if let Some(e) = error.take() {
            return Err(e);
        }
        Ok(())
    }

    async fn failing(&self) -> FailingOperations {
        *self.failing.lock().await
    }
}

// ============================================================================
// IterationApi Implementation
// ============================================================================

#[async_trait]
impl IterationApi for MockGitLabClient {
    async fn list_iterations(&self, _group_path: &str) -> Result<Vec<Iteration>> {
        self.call_count.lock().await.list_iterations += 1;
        self.check_error().await?;
        Ok(self.iterations.lock().await.clone())
    }

    async fn get_iteration(&self, _group_path: &str, iteration_id: &str) -> Result<Iteration> {
        self.call_count.lock().await.get_iteration += 1;
        self.check_error().await?;

        self.iterations
            .lock()
            .await
            .iter()
            .find(|i| i.id == iteration_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Iteration {}", iteration_id)).into())
    }
}

// ============================================================================
// IssueApi Implementation
// ============================================================================

#[async_trait]
impl IssueApi for MockGitLabClient {
    async fn list_iteration_issues(
        &self,
        _group_path: &str,
        _iteration_id: &str,
    ) -> Result<Vec<Issue>> {
        self.call_count.lock().await.list_iteration_issues += 1;
        self.check_error().await?;
        Ok(self.issues.lock().await.clone())
    }

    async fn list_issue_notes(
        &self,
        issue_id: &str,
        _cursor: Option<&str>,
    ) -> Result<Connection<Note>> {
        self.call_count.lock().await.list_issue_notes += 1;
        self.check_error().await?;
        if self.failing().await.notes {
            return Err(persistent_failure("list issue notes"));
        }

        let notes = self.notes.lock().await.get(issue_id).cloned().unwrap_or_default();
        Ok(Connection::last(notes))
    }

    async fn find_in_progress_at(&self, issue_id: &str) -> Result<Option<DateTime<Utc>>> {
        self.call_count.lock().await.find_in_progress_at += 1;
        self.check_error().await?;
        if self.failing().await.notes {
            return Err(persistent_failure("find in-progress"));
        }

        let notes = self.notes.lock().await;
        Ok(notes.get(issue_id).and_then(|n| first_in_progress(n)))
    }

    async fn list_incidents(
        &self,
        _project_path: &str,
        window: &DateWindow,
    ) -> Result<Vec<Incident>> {
        self.call_count.lock().await.list_incidents += 1;
        self.check_error().await?;
        if self.failing().await.incidents {
            return Err(persistent_failure("list incidents"));
        }

        let incidents = self.incidents.lock().await;
        Ok(incidents
            .iter()
            .filter(|i| window.contains(i.created_at))
            .cloned()
            .collect())
    }
}

// ============================================================================
// DeliveryApi Implementation
// ============================================================================

#[async_trait]
impl DeliveryApi for MockGitLabClient {
    async fn list_merged_merge_requests(
        &self,
        _project_path: &str,
        _window: &DateWindow,
    ) -> Result<Vec<MergeRequest>> {
        self.call_count.lock().await.list_merged_merge_requests += 1;
        self.check_error().await?;
        Ok(self.merge_requests.lock().await.clone())
    }

    async fn list_pipelines(
        &self,
        _project_path: &str,
        ref_name: &str,
        _window: &DateWindow,
    ) -> Result<Vec<Pipeline>> {
        self.call_count.lock().await.list_pipelines += 1;
        self.check_error().await?;
        if self.failing().await.pipelines {
            return Err(persistent_failure("list pipelines"));
        }

        let pipelines = self.pipelines.lock().await;
        Ok(pipelines
            .iter()
            .filter(|p| p.ref_name.as_deref().is_none_or(|r| r == ref_name))
            .cloned()
            .collect())
    }
}

// ============================================================================
// ScriptedExecutor
// ============================================================================

/// One request observed by [`ScriptedExecutor`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub query: String,
    pub variables: Value,
    pub context: String,
}

/// GraphQL executor replaying queued responses in order.
///
/// Running out of responses is reported as an invalid response rather than
/// a panic, so an unexpected extra request fails the test with context.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<CapturedRequest>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `data` object.
    pub fn respond(mut self, data: Value) -> Self {
        self.responses.get_mut().push_back(Ok(data));
        self
    }

    /// Queue a failure.
    pub fn fail(mut self, error: impl Into<Error>) -> Self {
        self.responses.get_mut().push_back(Err(error.into()));
        self
    }

    /// Requests seen so far, oldest first.
    pub async fn calls(&self) -> Vec<CapturedRequest> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl GraphQlExecutor for ScriptedExecutor {
    async fn execute(&self, query: &str, variables: Value, context: &str) -> Result<Value> {
        self.calls.lock().await.push(CapturedRequest {
            query: query.to_string(),
            variables,
            context: context.to_string(),
        });

        self.responses.lock().await.pop_front().unwrap_or_else(|| {
            Err(ApiError::InvalidResponse(format!("{}: no scripted response left", context)).into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_client_default_empty() {
        let mock = MockGitLabClient::new();

        assert!(mock.list_iterations("acme").await.unwrap().is_empty());
        assert!(mock.list_iteration_issues("acme", "x").await.unwrap().is_empty());
        assert_eq!(mock.call_counts().await.total(), 2);
    }

    #[tokio::test]
    async fn test_mock_client_one_shot_error() {
        let mock = MockGitLabClient::new()
            .with_iterations(vec![IterationBuilder::new(1).build()])
            .await
            .with_error(ApiError::NotFound("boom".into()))
            .await;

        assert!(mock.list_iterations("acme").await.is_err());
        assert_eq!(mock.list_iterations("acme").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_client_get_iteration() {
        let mock = MockGitLabClient::new()
            .with_iterations(vec![IterationBuilder::new(1).build(), IterationBuilder::new(2).build()])
            .await;

        let found = mock.get_iteration("acme", &gid("Iteration", 2)).await.unwrap();
        assert_eq!(found.display_title(), "Sprint 2");
        assert!(mock.get_iteration("acme", &gid("Iteration", 9)).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_client_failing_pipelines() {
        let mock = MockGitLabClient::new().failing_pipelines().await;
        let window = DateWindow::for_dates(
            chrono::NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2025, 1, 19).unwrap(),
        );

        assert!(mock.list_pipelines("acme", "main", &window).await.is_err());
        assert!(mock.list_pipelines("acme", "main", &window).await.is_err());
        assert_eq!(mock.call_counts().await.list_pipelines, 2);
    }

    #[tokio::test]
    async fn test_scripted_executor_replays_in_order() {
        let executor = ScriptedExecutor::new()
            .respond(json!({ "a": 1 }))
            .respond(json!({ "b": 2 }));

        let first = executor.execute("q", json!({}), "first").await.unwrap();
        let second = executor.execute("q", json!({}), "second").await.unwrap();
        assert_eq!(first["a"], 1);
        assert_eq!(second["b"], 2);

        let err = executor.execute("q", json!({}), "third").await.unwrap_err();
        assert!(err.to_string().contains("no scripted response"));
        assert_eq!(executor.calls().await.len(), 3);
    }
}
