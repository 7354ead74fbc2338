//! GitLab domain client over the GraphQL boundary
//!
//! Every collection is assembled by walking its connection to exhaustion
//! with [`paginate`], pausing on the configured [`RateLimiter`] between pages.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::api::{DeliveryApi, IssueApi, IterationApi};
use super::graphql::GraphQlExecutor;
use super::models::{Incident, Issue, Iteration, MergeRequest, Note, Pipeline};
use super::pagination::{Connection, MAX_PAGE_SIZE, paginate};
use super::queries;
use super::rate_limit::RateLimiter;
use super::status::first_in_progress;
use super::DateWindow;
use crate::error::{ApiError, Error, Result};

/// Pull `data[scope][field]` out of a response as a connection page.
///
/// Returns `Ok(None)` when `data[scope]` is null, which is how GitLab reports
/// an unknown group, project or issue.
fn page_at<T: DeserializeOwned>(
    mut data: Value,
    scope: &str,
    field: &str,
    context: &str,
) -> Result<Option<Connection<T>>> {
    let mut scope_value = data.get_mut(scope).map(Value::take).unwrap_or(Value::Null);
    if scope_value.is_null() {
        return Ok(None);
    }

    let connection = scope_value.get_mut(field).map(Value::take).ok_or_else(|| {
        ApiError::InvalidResponse(format!("{}: missing '{}.{}'", context, scope, field))
    })?;

    serde_json::from_value(connection)
        .map(Some)
        .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", context, e)).into())
}

/// The path with its last segment removed, or `None` at the top level.
pub fn parent_path(path: &str) -> Option<String> {
    let trimmed = path.trim_matches('/');
    trimmed
        .rsplit_once('/')
        .map(|(parent, _)| parent.to_string())
        .filter(|parent| !parent.is_empty())
}

/// GitLab client implementing the domain API traits.
pub struct GitLabClient<E: GraphQlExecutor> {
    executor: E,
    limiter: Arc<dyn RateLimiter>,
    /// Configured group path -> path that actually owns the iterations
    resolved_groups: RwLock<HashMap<String, String>>,
}

impl<E: GraphQlExecutor> GitLabClient<E> {
    pub fn new(executor: E, limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            executor,
            limiter,
            resolved_groups: RwLock::new(HashMap::new()),
        }
    }

    /// Get the underlying executor
    #[cfg(test)]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Group path to query for `configured`, after any fallback resolved by
    /// a previous iteration listing.
    fn group_for(&self, configured: &str) -> String {
        self.resolved_groups
            .read()
            .ok()
            .and_then(|map| map.get(configured).cloned())
            .unwrap_or_else(|| configured.to_string())
    }

    fn remember_group(&self, configured: &str, resolved: &str) {
        if let Ok(mut map) = self.resolved_groups.write() {
            map.insert(configured.to_string(), resolved.to_string());
        }
    }

    /// Walk a whole connection.
    ///
    /// `variables` must be a JSON object; `first` and `after` are filled in
    /// per page. A null `scope` becomes the error built by `missing`.
    async fn fetch_all<T, M>(
        &self,
        query: &'static str,
        variables: Value,
        scope: &str,
        field: &str,
        context: &str,
        missing: M,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        M: Fn() -> Error,
    {
        paginate(self.limiter.as_ref(), |cursor| {
            let mut vars = variables.clone();
            vars["first"] = json!(MAX_PAGE_SIZE);
            vars["after"] = json!(cursor);
            let missing = &missing;
            async move {
                let data = self.executor.execute(query, vars, context).await?;
                page_at(data, scope, field, context)?.ok_or_else(missing)
            }
        })
        .await
    }

    async fn iterations_at(&self, path: &str) -> Result<Vec<Iteration>> {
        self.fetch_all(
            queries::ITERATIONS,
            json!({ "fullPath": path }),
            "group",
            "iterations",
            "list iterations",
            || {
                ApiError::ScopeNotFound {
                    path: path.to_string(),
                }
                .into()
            },
        )
        .await
    }
}

/// Retry `fetch` on each shorter prefix of `path` while the scope is missing.
async fn with_path_fallback<T, F, Fut>(path: &str, mut fetch: F) -> Result<(String, T)>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut current = path.trim_matches('/').to_string();
    loop {
        match fetch(current.clone()).await {
            Ok(value) => return Ok((current, value)),
            Err(Error::Api(ApiError::ScopeNotFound { .. })) => match parent_path(&current) {
                Some(parent) => {
                    info!("Group '{}' not found, trying '{}'", current, parent);
                    current = parent;
                }
                None => return Err(ApiError::ScopeNotFound { path: current }.into()),
            },
            Err(e) => return Err(e),
        }
    }
}

#[async_trait]
impl<E: GraphQlExecutor> IterationApi for GitLabClient<E> {
    async fn list_iterations(&self, group_path: &str) -> Result<Vec<Iteration>> {
        let (resolved, iterations) =
            with_path_fallback(group_path, |path| async move { self.iterations_at(&path).await })
                .await?;

        if resolved != group_path.trim_matches('/') {
            self.remember_group(group_path, &resolved);
        }
        debug!("Found {} iterations under '{}'", iterations.len(), resolved);
        Ok(iterations)
    }

    async fn get_iteration(&self, group_path: &str, iteration_id: &str) -> Result<Iteration> {
        self.list_iterations(group_path)
            .await?
            .into_iter()
            .find(|iteration| iteration.id == iteration_id)
            .ok_or_else(|| ApiError::NotFound(format!("Iteration {}", iteration_id)).into())
    }
}

#[async_trait]
impl<E: GraphQlExecutor> IssueApi for GitLabClient<E> {
    async fn list_iteration_issues(
        &self,
        group_path: &str,
        iteration_id: &str,
    ) -> Result<Vec<Issue>> {
        let group = self.group_for(group_path);
        self.fetch_all(
            queries::ITERATION_ISSUES,
            json!({ "fullPath": group, "iterationId": [iteration_id] }),
            "group",
            "issues",
            "list iteration issues",
            || {
                ApiError::ScopeNotFound {
                    path: group.clone(),
                }
                .into()
            },
        )
        .await
    }

    async fn list_issue_notes(
        &self,
        issue_id: &str,
        cursor: Option<&str>,
    ) -> Result<Connection<Note>> {
        let context = "list issue notes";
        let data = self
            .executor
            .execute(
                queries::ISSUE_NOTES,
                json!({ "id": issue_id, "first": MAX_PAGE_SIZE, "after": cursor }),
                context,
            )
            .await?;

        page_at(data, "issue", "notes", context)?
            .ok_or_else(|| ApiError::NotFound(format!("Issue {}", issue_id)).into())
    }

    async fn find_in_progress_at(&self, issue_id: &str) -> Result<Option<DateTime<Utc>>> {
        let mut cursor: Option<String> = None;
        loop {
            let page = self.list_issue_notes(issue_id, cursor.as_deref()).await?;
            if let Some(started) = first_in_progress(&page.nodes) {
                return Ok(Some(started));
            }
            match page.next_cursor() {
                Some(next) => {
                    cursor = Some(next.to_string());
                    self.limiter.delay().await;
                }
                None => return Ok(None),
            }
        }
    }

    async fn list_incidents(
        &self,
        project_path: &str,
        window: &DateWindow,
    ) -> Result<Vec<Incident>> {
        self.fetch_all(
            queries::INCIDENTS,
            json!({
                "fullPath": project_path,
                "createdAfter": window.start.to_rfc3339(),
                "createdBefore": window.end.to_rfc3339(),
            }),
            "project",
            "issues",
            "list incidents",
            || {
                ApiError::ScopeNotFound {
                    path: project_path.to_string(),
                }
                .into()
            },
        )
        .await
    }
}

#[async_trait]
impl<E: GraphQlExecutor> DeliveryApi for GitLabClient<E> {
    async fn list_merged_merge_requests(
        &self,
        project_path: &str,
        window: &DateWindow,
    ) -> Result<Vec<MergeRequest>> {
        self.fetch_all(
            queries::MERGED_MERGE_REQUESTS,
            json!({
                "fullPath": project_path,
                "mergedAfter": window.start.to_rfc3339(),
                "mergedBefore": window.end.to_rfc3339(),
            }),
            "project",
            "mergeRequests",
            "list merged merge requests",
            || {
                ApiError::ScopeNotFound {
                    path: project_path.to_string(),
                }
                .into()
            },
        )
        .await
    }

    async fn list_pipelines(
        &self,
        project_path: &str,
        ref_name: &str,
        window: &DateWindow,
    ) -> Result<Vec<Pipeline>> {
        self.fetch_all(
            queries::PIPELINES,
            json!({
                "fullPath": project_path,
                "ref": ref_name,
                "updatedAfter": window.start.to_rfc3339(),
                "updatedBefore": window.end.to_rfc3339(),
            }),
            "project",
            "pipelines",
            "list pipelines",
            || {
                ApiError::ScopeNotFound {
                    path: project_path.to_string(),
                }
                .into()
            },
        )
        .await
    }
}
