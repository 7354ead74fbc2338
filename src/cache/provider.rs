//! Cache-first iteration provider
//!
//! Sits between consumers and the GitLab client. A hit never touches the
//! network; a miss assembles the full payload, writes it through the
//! repository and returns it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use tokio::sync::Mutex as AsyncMutex;

use super::repository::IterationCacheRepository;
use crate::client::models::{Issue, Iteration, IterationMetadata, IterationPayload};
use crate::client::parallel::map_bounded;
use crate::client::{DateWindow, GitLabApi};
use crate::error::Result;

/// Iterations fetched at once by `fetch_many`
const ITERATION_CONCURRENCY: usize = 4;

/// Default concurrent note lookups while enriching issues
pub const DEFAULT_NOTE_CONCURRENCY: usize = 8;

/// Where the provider finds things in GitLab.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Group owning the iteration cadence (falls back to parent groups)
    pub group_path: String,
    /// Project whose MRs, pipelines and incidents feed the metrics
    pub project_path: String,
    /// Ref whose pipelines count as deployments
    pub default_branch: String,
    pub note_concurrency: usize,
}

impl ProviderConfig {
    pub fn new(group_path: impl Into<String>, project_path: impl Into<String>) -> Self {
        Self {
            group_path: group_path.into(),
            project_path: project_path.into(),
            default_branch: "main".to_string(),
            note_concurrency: DEFAULT_NOTE_CONCURRENCY,
        }
    }
}

/// Where a payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    Cache,
    Network,
}

/// A payload tagged with its source.
#[derive(Debug, Clone)]
pub struct CacheResult {
    pub payload: IterationPayload,
    pub source: CacheSource,
}

impl CacheResult {
    fn from_cache(payload: IterationPayload) -> Self {
        Self {
            payload,
            source: CacheSource::Cache,
        }
    }

    fn from_network(payload: IterationPayload) -> Self {
        Self {
            payload,
            source: CacheSource::Network,
        }
    }
}

/// Keep the data if the fetch worked, otherwise log and carry on without it.
fn enrichment<T>(what: &str, iteration_id: &str, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("Failed to fetch {} for {}: {}", what, iteration_id, e);
        Vec::new()
    })
}

/// Iteration provider with write-through caching and per-key coalescing.
pub struct CachedIterationProvider<C: GitLabApi> {
    client: C,
    repository: IterationCacheRepository,
    config: ProviderConfig,
    /// Per-key locks for misses currently being fetched
    inflight: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl<C: GitLabApi> CachedIterationProvider<C> {
    pub fn new(client: C, repository: IterationCacheRepository, config: ProviderConfig) -> Self {
        Self {
            client,
            repository,
            config,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Get the inner client
    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn repository(&self) -> &IterationCacheRepository {
        &self.repository
    }

    /// Payload for one iteration, from cache when fresh.
    pub async fn fetch_iteration_with_cache(&self, iteration_id: &str) -> Result<IterationPayload> {
        Ok(self.fetch_with_source(iteration_id).await?.payload)
    }

    /// Payload for one iteration, tagged with where it came from.
    ///
    /// Concurrent misses for the same key share one network fetch: later
    /// callers wait on the key's lock and then find the entry written by the
    /// first. If that fetch fails, the next waiter fetches for itself.
    pub async fn fetch_with_source(&self, iteration_id: &str) -> Result<CacheResult> {
        if let Some(payload) = self.repository.get(iteration_id).await? {
            return Ok(CacheResult::from_cache(payload));
        }

        let lock = self.key_lock(iteration_id);
        let outcome = {
            let _guard = lock.lock().await;
            self.fetch_locked(iteration_id).await
        };
        self.release(iteration_id, lock);
        outcome
    }

    /// Payloads for several iterations, fetching only the missing or stale ones.
    ///
    /// Results are in input order; the first failure is returned.
    pub async fn fetch_many(&self, iteration_ids: &[String]) -> Result<Vec<CacheResult>> {
        let results = map_bounded(
            iteration_ids.to_vec(),
            |id| async move { self.fetch_with_source(&id).await },
            ITERATION_CONCURRENCY,
        )
        .await;

        let results = results.into_iter().collect::<Result<Vec<_>>>()?;
        let fetched = results
            .iter()
            .filter(|r| r.source == CacheSource::Network)
            .count();
        debug!(
            "Fetched {} iterations ({} from network, {} from cache)",
            results.len(),
            fetched,
            results.len() - fetched
        );
        Ok(results)
    }

    /// Drop the cached entry for an iteration and fetch it again.
    pub async fn refresh_iteration(&self, iteration_id: &str) -> Result<IterationPayload> {
        info!("Refreshing iteration {}", iteration_id);
        self.repository.clear(iteration_id).await?;
        self.fetch_iteration_with_cache(iteration_id).await
    }

    /// Iterations visible to the configured group. Not cached.
    pub async fn list_iterations(&self) -> Result<Vec<Iteration>> {
        self.client.list_iterations(&self.config.group_path).await
    }

    fn key_lock(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        inflight.entry(key.to_string()).or_default().clone()
    }

    /// Forget the key's lock once nobody else holds it.
    fn release(&self, key: &str, lock: Arc<AsyncMutex<()>>) {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        if inflight.get(key).is_some_and(|l| Arc::strong_count(l) == 1) {
            inflight.remove(key);
        }
    }

    async fn fetch_locked(&self, iteration_id: &str) -> Result<CacheResult> {
        if let Some(payload) = self.repository.get(iteration_id).await? {
            debug!("Cache filled while waiting: {}", iteration_id);
            return Ok(CacheResult::from_cache(payload));
        }

        let payload = self.fetch_from_network(iteration_id).await?;
        self.repository.set(iteration_id, &payload).await?;
        Ok(CacheResult::from_network(payload))
    }

    async fn fetch_from_network(&self, iteration_id: &str) -> Result<IterationPayload> {
        let config = &self.config;
        debug!("Cache miss, fetching iteration {}", iteration_id);

        let iteration = self
            .client
            .get_iteration(&config.group_path, iteration_id)
            .await?;
        let window = DateWindow::for_dates(iteration.start_date, iteration.due_date);

        let (issues, merge_requests, pipelines, incidents) = futures::join!(
            self.client
                .list_iteration_issues(&config.group_path, &iteration.id),
            self.client
                .list_merged_merge_requests(&config.project_path, &window),
            self.client
                .list_pipelines(&config.project_path, &config.default_branch, &window),
            self.client.list_incidents(&config.project_path, &window),
        );

        let issues = self.with_in_progress(issues?).await;

        Ok(IterationPayload {
            iteration_id: iteration_id.to_string(),
            metadata: IterationMetadata::from(&iteration),
            issues,
            merge_requests: merge_requests?,
            pipelines: enrichment("pipelines", iteration_id, pipelines),
            incidents: enrichment("incidents", iteration_id, incidents),
            fetched_at: chrono::Utc::now(),
        })
    }

    /// Fill in `in_progress_at` from each issue's status history.
    async fn with_in_progress(&self, issues: Vec<Issue>) -> Vec<Issue> {
        map_bounded(
            issues,
            |mut issue| async move {
                if issue.in_progress_at.is_none() {
                    match self.client.find_in_progress_at(&issue.id).await {
                        Ok(started) => issue.in_progress_at = started,
                        Err(e) => warn!("Failed to read status history for {}: {}", issue.id, e),
                    }
                }
                issue
            },
            self.config.note_concurrency,
        )
        .await
    }
}
