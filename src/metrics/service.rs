//! Metric computation over the cached provider

use log::info;

use super::calculator::calculate;
use super::{Metric, MetricKind, MetricsStore};
use crate::cache::CachedIterationProvider;
use crate::client::GitLabApi;
use crate::error::Result;

/// Computes metrics for iterations and persists the results.
pub struct MetricsService<'a, C: GitLabApi> {
    provider: &'a CachedIterationProvider<C>,
    store: &'a MetricsStore,
}

impl<'a, C: GitLabApi> MetricsService<'a, C> {
    pub fn new(provider: &'a CachedIterationProvider<C>, store: &'a MetricsStore) -> Self {
        Self { provider, store }
    }

    /// One metric of `kind` per iteration, in the order given.
    ///
    /// Iterations are read through the cache; only missing or stale ones
    /// are fetched. Results are saved to the metrics store.
    pub async fn calculate(&self, kind: MetricKind, iteration_ids: &[String]) -> Result<Vec<Metric>> {
        let results = self.provider.fetch_many(iteration_ids).await?;

        let metrics: Vec<Metric> = results
            .iter()
            .map(|result| {
                let payload = &result.payload;
                Metric::new(kind, &payload.iteration_id, calculate(kind, payload))
                    .with_title(payload.metadata.title.clone())
            })
            .collect();

        self.store.save(&metrics).await?;
        info!("Computed {} {} values", metrics.len(), kind);
        Ok(metrics)
    }
}
