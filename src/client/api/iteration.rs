//! Iteration API trait

use async_trait::async_trait;

use crate::client::models::Iteration;
use crate::error::Result;

/// Iteration operations for the GitLab API
#[async_trait]
pub trait IterationApi: Send + Sync {
    /// List every iteration visible to a group.
    ///
    /// If `group_path` does not resolve, successively shorter prefixes are
    /// tried; the path may name a project nested under the group that owns
    /// the iteration cadence.
    async fn list_iterations(&self, group_path: &str) -> Result<Vec<Iteration>>;

    /// Look up a single iteration by global ID.
    async fn get_iteration(&self, group_path: &str, iteration_id: &str) -> Result<Iteration>;
}
