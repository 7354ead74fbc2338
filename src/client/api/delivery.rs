//! Delivery API trait

use async_trait::async_trait;

use crate::client::DateWindow;
use crate::client::models::{MergeRequest, Pipeline};
use crate::error::Result;

/// Merge request and pipeline operations for the GitLab API
#[async_trait]
pub trait DeliveryApi: Send + Sync {
    /// Merge requests merged inside the window.
    async fn list_merged_merge_requests(
        &self,
        project_path: &str,
        window: &DateWindow,
    ) -> Result<Vec<MergeRequest>>;

    /// Pipelines for `ref_name` updated inside the window.
    async fn list_pipelines(
        &self,
        project_path: &str,
        ref_name: &str,
        window: &DateWindow,
    ) -> Result<Vec<Pipeline>>;
}
