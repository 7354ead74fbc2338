//! API trait definitions split by responsibility
//!
//! This module organizes the GitLab surface the cache depends on into
//! focused sub-traits:
//! - [`IterationApi`] - Iteration listing and lookup
//! - [`IssueApi`] - Iteration issues, issue notes, incidents
//! - [`DeliveryApi`] - Merge requests and pipelines
//!
//! The [`GitLabApi`](super::GitLabApi) super-trait combines all three.

mod delivery;
mod issue;
mod iteration;

pub use delivery::DeliveryApi;
pub use issue::IssueApi;
pub use iteration::IterationApi;
