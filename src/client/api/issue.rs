//! Issue API trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::client::DateWindow;
use crate::client::models::{Incident, Issue, Note};
use crate::client::pagination::Connection;
use crate::error::Result;

/// Issue, note and incident operations for the GitLab API
#[async_trait]
pub trait IssueApi: Send + Sync {
    /// All issues assigned to an iteration, across the group's projects.
    async fn list_iteration_issues(&self, group_path: &str, iteration_id: &str)
    -> Result<Vec<Issue>>;

    /// One page of an issue's notes, oldest first.
    async fn list_issue_notes(&self, issue_id: &str, cursor: Option<&str>)
    -> Result<Connection<Note>>;

    /// When the issue first moved into an in-progress status.
    ///
    /// Walks note pages until a match is found or the history ends.
    async fn find_in_progress_at(&self, issue_id: &str) -> Result<Option<DateTime<Utc>>>;

    /// Incidents created inside the window.
    async fn list_incidents(&self, project_path: &str, window: &DateWindow)
    -> Result<Vec<Incident>>;
}
