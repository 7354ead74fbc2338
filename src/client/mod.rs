//! GitLab API client

use chrono::{DateTime, Days, NaiveDate, Utc};

pub mod api;
#[cfg(test)]
pub mod fixtures;
pub mod gitlab;
pub mod graphql;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod parallel;
mod queries;
pub mod rate_limit;
pub mod status;

pub use api::{DeliveryApi, IssueApi, IterationApi};
pub use gitlab::GitLabClient;
pub use graphql::GraphQlClient;
#[cfg(test)]
pub use mock::MockGitLabClient;
pub use rate_limit::RateLimitManager;

/// GitLab API client trait
///
/// Super-trait combining all API operation traits. Implemented automatically
/// for anything implementing the three sub-traits.
pub trait GitLabApi: IterationApi + IssueApi + DeliveryApi {}

impl<T> GitLabApi for T where T: IterationApi + IssueApi + DeliveryApi {}

/// Half-open time range `[start, end)` used to scope MR, pipeline and
/// incident queries to an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// From the start of `start_date` to the end of `due_date`, in UTC.
    pub fn for_dates(start_date: NaiveDate, due_date: NaiveDate) -> Self {
        let start = start_date.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = due_date
            .checked_add_days(Days::new(1))
            .unwrap_or(due_date)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();
        Self { start, end }
    }

    #[cfg(test)]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    /// Length in whole days, at least one.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }
}
