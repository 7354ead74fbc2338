//! Cursor pagination over GraphQL connections
//!
//! GitLab returns bounded pages of a connection plus a `pageInfo` block. The
//! helpers here walk a connection to exhaustion, one page at a time.

use std::future::Future;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::rate_limit::RateLimiter;
use crate::error::Result;

/// Maximum page size supported by the GitLab GraphQL API.
/// Using this for every connection minimizes round trips.
pub const MAX_PAGE_SIZE: usize = 100;

/// Cursor state returned with every page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,

    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of a GraphQL connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,

    #[serde(default)]
    pub page_info: PageInfo,
}

#[cfg(test)]
impl<T> Connection<T> {
    /// A single, final page.
    pub fn last(nodes: Vec<T>) -> Self {
        Self {
            nodes,
            page_info: PageInfo::default(),
        }
    }

    /// A page followed by more pages after `cursor`.
    pub fn with_next(nodes: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            nodes,
            page_info: PageInfo {
                has_next_page: true,
                end_cursor: Some(cursor.into()),
            },
        }
    }
}

impl<T> Connection<T> {
    /// Cursor to request next, or `None` when the walk is complete.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.page_info.has_next_page {
            self.page_info.end_cursor.as_deref()
        } else {
            None
        }
    }
}

/// Fetch every page of a connection.
///
/// Pages are requested strictly in order: page N+1 uses the cursor returned
/// with page N. The limiter's delay runs between pages only, never after the
/// final one. A page claiming more results without a cursor ends the walk.
///
/// # Example
///
/// ```ignore
/// let issues = paginate(&limiter, |cursor| async move {
///     client.issues_page(&group, cursor.as_deref()).await
/// })
/// .await?;
/// ```
pub async fn paginate<T, F, Fut>(limiter: &dyn RateLimiter, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Connection<T>>>,
{
    let mut all_items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(cursor.take()).await?;
        pages += 1;

        let has_more = page.page_info.has_next_page;
        let next = page.page_info.end_cursor;
        all_items.extend(page.nodes);

        match (has_more, next) {
            (true, Some(next)) => {
                cursor = Some(next);
                limiter.delay().await;
            }
            (true, None) => {
                warn!("Connection reported more pages but no cursor; stopping after page {}", pages);
                break;
            }
            (false, _) => break,
        }
    }

    debug!("Fetched {} items across {} pages", all_items.len(), pages);
    Ok(all_items)
}
