//! Rate limiting for GitLab API calls
//!
//! Two layers:
//! - [`RateLimitManager`] is the fixed pause paginated clients take between pages.
//! - [`RequestQuota`] is a reactive per-request quota on the HTTP transport
//!   that only starts throttling after GitLab answers with a 429.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorLimiter};
use log::debug;

/// Default pause between pages of one connection.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(100);

/// GitLab.com allows 2000 authenticated API requests per minute.
const REQUESTS_PER_MINUTE: u32 = 2000;

/// Delay primitive used between paginated API calls.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait before requesting the next page.
    async fn delay(&self);
}

/// Fixed inter-page delay.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitManager {
    delay: Duration,
}

impl Default for RateLimitManager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_DELAY)
    }
}

impl RateLimitManager {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

#[async_trait]
impl RateLimiter for RateLimitManager {
    async fn delay(&self) {
        if self.delay.is_zero() {
            return;
        }
        tokio::time::sleep(self.delay).await;
    }
}

/// Request quota for the HTTP transport.
///
/// Inactive until [`RequestQuota::activate`] is called on the first 429, after
/// which every request waits for a governor permit.
pub struct RequestQuota {
    limiter: GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>,
    active: AtomicBool,
}

impl Default for RequestQuota {
    fn default() -> Self {
        Self::per_minute(REQUESTS_PER_MINUTE)
    }
}

impl RequestQuota {
    pub fn per_minute(requests: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: GovernorLimiter::direct(quota),
            active: AtomicBool::new(false),
        }
    }

    /// Start throttling. Idempotent.
    pub fn activate(&self) {
        let was_active = self.active.swap(true, Ordering::SeqCst);
        if !was_active {
            debug!("Request quota activated after rate limit response");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait for a permit if throttling is active.
    pub async fn wait_if_active(&self) {
        if self.is_active() {
            self.limiter.until_ready().await;
        }
    }
}
