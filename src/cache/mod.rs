//! Local cache for iteration payloads
//!
//! File-per-iteration JSON storage with TTL expiry, plus the provider that
//! sits in front of the GitLab client and coalesces concurrent misses.

mod atomic;
pub mod key;
pub mod provider;
pub mod repository;

/// Envelope format version written to every cache file
pub const CACHE_VERSION: &str = "1.0";

/// Default entry lifetime in hours
pub const DEFAULT_TTL_HOURS: f64 = 6.0;

pub use atomic::write_atomic;
pub use provider::{CacheResult, CacheSource, CachedIterationProvider, ProviderConfig};
pub use repository::IterationCacheRepository;
