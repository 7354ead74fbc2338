//! Error types for sprintlens

use std::fmt;

use thiserror::Error;

/// Result type alias for sprintlens operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether a caller-level retry could succeed.
    ///
    /// Only transport failures caused by throttling, server errors or
    /// connectivity are retryable.
    #[allow(dead_code)]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(e) if e.retryable)
    }
}

/// Failure category for a GraphQL call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The response body carried a non-empty `errors` array
    GraphQlField,
    /// The server answered with a non-success HTTP status
    HttpStatus(u16),
    /// Connection reset, refused, timed out, or the body was unreadable
    Network,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::GraphQlField => write!(f, "GraphQL error"),
            TransportErrorKind::HttpStatus(status) => write!(f, "HTTP {}", status),
            TransportErrorKind::Network => write!(f, "network error"),
        }
    }
}

/// Normalized failure of the GraphQL execution boundary.
///
/// Built only by [`crate::client::graphql::normalize_error`] and
/// [`TransportError::graphql`], so callers branch on `kind` instead of
/// probing response shapes.
#[derive(Debug, Clone, Error)]
#[error("{context}: {kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    pub retryable: bool,
    pub context: String,
}

impl TransportError {
    /// Field errors returned inside a 200 response.
    pub fn graphql(context: impl Into<String>, messages: &[String]) -> Self {
        Self {
            kind: TransportErrorKind::GraphQlField,
            message: messages.join("; "),
            retryable: false,
            context: context.into(),
        }
    }

    /// A non-success HTTP status. 429 and 5xx are retryable.
    pub fn http_status(context: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::HttpStatus(status),
            message: message.into(),
            retryable: status == 429 || (500..600).contains(&status),
            context: context.into(),
        }
    }

    /// A connectivity failure. Always retryable.
    pub fn network(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Network,
            message: message.into(),
            retryable: true,
            context: context.into(),
        }
    }
}

/// GitLab domain errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Group or project not found: {path}")]
    ScopeNotFound { path: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Iteration cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache entry for '{key}' is corrupted: {reason}")]
    Corrupted { key: String, reason: String },

    #[error("Cache key '{key}' resolves outside the cache directory (path traversal)")]
    PathTraversal { key: String },

    #[error("Invalid cache TTL: {0} hours (must be >= 0, 0 disables expiry)")]
    InvalidTtl(f64),

    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize cache entry: {0}")]
    Serialize(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("GitLab token not configured. Set GITLAB_TOKEN or pass --token.")]
    MissingToken,

    #[error("GitLab group path not configured. Set GITLAB_GROUP_PATH or pass --group.")]
    MissingGroupPath,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
