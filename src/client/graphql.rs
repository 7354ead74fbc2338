//! GraphQL execution boundary
//!
//! Everything above this module sees GitLab as `execute(query, variables)`
//! returning the `data` object or a normalized [`TransportError`].

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use super::rate_limit::RequestQuota;
use crate::error::{ApiError, Result, TransportError, TransportErrorKind};

/// Default GitLab instance
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes GraphQL documents against GitLab.
#[async_trait]
pub trait GraphQlExecutor: Send + Sync {
    /// Run `query` with `variables` and return the response `data` object.
    ///
    /// `context` names the calling operation and is carried into any error.
    async fn execute(&self, query: &str, variables: Value, context: &str) -> Result<Value>;
}

/// Raw failure observed by the transport before normalization.
#[derive(Debug)]
pub enum Failure {
    /// The request never produced a response
    Request(reqwest::Error),
    /// A non-success status with the response body
    Status(u16, String),
    /// The body of a successful response could not be read to the end
    Body(reqwest::Error),
    /// `errors` array of an otherwise successful response
    Fields(Vec<String>),
}

/// Map any transport failure onto the tagged [`TransportError`].
pub fn normalize_error(context: &str, failure: Failure) -> TransportError {
    match failure {
        Failure::Request(err) => {
            let message = if err.is_timeout() {
                "Request timed out".to_string()
            } else if err.is_connect() {
                "Failed to connect to GitLab".to_string()
            } else {
                err.to_string()
            };
            if err.is_timeout() || err.is_connect() || err.is_request() {
                TransportError::network(context, message)
            } else {
                TransportError {
                    kind: TransportErrorKind::Network,
                    message,
                    retryable: false,
                    context: context.to_string(),
                }
            }
        }
        Failure::Status(status, body) => {
            let message = if body.trim().is_empty() {
                format!("Unexpected status code: {}", status)
            } else {
                body
            };
            TransportError::http_status(context, status, message)
        }
        Failure::Body(err) => {
            let message = if err.is_timeout() {
                "Timed out reading response".to_string()
            } else {
                format!("Connection lost while reading response: {}", err)
            };
            TransportError::network(context, message)
        }
        Failure::Fields(messages) => TransportError::graphql(context, &messages),
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,

    #[serde(default)]
    errors: Option<Vec<GraphQlErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

/// reqwest-backed GitLab GraphQL client
pub struct GraphQlClient {
    http: HttpClient,
    endpoint: String,
    token: String,
    quota: RequestQuota,
}

impl GraphQlClient {
    /// Create a client for the GitLab instance at `base_url`.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| normalize_error("build HTTP client", Failure::Request(e)))?;

        Ok(Self {
            http,
            endpoint: format!("{}/api/graphql", base_url.trim_end_matches('/')),
            token: token.into(),
            quota: RequestQuota::default(),
        })
    }
}

#[async_trait]
impl GraphQlExecutor for GraphQlClient {
    async fn execute(&self, query: &str, variables: Value, context: &str) -> Result<Value> {
        self.quota.wait_if_active().await;

        debug!("GraphQL request: {}", context);
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| normalize_error(context, Failure::Request(e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            self.quota.activate();
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                debug!("Failed to read error body for {}: {}", context, e);
                String::new()
            });
            return Err(normalize_error(context, Failure::Status(status.as_u16(), body)).into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| normalize_error(context, Failure::Body(e)))?;
        let body: GraphQlResponse = serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::InvalidResponse(format!("{}: failed to parse response: {}", context, e))
        })?;

        if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(normalize_error(context, Failure::Fields(messages)).into());
        }

        body.data.filter(|data| !data.is_null()).ok_or_else(|| {
            ApiError::InvalidResponse(format!("{}: response carried no data", context)).into()
        })
    }
}
