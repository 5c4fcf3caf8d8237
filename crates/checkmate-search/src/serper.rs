//! Serper Provider Implementation
//!
//! Google Search results through the Serper API. A query is a POST of
//! `{"q": <query>}` with the API key in the `X-API-KEY` header; the JSON
//! answer is returned as-is.

use crate::{SearchError, SearchResults, SearchTool};
use async_trait::async_trait;
use checkmate_domain::Credentials;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Serper search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://google.serper.dev/search";

/// Default timeout for search requests (15 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const API_KEY_HEADER: &str = "X-API-KEY";

/// Serper search client
pub struct SerperClient {
    endpoint: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl SerperClient {
    /// Create a client using the search key from `credentials`
    pub fn new(credentials: &Credentials) -> Result<Self, SearchError> {
        Self::with_timeout(credentials, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit HTTP timeout
    pub fn with_timeout(credentials: &Credentials, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: credentials.search_api_key().to_string(),
            timeout,
            client,
        })
    }

    /// HTTP timeout applied to each request
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Point the client at a different endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchTool for SerperClient {
    async fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
        debug!(query = %query, "Sending search request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&json!({ "q": query }))
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Search provider rejected request");
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Malformed(e.to_string()))?;

        if !payload.is_object() {
            return Err(SearchError::Malformed(
                "expected a JSON object".to_string(),
            ));
        }

        let results = SearchResults::new(payload);
        debug!(links = results.links().len(), "Search results received");
        Ok(results)
    }
}
