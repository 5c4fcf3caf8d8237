//! Checkmate Search Layer
//!
//! Stateless adapters to external web-search providers.
//!
//! A search returns the provider's raw JSON payload, untouched, so the
//! verification engine can relay it to the model as a tool result. Every
//! failure (network, non-2xx status, malformed body) comes back as a typed
//! [`SearchError`] instead of a panic or an ad-hoc error object.
//!
//! # Providers
//!
//! - `SerperClient`: Serper Google Search API
//! - `StaticSearch`: Canned results for testing

#![warn(missing_docs)]

pub mod serper;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use serper::SerperClient;

/// Errors returned by a search provider
#[derive(Error, Debug)]
pub enum SearchError {
    /// The request never produced a response
    #[error("Search request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status
    #[error("Search provider returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body was not a JSON object
    #[error("Malformed search response: {0}")]
    Malformed(String),
}

/// Raw result payload from a search provider
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    payload: Value,
}

impl SearchResults {
    /// Wrap a provider payload
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// The payload as received
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consume into the raw payload
    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// `link` fields of the `organic` results, in order
    pub fn links(&self) -> Vec<&str> {
        self.payload
            .get("organic")
            .and_then(Value::as_array)
            .map(|results| {
                results
                    .iter()
                    .filter_map(|r| r.get("link").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First organic link, used as the record's citation
    pub fn first_link(&self) -> Option<&str> {
        self.links().into_iter().next()
    }
}

/// A web search provider
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Run one query
    async fn search(&self, query: &str) -> Result<SearchResults, SearchError>;
}

#[async_trait]
impl<T: SearchTool + ?Sized> SearchTool for Arc<T> {
    async fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
        (**self).search(query).await
    }
}

/// Search provider returning a fixed outcome, for testing
///
/// Counts calls and remembers the queries it received. Clones share the
/// counters.
#[derive(Clone)]
pub struct StaticSearch {
    outcome: Arc<dyn Fn() -> Result<SearchResults, SearchError> + Send + Sync>,
    calls: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl StaticSearch {
    /// Always answer with `payload`
    pub fn returning(payload: Value) -> Self {
        Self::from_fn(move || Ok(SearchResults::new(payload.clone())))
    }

    /// Always fail with a transport error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_fn(move || Err(SearchError::Transport(message.clone())))
    }

    fn from_fn<F>(outcome: F) -> Self
    where
        F: Fn() -> Result<SearchResults, SearchError> + Send + Sync + 'static,
    {
        Self {
            outcome: Arc::new(outcome),
            calls: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Wait `delay` before answering each query
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of searches performed
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries received, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SearchTool for StaticSearch {
    async fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.outcome)()
    }
}
