//! Wiring of the fact-check pipeline for command-line use.

use crate::config::Config;
use crate::error::Result;
use checkmate_domain::Credentials;
use checkmate_llm::{ChatModel, GeminiModel};
use checkmate_search::{SearchTool, SerperClient};
use checkmate_store::SqliteStore;
use checkmate_verifier::{FactChecker, VerificationEngine};
use std::fs;
use std::sync::Arc;
use tracing::debug;

/// Pipeline type the CLI runs
pub type Checker = FactChecker<Arc<dyn ChatModel>, Arc<dyn SearchTool>, SqliteStore>;

/// Open the configured database, creating its directory if needed.
pub fn open_store(config: &Config) -> Result<Arc<SqliteStore>> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    debug!(path = %config.database_path.display(), "Opening database");
    Ok(Arc::new(SqliteStore::new(&config.database_path)?))
}

/// Everything a command needs to talk to the model and the store.
pub struct App {
    checker: Checker,
}

impl App {
    /// Wrap an already built checker
    pub fn new(checker: Checker) -> Self {
        Self { checker }
    }

    /// Build the production pipeline: Gemini, Serper and `store`
    pub fn connect(config: &Config, credentials: &Credentials, store: Arc<SqliteStore>) -> Result<Self> {
        let mut model = GeminiModel::with_timeout(
            credentials,
            config.verifier.model_name.clone(),
            config.verifier.model_timeout(),
        )?;
        if let Some(endpoint) = &config.model_endpoint {
            model = model.with_endpoint(endpoint.clone());
        }

        let mut search = SerperClient::with_timeout(credentials, config.verifier.search_timeout())?;
        if let Some(endpoint) = &config.search_endpoint {
            search = search.with_endpoint(endpoint.clone());
        }

        let model: Arc<dyn ChatModel> = Arc::new(model);
        let search: Arc<dyn SearchTool> = Arc::new(search);
        let engine = VerificationEngine::new(model, search, config.verifier.clone());
        Ok(Self::new(FactChecker::new(engine, store)))
    }

    /// The fact-check pipeline
    pub fn checker(&self) -> &Checker {
        &self.checker
    }

    /// The chat model, shared with the pipeline
    pub fn model(&self) -> &dyn ChatModel {
        self.checker.engine().model().as_ref()
    }
}
