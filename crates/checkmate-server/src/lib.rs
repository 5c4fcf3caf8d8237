//! Checkmate Server
//!
//! JSON HTTP API over the fact-check pipeline.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod response;

use checkmate_domain::Credentials;
use checkmate_llm::{ChatModel, GeminiModel, LlmError};
use checkmate_search::{SearchError, SearchTool, SerperClient};
use checkmate_store::{PoolConfig, SqliteStore, StoreError};
use checkmate_verifier::{FactChecker, VerificationEngine};
use config::ServerConfig;
use handlers::{create_router, AppState, SharedChecker};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Model client could not be built
    #[error("Model client error: {0}")]
    Llm(#[from] LlmError),

    /// Search client could not be built
    #[error("Search client error: {0}")]
    Search(#[from] SearchError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the production pipeline: Gemini, Serper and a pooled SQLite store
pub fn build_checker(
    config: &ServerConfig,
    credentials: &Credentials,
) -> Result<SharedChecker, ServerError> {
    config.validate()?;
    let (model, search) = build_clients(config, credentials)?;

    let store = SqliteStore::with_pool_config(
        &config.database_path,
        PoolConfig {
            max_size: config.pool_size,
            ..Default::default()
        },
    )?;

    let model: Arc<dyn ChatModel> = Arc::new(model);
    let search: Arc<dyn SearchTool> = Arc::new(search);
    let engine = VerificationEngine::new(model, search, config.verifier.clone());
    Ok(FactChecker::new(engine, Arc::new(store)))
}

/// Model and search clients, with the configured endpoints and timeouts
pub fn build_clients(
    config: &ServerConfig,
    credentials: &Credentials,
) -> Result<(GeminiModel, SerperClient), ServerError> {
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

    Ok((model, search))
}

/// Start the HTTP server
///
/// Credentials are loaded by the caller so a missing key aborts startup
/// before anything is opened.
pub async fn start_server(config: ServerConfig, credentials: Credentials) -> Result<(), ServerError> {
    info!("Starting Checkmate server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path.display());
    info!(
        "Model: {} (tool mode {:?})",
        config.verifier.model_name, config.verifier.tool_mode
    );

    let checker = build_checker(&config, &credentials)?;
    let app = create_router(AppState::new(checker));

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
