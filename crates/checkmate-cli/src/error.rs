//! Error types for the CLI application.

use checkmate_domain::{CredentialError, FactCheckId};
use checkmate_llm::LlmError;
use checkmate_search::SearchError;
use checkmate_store::StoreError;
use checkmate_verifier::CheckError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API keys missing or unusable
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialError),

    /// Database error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Model client error
    #[error("Model error: {0}")]
    Llm(#[from] LlmError),

    /// Search client error
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Fact-check pipeline error
    #[error("{0}")]
    Check(#[from] CheckError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line editor error
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No record with this id
    #[error("Fact check {0} not found")]
    NotFound(FactCheckId),
}
