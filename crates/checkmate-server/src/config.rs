//! Configuration file parsing for the server.
//!
//! Loads bind address, database location, pool size and verifier settings
//! from TOML. API keys are never read from this file; they come from the
//! environment (see [`load_credentials`]).

use checkmate_domain::{CredentialError, Credentials};
use checkmate_verifier::VerifierConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// API key missing or unusable
    #[error("Credential error: {0}")]
    Credentials(#[from] CredentialError),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 5001)
    pub bind_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Maximum pooled database connections
    pub pool_size: usize,

    /// Override for the Gemini API endpoint
    pub model_endpoint: Option<String>,

    /// Override for the search API endpoint
    pub search_endpoint: Option<String>,

    /// Verification engine settings
    pub verifier: VerifierConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 5001,
            database_path: PathBuf::from("checkmate.db"),
            pool_size: 4,
            model_endpoint: None,
            search_endpoint: None,
            verifier: VerifierConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid(
                "pool_size must be greater than 0".to_string(),
            ));
        }
        self.verifier.validate().map_err(ConfigError::Invalid)
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

/// Load API keys from the environment, honouring a `.env` file
pub fn load_credentials() -> Result<Credentials, ConfigError> {
    // A missing .env file is fine; the variables may be set directly.
    let _ = dotenvy::dotenv();
    Ok(Credentials::from_env()?)
}
