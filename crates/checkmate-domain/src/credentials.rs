//! API credentials for the model and search providers
//!
//! Credentials are loaded once at startup and handed by reference to the
//! adapters that need them. Nothing reads them from the environment later.

use std::fmt;

/// Environment variable holding the model provider key
pub const MODEL_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable holding the search provider key
pub const SEARCH_API_KEY_VAR: &str = "SERPER_API_KEY";

/// Values shipped in sample `.env` files that are not real keys
const PLACEHOLDER_KEYS: &[&str] = &["YOUR_OWN_SERPER_API_KEY", "YOUR_OWN_GEMINI_API_KEY"];

/// Missing or unusable credential (a startup configuration fault)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The variable is unset or blank
    Missing(&'static str),
    /// The variable still holds a sample placeholder
    Placeholder(&'static str),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Missing(var) => write!(f, "{} not found", var),
            CredentialError::Placeholder(var) => {
                write!(f, "{} is a placeholder; add your own key", var)
            }
        }
    }
}

impl std::error::Error for CredentialError {}

/// Model and search API keys
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    model_api_key: String,
    search_api_key: String,
}

impl Credentials {
    /// Build from explicit keys, rejecting blanks and placeholders
    pub fn new(
        model_api_key: impl Into<String>,
        search_api_key: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let model_api_key = check_key(MODEL_API_KEY_VAR, Some(model_api_key.into()))?;
        let search_api_key = check_key(SEARCH_API_KEY_VAR, Some(search_api_key.into()))?;
        Ok(Self {
            model_api_key,
            search_api_key,
        })
    }

    /// Build from a variable lookup function
    ///
    /// # Examples
    ///
    /// ```
    /// use checkmate_domain::credentials::{Credentials, CredentialError};
    ///
    /// let missing = Credentials::from_lookup(|_| None);
    /// assert_eq!(missing.unwrap_err(), CredentialError::Missing("GEMINI_API_KEY"));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_api_key = check_key(MODEL_API_KEY_VAR, lookup(MODEL_API_KEY_VAR))?;
        let search_api_key = check_key(SEARCH_API_KEY_VAR, lookup(SEARCH_API_KEY_VAR))?;
        Ok(Self {
            model_api_key,
            search_api_key,
        })
    }

    /// Build from the process environment
    pub fn from_env() -> Result<Self, CredentialError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Key for the model provider
    pub fn model_api_key(&self) -> &str {
        &self.model_api_key
    }

    /// Key for the search provider
    pub fn search_api_key(&self) -> &str {
        &self.search_api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("model_api_key", &"<redacted>")
            .field("search_api_key", &"<redacted>")
            .finish()
    }
}

fn check_key(var: &'static str, value: Option<String>) -> Result<String, CredentialError> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(CredentialError::Missing(var));
    }
    if PLACEHOLDER_KEYS.contains(&value.as_str()) {
        return Err(CredentialError::Placeholder(var));
    }
    Ok(value)
}
