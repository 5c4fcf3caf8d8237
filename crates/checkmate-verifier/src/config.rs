//! Configuration for the verification engine

use checkmate_llm::ToolMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the verification engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Model identifier passed to the chat provider
    pub model_name: String,

    /// Maximum time for a single model turn (seconds)
    pub model_timeout_secs: u64,

    /// Maximum time for a single search call (seconds)
    pub search_timeout_secs: u64,

    /// Whether the model may (`auto`) or must (`required`) search first
    pub tool_mode: ToolMode,
}

impl VerifierConfig {
    /// Get the model timeout as a Duration
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    /// Get the search timeout as a Duration
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model_name.trim().is_empty() {
            return Err("model_name must not be empty".to_string());
        }
        if self.model_timeout_secs == 0 {
            return Err("model_timeout_secs must be greater than 0".to_string());
        }
        if self.search_timeout_secs == 0 {
            return Err("search_timeout_secs must be greater than 0".to_string());
        }
        if self.tool_mode == ToolMode::None {
            return Err("tool_mode must be 'auto' or 'required'".to_string());
        }
        Ok(())
    }
}

impl Default for VerifierConfig {
    /// Search is optional, generous timeouts
    fn default() -> Self {
        Self {
            model_name: checkmate_llm::gemini::DEFAULT_MODEL.to_string(),
            model_timeout_secs: 60,
            search_timeout_secs: 15,
            tool_mode: ToolMode::Auto,
        }
    }
}

impl VerifierConfig {
    /// Strict preset: the model must search before answering
    pub fn strict() -> Self {
        Self {
            tool_mode: ToolMode::Required,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = VerifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tool_mode, ToolMode::Auto);
        assert_eq!(config.model_name, "gemini-1.5-pro");
    }

    #[test]
    fn test_strict_config_forces_search() {
        let config = VerifierConfig::strict();
        assert!(config.validate().is_ok());
        assert_eq!(config.tool_mode, ToolMode::Required);
    }

    #[test]
    fn test_invalid_timeouts() {
        let mut config = VerifierConfig::default();
        config.model_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = VerifierConfig::default();
        config.search_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tools_cannot_be_disabled() {
        let mut config = VerifierConfig::default();
        config.tool_mode = ToolMode::None;
        assert!(config.validate().unwrap_err().contains("tool_mode"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = VerifierConfig::from_toml("tool_mode = \"required\"\n").unwrap();
        assert_eq!(config.tool_mode, ToolMode::Required);
        assert_eq!(config.model_timeout_secs, 60);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = VerifierConfig::strict();
        let toml_str = config.to_toml().unwrap();
        let parsed = VerifierConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
