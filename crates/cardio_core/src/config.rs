//! Configuration management.
//!
//! Loads settings from the user config directory or uses defaults. A
//! malformed file is logged and ignored rather than aborting startup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Remote analysis provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the Ollama-compatible endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name used for analysis.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_model() -> String {
    "qwen3:4b".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardioConfig {
    /// Directory holding the JSON store collections.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub provider: ProviderConfig,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardio")
}

impl Default for CardioConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            provider: ProviderConfig::default(),
        }
    }
}

impl CardioConfig {
    /// Default config file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cardio")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults when the
    /// file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load from an explicit path with the same fallback behaviour.
    pub fn load_from(path: &PathBuf) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("invalid config at {:?}: {} - using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = CardioConfig::load_from(&PathBuf::from("/nonexistent/config.toml"));
        assert_eq!(config.provider.base_url, default_base_url());
        assert_eq!(config.provider.timeout_secs, 30);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider]\nmodel = \"llama3.2:3b\"\n").unwrap();

        let config = CardioConfig::load_from(&path);
        assert_eq!(config.provider.model, "llama3.2:3b");
        assert_eq!(config.provider.base_url, default_base_url());
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();

        let config = CardioConfig::load_from(&path);
        assert_eq!(config.provider.model, default_model());
    }
}
