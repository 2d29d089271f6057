//! Configuration loading, validation, and management for counsel.
//!
//! Loads configuration from `~/.counsel/config.toml` with environment
//! variable overrides. Validates all settings at load time. Also
//! loads per-run advisory briefs from TOML files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use counsel_core::AdvisoryBrief;

/// The root configuration structure.
///
/// Maps directly to `~/.counsel/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the local Ollama server.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-exchange timeout for one generate request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum prompt size sent to the model, in UTF-8 bytes. The
    /// accumulated buffer is truncated to this cap at a character
    /// boundary before the request is issued.
    #[serde(default = "default_max_prompt_bytes")]
    pub max_prompt_bytes: usize,

    /// Where the disclaimed advisory result is persisted. Overwritten
    /// on each successful run.
    #[serde(default = "default_result_path")]
    pub result_path: PathBuf,

    /// Model to use when the brief does not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

fn default_endpoint() -> String {
    "http://localhost:11434".into()
}
fn default_timeout_secs() -> u64 {
    420
}
fn default_max_prompt_bytes() -> usize {
    32_000
}
fn default_result_path() -> PathBuf {
    PathBuf::from("ai_interpretation.md")
}

impl AppConfig {
    /// Load configuration from the default path (~/.counsel/config.toml).
    ///
    /// Environment variable overrides (highest priority):
    /// - `COUNSEL_ENDPOINT` — Ollama base URL
    /// - `COUNSEL_MODEL` — default model
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(endpoint) = std::env::var("COUNSEL_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("COUNSEL_MODEL") {
            config.default_model = Some(model);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".counsel")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "endpoint must not be empty".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if self.max_prompt_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "max_prompt_bytes must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Generate a default config TOML string (for `onboard`).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_prompt_bytes: default_max_prompt_bytes(),
            result_path: default_result_path(),
            default_model: None,
        }
    }
}

/// Load an advisory brief from a TOML file.
///
/// Keys left out of the file stay `None`, so the orchestrator can
/// report exactly which required keys are missing.
pub fn load_brief(path: &Path) -> Result<AdvisoryBrief, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
