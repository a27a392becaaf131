//! Configuration for the content router
//!
//! Routing behavior is declared in a TOML file: the ordered route list, the
//! analysis-field hint, the response format the model is asked for, debug
//! mode, the per-record failure policy, and an optional HTTP model backend.

use crate::record::Route;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// How the model is asked to format its routing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Model returns only the route index
    #[default]
    Index,
    /// Model returns `{routeIndex, reasoning}` JSON
    Structured,
}

/// What happens when processing of a single record fails hard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Convert the failure into a Default-routed record carrying an error field
    #[default]
    Continue,
    /// Abort the whole run, identifying the offending record by position
    FailFast,
}

/// Main router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default)]
    pub router: RouterSection,
    /// Ordered routes; a route's 1-based position is its output index
    #[serde(default)]
    pub routes: Vec<Route>,
    /// Optional HTTP model backend for the bundled capability
    pub model: Option<ModelSection>,
}

/// Router behavior section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterSection {
    /// Dotted-path hint naming the payload field to analyze
    #[serde(default)]
    pub analysis_field: String,
    #[serde(default)]
    pub response_format: ResponseFormat,
    /// Attach analysis diagnostics to routed records and log decisions
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub on_error: FailurePolicy,
}

/// HTTP model backend section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    /// OpenAI-compatible base URL, e.g. `http://localhost:11434/v1`
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Environment variable containing the API key, if the endpoint needs one
    pub api_key_env: Option<String>,
    /// Sampling temperature; low by default for consistent routing
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f32 {
    0.1
}

fn default_timeout_secs() -> u64 {
    60
}

impl RouterConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate semantic constraints the type system cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (position, route) in self.routes.iter().enumerate() {
            if route.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "route {} has an empty name",
                    position + 1
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for route in &self.routes {
            if !seen.insert(route.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate route name: {}",
                    route.name
                )));
            }
        }

        if let Some(model) = &self.model {
            url::Url::parse(&model.endpoint).map_err(|e| {
                ConfigError::Validation(format!("invalid model endpoint {}: {e}", model.endpoint))
            })?;
            if model.model.trim().is_empty() {
                return Err(ConfigError::Validation("model identifier is empty".into()));
            }
        }

        Ok(())
    }

    /// Number of configured routes, excluding the implicit Default
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}
