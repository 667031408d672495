//! Configuration management for foodlens
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `FOODLENS_API_URL`: Base URL of the analysis service - default: "http://localhost:8000"
//! - `FOODLENS_LOG_LEVEL`: Logging level - default: "info"
//! - `FOODLENS_LOG_JSON`: Emit JSON log lines (true|false) - default: "false"
//!
//! # Example
//!
//! ```no_run
//! use foodlens::{AnalysisPipeline, FoodlensConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FoodlensConfig::default();
//! config.validate()?;
//!
//! let pipeline = AnalysisPipeline::new(config.create_client());
//! let report = pipeline.run("https://example.com/product/42").await?;
//! println!("{} analyses succeeded", report.len());
//! # Ok(())
//! # }
//! ```

use crate::client::{AnalysisClient, HttpAnalysisClient};
use reqwest::Url;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodlensConfig {
    /// Base URL of the analysis service, without the endpoint path
    pub api_url: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub log_json: bool,
}

impl Default for FoodlensConfig {
    /// Loads configuration from `FOODLENS_*` environment variables, falling
    /// back to defaults for anything unset
    fn default() -> Self {
        let api_url = env::var("FOODLENS_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let log_level = env::var("FOODLENS_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("FOODLENS_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            api_url,
            log_level,
            log_json,
        }
    }
}

impl FoodlensConfig {
    /// Checks that the API URL is an absolute http(s) URL and the log level
    /// is known
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_url).map_err(|e| ConfigError::InvalidApiUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidApiUrl {
                url: self.api_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Creates the HTTP client for the configured analysis service
    pub fn create_client(&self) -> Arc<dyn AnalysisClient> {
        Arc::new(HttpAnalysisClient::new(self.api_url.clone()))
    }

    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("api_url".to_string(), self.api_url.clone());
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("log_json".to_string(), self.log_json.to_string());
        map
    }
}

impl fmt::Display for FoodlensConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Foodlens Configuration:")?;
        writeln!(f, "  API URL: {}", self.api_url)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  JSON Logs: {}", self.log_json)?;
        Ok(())
    }
}
