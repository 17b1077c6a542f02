//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (and a `.env` file) or defaults.

use super::error::{Error, Result};
use super::security::AccessToken;
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default base URL of the Figma REST API.
pub const DEFAULT_FIGMA_API_BASE_URL: &str = "https://api.figma.com/v1";

/// Default timeout applied to every upstream request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Figma API access configuration.
    pub figma: FigmaConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the upstream Figma API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigmaConfig {
    /// Personal access token, sent as `X-Figma-Token`.
    #[serde(skip_serializing, default)]
    pub access_token: AccessToken,

    /// Base URL of the REST API, without trailing slash.
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Project whose files back `resources/list`.
    /// When unset, the account-level `/files` listing is used.
    pub project_id: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            access_token: AccessToken::default(),
            api_base_url: DEFAULT_FIGMA_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            project_id: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "figma-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            figma: FigmaConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a default configuration carrying the given access token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.figma.access_token = AccessToken::new(token);
        config
    }

    /// Load configuration from environment variables.
    ///
    /// `FIGMA_ACCESS_TOKEN` is required; its absence is reported as
    /// [`Error::MissingToken`] so startup can fail before anything is bound.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        let token = std::env::var("FIGMA_ACCESS_TOKEN")
            .map(AccessToken::new)
            .unwrap_or_default();
        if token.is_empty() {
            return Err(Error::MissingToken);
        }
        info!("Figma access token loaded ({})", token.redacted());
        config.figma.access_token = token;

        if let Ok(base_url) = std::env::var("FIGMA_API_BASE_URL") {
            config.figma.api_base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Ok(timeout) = std::env::var("FIGMA_REQUEST_TIMEOUT_SECS") {
            config.figma.request_timeout_secs = timeout.parse().map_err(|_| {
                Error::config(format!("FIGMA_REQUEST_TIMEOUT_SECS is not a number: {timeout}"))
            })?;
        }

        match std::env::var("FIGMA_PROJECT_ID") {
            Ok(project_id) if !project_id.is_empty() => {
                info!("Listing resources from project {}", project_id);
                config.figma.project_id = Some(project_id);
            }
            _ => warn!("FIGMA_PROJECT_ID not set - listing account-level files"),
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        Ok(config)
    }
}

// Mutex to ensure env var tests run serially across modules
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("FIGMA_ACCESS_TOKEN", "figd_test_12345");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.figma.access_token.expose(), "figd_test_12345");
        unsafe {
            std::env::remove_var("FIGMA_ACCESS_TOKEN");
        }
    }

    #[test]
    fn test_missing_token_fails_fast() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::remove_var("FIGMA_ACCESS_TOKEN");
        }
        let result = Config::from_env();
        assert!(matches!(result, Err(Error::MissingToken)));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("FIGMA_ACCESS_TOKEN", "figd_test_12345");
            std::env::set_var("FIGMA_REQUEST_TIMEOUT_SECS", "soon");
        }
        let result = Config::from_env();
        assert!(matches!(result, Err(Error::Config(_))));
        unsafe {
            std::env::remove_var("FIGMA_ACCESS_TOKEN");
            std::env::remove_var("FIGMA_REQUEST_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("FIGMA_ACCESS_TOKEN", "figd_test_12345");
            std::env::set_var("FIGMA_API_BASE_URL", "http://localhost:9999/v1/");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.figma.api_base_url, "http://localhost:9999/v1");
        unsafe {
            std::env::remove_var("FIGMA_ACCESS_TOKEN");
            std::env::remove_var("FIGMA_API_BASE_URL");
        }
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let config = Config::with_token("figd_super_secret_key");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("super_secret_key"));
        assert!(debug_str.contains("figd…"));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.figma.access_token.is_empty());
        assert_eq!(config.figma.api_base_url, DEFAULT_FIGMA_API_BASE_URL);
        assert_eq!(config.figma.request_timeout_secs, 30);
        assert!(config.figma.project_id.is_none());
    }
}
