//! Transport configuration types.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP transport: JSON-RPC over POST plus an SSE event channel.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for the request/response JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Path for the SSE channel (GET opens the stream, POST sends messages).
    #[serde(default = "default_events_path")]
    pub events_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(feature = "http")]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_events_path() -> String {
    "/events".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

#[cfg(feature = "http")]
const DEFAULT_HTTP_PORT: u16 = 3000;

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            return Self::Stdio;
        }

        #[cfg(all(not(feature = "stdio"), feature = "http"))]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            host: default_host(),
            rpc_path: default_rpc_path(),
            events_path: default_events_path(),
            enable_cors: default_cors(),
        }
    }
}

/// Parses a port variable, warning when the value is unusable.
fn parse_port(raw: &str) -> Option<u16> {
    match raw.trim().parse::<u16>() {
        Ok(port) => Some(port),
        Err(e) => {
            warn!("Ignoring invalid port '{}': {}", raw, e);
            None
        }
    }
}

impl TransportConfig {
    /// Load transport config from environment variables.
    ///
    /// `MCP_TRANSPORT` selects the transport explicitly. Without it, the
    /// presence of `PORT` (or `MCP_HTTP_PORT`) switches to HTTP; otherwise
    /// STDIO is used.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();
        let port = std::env::var("MCP_HTTP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|raw| parse_port(&raw));

        let wants_http = match transport.as_str() {
            "http" => true,
            "stdio" => false,
            "" => port.is_some(),
            other => {
                warn!("Unknown MCP_TRANSPORT '{}', falling back to stdio", other);
                false
            }
        };

        if wants_http {
            #[cfg(feature = "http")]
            {
                let host = std::env::var("MCP_HTTP_HOST")
                    .or_else(|_| std::env::var("HOST"))
                    .unwrap_or_else(|_| default_host());
                let rpc_path =
                    std::env::var("MCP_HTTP_PATH").unwrap_or_else(|_| default_rpc_path());
                let enable_cors = std::env::var("MCP_HTTP_CORS")
                    .map(|v| v.to_lowercase() != "false" && v != "0")
                    .unwrap_or(true);
                return Self::Http(HttpConfig {
                    port: port.unwrap_or(DEFAULT_HTTP_PORT),
                    host,
                    rpc_path,
                    events_path: default_events_path(),
                    enable_cors,
                });
            }
            #[cfg(not(feature = "http"))]
            warn!("HTTP transport requested but the `http` feature is not compiled in");
        }

        Self::default()
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!(
                "HTTP on {}:{} (rpc {}, events {})",
                cfg.host, cfg.port, cfg.rpc_path, cfg.events_path
            ),
        }
    }

    /// Check if this transport is the standard STDIO mode.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}
