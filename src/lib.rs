//! Figma MCP Server Library
//!
//! This crate exposes Figma files, components and variables to MCP clients
//! as resources addressed by `figma:///` URIs, plus tools for the rest of
//! the Figma REST API.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, credential handling, the MCP
//!   server handler and the transports (STDIO, HTTP with SSE)
//! - **domains**: business logic organized by bounded contexts
//!   - **figma**: the upstream REST client and its error taxonomy
//!   - **resources**: URI codec, catalog, reader and watch registry
//!   - **tools**: MCP tools that can be executed by clients
//!
//! # Example
//!
//! ```rust,no_run
//! use figma_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
