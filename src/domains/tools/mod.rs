//! Tools domain module.
//!
//! Tools are executable functions MCP clients call to act on Figma: resource
//! search and watching, comments, versions, variables, images and library
//! lookups.
//!
//! ## Architecture
//!
//! - `definitions/` - tool implementations grouped by API area
//! - `router.rs` - dynamic ToolRouter builder for the STDIO transport
//! - `registry.rs` - tool metadata and HTTP dispatch
//! - `error.rs` - tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Define a params struct and a unit struct implementing `FigmaTool`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add its route in `router.rs`
//! 4. Register it in `registry.rs` for HTTP support

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
