//! Domains module containing business logic organized by bounded contexts.
//!
//! - `figma`: the upstream REST client
//! - `resources`: everything addressed by a `figma:///` URI
//! - `tools`: MCP tools over the rest of the Figma API

pub mod figma;
pub mod resources;
pub mod tools;
