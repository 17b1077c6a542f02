//! Figma domain module.
//!
//! This module owns all communication with the Figma REST API. Every other
//! domain goes through [`FigmaClient`], which attaches credentials and maps
//! transport and status failures onto [`FigmaError`].
//!
//! ## Architecture
//!
//! - `client.rs` - Authenticated HTTP client and endpoint helpers
//! - `models.rs` - Response shapes for the endpoints decoded by this crate
//! - `error.rs` - Upstream error taxonomy

mod client;
mod error;
pub mod models;

pub use client::{FigmaClient, TOKEN_HEADER};
pub use error::FigmaError;
pub use models::{FileDocument, FileListResponse, FileSummary};
