//! Resources domain module.
//!
//! This module handles everything addressed by a `figma:///` resource URI.
//!
//! ## Architecture
//!
//! - `uri.rs` - Resource URI codec
//! - `catalog.rs` - Listing and search of files as resources
//! - `reader.rs` - Reading files, components and variables
//! - `watch.rs` - Watch registry (poll-on-demand change detection)
//! - `registry.rs` - Resource templates
//! - `service.rs` - Facade composing the above, injected into the server

mod catalog;
mod error;
mod reader;
mod registry;
mod service;
pub mod uri;
mod watch;

pub use catalog::{ResourceCatalog, ResourceDescriptor};
pub use error::{ResourceError, codes};
pub use reader::{ContentPayload, JSON_MIME_TYPE, ResourceReader};
pub use registry::get_all_resource_templates;
pub use service::ResourceService;
pub use uri::{ResourceAddress, ResourceKind, SCHEME};
pub use watch::{ChangeReport, WATCHING, WatchEntry, WatchRegistry, WatchStatus};
