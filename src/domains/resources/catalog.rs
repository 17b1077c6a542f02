//! Resource catalog: maps upstream file listings to resource descriptors.

use std::sync::Arc;

use rmcp::model::{AnnotateAble, Meta, RawResource, Resource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::error::ResourceError;
use super::reader::JSON_MIME_TYPE;
use super::uri::{ResourceAddress, ResourceKind};
use crate::domains::figma::{FigmaClient, FileSummary};

/// A listed or searched resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub name: String,
    pub metadata: Map<String, Value>,
}

impl From<FileSummary> for ResourceDescriptor {
    fn from(file: FileSummary) -> Self {
        let mut metadata = Map::new();
        if let Some(last_modified) = file.last_modified {
            metadata.insert("lastModified".to_string(), Value::String(last_modified));
        }
        if let Some(thumbnail_url) = file.thumbnail_url {
            metadata.insert("thumbnailUrl".to_string(), Value::String(thumbnail_url));
        }
        if let Some(version) = file.version {
            metadata.insert("version".to_string(), version);
        }

        Self {
            uri: ResourceAddress::file(file.key).to_string(),
            kind: ResourceKind::File,
            name: file.name,
            metadata,
        }
    }
}

impl From<ResourceDescriptor> for Resource {
    fn from(descriptor: ResourceDescriptor) -> Self {
        let description = match descriptor.metadata.get("lastModified").and_then(Value::as_str) {
            Some(last_modified) => format!("Figma {}, last modified {}", descriptor.kind, last_modified),
            None => format!("Figma {}", descriptor.kind),
        };

        let mut meta = Meta::new();
        meta.insert(
            "type".to_string(),
            Value::String(descriptor.kind.as_str().to_string()),
        );
        meta.insert("metadata".to_string(), Value::Object(descriptor.metadata));

        let mut raw = RawResource::new(descriptor.uri, descriptor.name);
        raw.description = Some(description);
        raw.mime_type = Some(JSON_MIME_TYPE.to_string());
        raw.meta = Some(meta);
        raw.no_annotation()
    }
}

/// Lists and searches Figma files.
pub struct ResourceCatalog {
    client: Arc<FigmaClient>,
    project_id: Option<String>,
}

impl ResourceCatalog {
    pub fn new(client: Arc<FigmaClient>, project_id: Option<String>) -> Self {
        Self { client, project_id }
    }

    /// Lists files as resources. An empty listing is not an error.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ResourceDescriptor>, ResourceError> {
        let listing = self.client.list_files(self.project_id.as_deref()).await?;
        info!("Listed {} Figma files", listing.files.len());
        Ok(listing.files.into_iter().map(ResourceDescriptor::from).collect())
    }

    /// Searches files. The query goes upstream as-is, even when empty.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<ResourceDescriptor>, ResourceError> {
        let results = self.client.search_files(query).await?;
        info!("Search matched {} Figma files", results.files.len());
        Ok(results.files.into_iter().map(ResourceDescriptor::from).collect())
    }
}
