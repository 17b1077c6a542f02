//! Resource service implementation.
//!
//! The ResourceService is the single entry point the server and tools use
//! for anything addressed by a resource URI. It owns the catalog, the reader
//! and the watch registry, all sharing one upstream client.

use std::sync::Arc;

use rmcp::model::ResourceTemplate;
use tracing::info;

use super::catalog::{ResourceCatalog, ResourceDescriptor};
use super::error::ResourceError;
use super::reader::{ContentPayload, ResourceReader};
use super::registry::get_all_resource_templates;
use super::watch::{ChangeReport, WatchEntry, WatchRegistry, WatchStatus};
use crate::domains::figma::FigmaClient;

/// Service for listing, reading and watching Figma resources.
pub struct ResourceService {
    client: Arc<FigmaClient>,
    catalog: ResourceCatalog,
    reader: ResourceReader,
    watches: WatchRegistry,
    templates: Vec<ResourceTemplate>,
}

impl ResourceService {
    /// Create a new ResourceService on top of the given client.
    pub fn new(client: Arc<FigmaClient>, project_id: Option<String>) -> Self {
        info!("Initializing ResourceService");

        Self {
            catalog: ResourceCatalog::new(client.clone(), project_id),
            reader: ResourceReader::new(client.clone()),
            watches: WatchRegistry::new(client.clone()),
            templates: get_all_resource_templates(),
            client,
        }
    }

    /// The shared upstream client.
    pub fn client(&self) -> &Arc<FigmaClient> {
        &self.client
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Result<Vec<ResourceDescriptor>, ResourceError> {
        self.catalog.list().await
    }

    /// Search resources by free text.
    pub async fn search_resources(
        &self,
        query: &str,
    ) -> Result<Vec<ResourceDescriptor>, ResourceError> {
        self.catalog.search(query).await
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<Vec<ContentPayload>, ResourceError> {
        self.reader.read(uri).await
    }

    /// Start watching a resource.
    pub async fn watch_resource(&self, uri: &str) -> Result<WatchStatus, ResourceError> {
        self.watches.establish(uri).await
    }

    /// Check a watched resource for changes.
    pub async fn check_resource(&self, uri: &str) -> Result<ChangeReport, ResourceError> {
        self.watches.check(uri).await
    }

    /// Currently watched resources.
    pub async fn watched_resources(&self) -> Vec<WatchEntry> {
        self.watches.watched().await
    }

    /// List all available resource templates.
    pub fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FigmaConfig;
    use crate::core::security::AccessToken;
    use crate::domains::figma::FigmaError;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn service_for(server: &MockServer) -> ResourceService {
        let config = FigmaConfig {
            access_token: AccessToken::new("figd_test"),
            api_base_url: server.uri(),
            ..FigmaConfig::default()
        };
        ResourceService::new(Arc::new(FigmaClient::new(&config).unwrap()), None)
    }

    #[tokio::test]
    async fn test_resource_service_creation() {
        let server = MockServer::start().await;
        let service = service_for(&server);

        assert_eq!(service.list_resource_templates().len(), 3);
        assert!(service.watched_resources().await.is_empty());
        assert_eq!(service.client().base_url(), server.uri());
    }

    #[tokio::test]
    async fn test_every_upstream_operation_maps_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let service = service_for(&server);

        let is_not_found =
            |r: Result<(), ResourceError>| matches!(r, Err(ResourceError::Upstream(FigmaError::NotFound(_))));

        assert!(is_not_found(service.list_resources().await.map(|_| ())));
        assert!(is_not_found(service.search_resources("x").await.map(|_| ())));
        assert!(is_not_found(service.read_resource("figma:///file/a").await.map(|_| ())));
        assert!(is_not_found(service.watch_resource("figma:///file/a").await.map(|_| ())));
    }

    #[tokio::test]
    async fn test_every_upstream_operation_maps_403() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        let service = service_for(&server);

        let is_denied = |r: Result<(), ResourceError>| {
            matches!(r, Err(ResourceError::Upstream(FigmaError::AccessDenied(_))))
        };

        assert!(is_denied(service.list_resources().await.map(|_| ())));
        assert!(is_denied(service.search_resources("x").await.map(|_| ())));
        assert!(is_denied(service.read_resource("figma:///variable/a/b").await.map(|_| ())));
        assert!(is_denied(service.watch_resource("figma:///file/a").await.map(|_| ())));
    }

    #[tokio::test]
    async fn test_watch_then_read_share_client() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "A",
                "lastModified": "m1"
            })))
            .expect(3)
            .mount(&server)
            .await;
        let service = service_for(&server);

        service.watch_resource("figma:///file/a").await.unwrap();
        service.read_resource("figma:///file/a").await.unwrap();
        let report = service.check_resource("figma:///file/a").await.unwrap();
        assert!(!report.changed);
    }
}
