//! MCP Server implementation and lifecycle management.
//!
//! The server owns one upstream client shared by the resource service and
//! every tool. Standard MCP resource requests are answered by the
//! `ServerHandler` implementation; the HTTP transport calls the plain
//! methods below, which also serve `resources/search`, `resources/watch`
//! and `resources/check`.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Error;
use crate::domains::{
    figma::FigmaClient,
    resources::{ResourceError, ResourceService},
    tools::build_tool_router,
};

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Service for everything addressed by a resource URI.
    resource_service: Arc<ResourceService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails with [`Error::MissingToken`] when no access token is configured.
    pub fn new(config: Config) -> Result<Self, Error> {
        if config.figma.access_token.is_empty() {
            return Err(Error::MissingToken);
        }

        let config = Arc::new(config);
        let client = Arc::new(FigmaClient::new(&config.figma)?);
        let resource_service = Arc::new(ResourceService::new(
            client,
            config.figma.project_id.clone(),
        ));

        Ok(Self {
            tool_router: build_tool_router::<Self>(resource_service.clone()),
            config,
            resource_service,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<Value, String> {
        let registry = ToolRegistry::new(self.resource_service.clone());
        registry.call_tool(name, arguments).await
    }

    /// `resources/list`: `{resources: [...]}`.
    pub async fn list_resources(&self) -> Result<Value, ResourceError> {
        let resources = self.resource_service.list_resources().await?;
        Ok(json!({ "resources": resources }))
    }

    /// `resources/read`: `{contents: [...]}`.
    pub async fn read_resource(&self, uri: &str) -> Result<Value, ResourceError> {
        let contents = self.resource_service.read_resource(uri).await?;
        Ok(json!({ "contents": contents }))
    }

    /// `resources/search`: `{resources: [...]}`.
    pub async fn search_resources(&self, query: &str) -> Result<Value, ResourceError> {
        let resources = self.resource_service.search_resources(query).await?;
        Ok(json!({ "resources": resources }))
    }

    /// `resources/watch`: `{uri, status}`.
    pub async fn watch_resource(&self, uri: &str) -> Result<Value, ResourceError> {
        let status = self.resource_service.watch_resource(uri).await?;
        Ok(json!(status))
    }

    /// `resources/check`: `{uri, changed, timestamp}`.
    pub async fn check_resource(&self, uri: &str) -> Result<Value, ResourceError> {
        let report = self.resource_service.check_resource(uri).await?;
        Ok(json!(report))
    }

    /// URIs currently watched, with their last observed marker.
    pub async fn watched_resources(&self) -> Value {
        json!(self.resource_service.watched_resources().await)
    }

    /// List all available resource templates (for HTTP transport).
    pub fn list_resource_templates(&self) -> Vec<Value> {
        self.resource_service
            .list_resource_templates()
            .into_iter()
            .map(|t| {
                json!({
                    "uriTemplate": t.raw.uri_template,
                    "name": t.raw.name,
                    "title": t.raw.title,
                    "description": t.raw.description,
                    "mimeType": t.raw.mime_type
                })
            })
            .collect()
    }
}

impl McpServer {
    // ========================================================================
    // MCP Protocol Results (STDIO transport)
    // ========================================================================

    /// `resources/list` as MCP resources; descriptor kind and metadata ride in `_meta`.
    async fn mcp_list_resources(&self) -> Result<ListResourcesResult, McpError> {
        let resources = self.resource_service.list_resources().await?;
        Ok(ListResourcesResult {
            resources: resources.into_iter().map(Resource::from).collect(),
            next_cursor: None,
            meta: None,
        })
    }

    /// `resources/read` as MCP text contents.
    async fn mcp_read_resource(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let contents = self.resource_service.read_resource(uri).await?;
        Ok(ReadResourceResult {
            contents: contents.into_iter().map(ResourceContents::from).collect(),
        })
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Figma MCP server. Resources are Figma files, components and variables \
                 addressed as figma:///file/{fileKey}, figma:///component/{fileKey}/{id} and \
                 figma:///variable/{fileKey}/{id}. Use figma_search_resources to find files, \
                 figma_watch_resource and figma_check_resource to detect changes, and the \
                 other figma_* tools for comments, versions, variables and images."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        self.mcp_list_resources().await
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        Ok(ListResourceTemplatesResult {
            resource_templates: self.resource_service.list_resource_templates(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.mcp_read_resource(&request.uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FigmaConfig;
    use crate::core::security::AccessToken;
    use crate::domains::resources::codes;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn server_for(mock: &MockServer) -> McpServer {
        let mut config = Config::default();
        config.figma = FigmaConfig {
            access_token: AccessToken::new("figd_test"),
            api_base_url: mock.uri(),
            ..FigmaConfig::default()
        };
        McpServer::new(config).unwrap()
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let result = McpServer::new(Config::default());
        assert!(matches!(result, Err(Error::MissingToken)));
    }

    #[tokio::test]
    async fn test_server_info() {
        let mock = MockServer::start().await;
        let server = server_for(&mock);
        assert_eq!(server.name(), "figma-mcp-server");

        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_none());
    }

    #[tokio::test]
    async fn test_list_tools() {
        let mock = MockServer::start().await;
        let tools = server_for(&mock).list_tools();
        assert_eq!(tools.len(), 14);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn test_read_resource_json() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/mock-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "name": "Mock" })),
            )
            .mount(&mock)
            .await;
        let server = server_for(&mock);

        let value = server.read_resource("figma:///file/mock-key").await.unwrap();
        let contents = value["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["uri"], "figma:///file/mock-key");
        assert_eq!(contents[0]["mimeType"], "application/json");
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": [] })))
            .mount(&mock)
            .await;
        let server = server_for(&mock);

        let value = server.list_resources().await.unwrap();
        assert_eq!(value, json!({ "resources": [] }));
    }

    #[tokio::test]
    async fn test_templates_listed() {
        let mock = MockServer::start().await;
        let templates = server_for(&mock).list_resource_templates();
        assert_eq!(templates.len(), 3);
        assert!(
            templates
                .iter()
                .any(|t| t["uriTemplate"] == "figma:///file/{fileKey}")
        );
    }

    #[tokio::test]
    async fn test_mcp_list_resources_carries_descriptor() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{
                    "key": "k1",
                    "name": "Design",
                    "lastModified": "2024-01-01T00:00:00Z",
                    "thumbnailUrl": "https://thumb/k1"
                }]
            })))
            .mount(&mock)
            .await;
        let server = server_for(&mock);

        let result = server.mcp_list_resources().await.unwrap();
        assert_eq!(result.resources.len(), 1);
        let resource = &result.resources[0];
        assert_eq!(resource.raw.uri, "figma:///file/k1");
        assert_eq!(resource.raw.mime_type.as_deref(), Some("application/json"));
        let meta = resource.raw.meta.as_ref().unwrap();
        assert_eq!(meta.get("type"), Some(&json!("file")));
        assert_eq!(
            meta.get("metadata").and_then(|m| m.get("thumbnailUrl")),
            Some(&json!("https://thumb/k1"))
        );
    }

    #[tokio::test]
    async fn test_mcp_read_resource_text_contents() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/mock-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Mock" })))
            .mount(&mock)
            .await;
        let server = server_for(&mock);

        let result = server.mcp_read_resource("figma:///file/mock-key").await.unwrap();
        assert_eq!(result.contents.len(), 1);
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                uri,
                mime_type,
                text,
                ..
            } => {
                assert_eq!(uri, "figma:///file/mock-key");
                assert_eq!(mime_type.as_deref(), Some("application/json"));
                assert_eq!(
                    serde_json::from_str::<Value>(text).unwrap(),
                    json!({ "name": "Mock" })
                );
            }
            other => panic!("expected text contents, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mcp_errors_keep_resource_codes() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock)
            .await;
        Mock::given(method("GET"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock)
            .await;
        let server = server_for(&mock);

        let err = server.mcp_read_resource("figma:///file/gone").await.unwrap_err();
        assert_eq!(err.code, ErrorCode(codes::RESOURCE_NOT_FOUND));

        let err = server.mcp_read_resource("not-a-uri").await.unwrap_err();
        assert_eq!(err.code, ErrorCode(codes::INVALID_PARAMS));

        let err = server.mcp_list_resources().await.unwrap_err();
        assert_eq!(err.code, ErrorCode(codes::RESOURCE_ACCESS_DENIED));
    }
}
