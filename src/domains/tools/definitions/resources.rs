//! Resource tools: search, watch and check.
//!
//! MCP has no protocol methods for these operations, so over STDIO they are
//! offered as tools. The HTTP transport also serves them as the JSON-RPC
//! methods `resources/search`, `resources/watch` and `resources/check`.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::common::FigmaTool;
use crate::domains::resources::ResourceService;
use crate::domains::tools::ToolError;

/// Parameters for the search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchResourcesParams {
    /// Free-text query matched against file names.
    pub query: String,
}

/// Parameters for the watch and check tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ResourceUriParams {
    /// Resource URI, e.g. `figma:///file/<fileKey>`.
    pub uri: String,
}

pub struct SearchResourcesTool;

impl FigmaTool for SearchResourcesTool {
    const NAME: &'static str = "figma_search_resources";
    const DESCRIPTION: &'static str =
        "Search Figma files by name. Returns resource descriptors with their figma:/// URIs.";
    type Params = SearchResourcesParams;

    #[instrument(skip_all, fields(query = %params.query))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        info!("Search tool called");
        let resources = service.search_resources(&params.query).await?;
        Ok(json!({ "resources": resources }))
    }
}

pub struct WatchResourceTool;

impl FigmaTool for WatchResourceTool {
    const NAME: &'static str = "figma_watch_resource";
    const DESCRIPTION: &'static str = "Start watching a Figma resource URI. \
         Records its current version so later checks can report changes.";
    type Params = ResourceUriParams;

    #[instrument(skip_all, fields(uri = %params.uri))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        let status = service.watch_resource(&params.uri).await?;
        Ok(json!(status))
    }
}

pub struct CheckResourceTool;

impl FigmaTool for CheckResourceTool {
    const NAME: &'static str = "figma_check_resource";
    const DESCRIPTION: &'static str = "Check whether a watched Figma resource changed \
         since the previous watch or check.";
    type Params = ResourceUriParams;

    #[instrument(skip_all, fields(uri = %params.uri))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        let report = service.check_resource(&params.uri).await?;
        Ok(json!(report))
    }
}
