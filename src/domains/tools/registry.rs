//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry lists tool metadata for every transport and dispatches HTTP
//! tool calls by name.

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use super::definitions::{
    CheckResourceTool, FigmaTool, GetCommentsTool, GetComponentTool, GetImagesTool,
    GetProjectFilesTool, GetStyleTool, GetTeamComponentsTool, GetVariableCollectionsTool,
    GetVariablesTool, GetVersionsTool, ModifyVariablesTool, PostCommentTool, SearchResourcesTool,
    WatchResourceTool,
};
use crate::domains::resources::ResourceService;

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    service: Arc<ResourceService>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(service: Arc<ResourceService>) -> Self {
        Self { service }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            SearchResourcesTool::NAME,
            WatchResourceTool::NAME,
            CheckResourceTool::NAME,
            GetCommentsTool::NAME,
            PostCommentTool::NAME,
            GetVersionsTool::NAME,
            GetVariablesTool::NAME,
            GetVariableCollectionsTool::NAME,
            ModifyVariablesTool::NAME,
            GetImagesTool::NAME,
            GetComponentTool::NAME,
            GetTeamComponentsTool::NAME,
            GetStyleTool::NAME,
            GetProjectFilesTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            SearchResourcesTool::to_tool(),
            WatchResourceTool::to_tool(),
            CheckResourceTool::to_tool(),
            GetCommentsTool::to_tool(),
            PostCommentTool::to_tool(),
            GetVersionsTool::to_tool(),
            GetVariablesTool::to_tool(),
            GetVariableCollectionsTool::to_tool(),
            ModifyVariablesTool::to_tool(),
            GetImagesTool::to_tool(),
            GetComponentTool::to_tool(),
            GetTeamComponentsTool::to_tool(),
            GetStyleTool::to_tool(),
            GetProjectFilesTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// `Err` means the call never reached the tool (unknown name or
    /// undecodable arguments). Tool failures come back as `Ok` results
    /// flagged with `isError`.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let service = self.service.as_ref();
        match name {
            SearchResourcesTool::NAME => SearchResourcesTool::http_handler(service, arguments).await,
            WatchResourceTool::NAME => WatchResourceTool::http_handler(service, arguments).await,
            CheckResourceTool::NAME => CheckResourceTool::http_handler(service, arguments).await,
            GetCommentsTool::NAME => GetCommentsTool::http_handler(service, arguments).await,
            PostCommentTool::NAME => PostCommentTool::http_handler(service, arguments).await,
            GetVersionsTool::NAME => GetVersionsTool::http_handler(service, arguments).await,
            GetVariablesTool::NAME => GetVariablesTool::http_handler(service, arguments).await,
            GetVariableCollectionsTool::NAME => {
                GetVariableCollectionsTool::http_handler(service, arguments).await
            }
            ModifyVariablesTool::NAME => ModifyVariablesTool::http_handler(service, arguments).await,
            GetImagesTool::NAME => GetImagesTool::http_handler(service, arguments).await,
            GetComponentTool::NAME => GetComponentTool::http_handler(service, arguments).await,
            GetTeamComponentsTool::NAME => {
                GetTeamComponentsTool::http_handler(service, arguments).await
            }
            GetStyleTool::NAME => GetStyleTool::http_handler(service, arguments).await,
            GetProjectFilesTool::NAME => {
                GetProjectFilesTool::http_handler(service, arguments).await
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(format!("Unknown tool: {}", name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::definitions::test_support::offline_service;
    use super::*;

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(offline_service());
        let names = registry.tool_names();
        assert_eq!(names.len(), 14);
        assert!(names.contains(&"figma_search_resources"));
        assert!(names.contains(&"figma_get_comments"));
        assert!(names.contains(&"figma_post_comment"));
        assert!(names.contains(&"figma_get_versions"));
        assert!(names.contains(&"figma_get_variables"));
        assert!(names.contains(&"figma_get_variable_collections"));
        assert!(names.contains(&"figma_get_team_components"));
        assert!(names.contains(&"figma_get_style"));
        assert!(names.contains(&"figma_get_project_files"));
    }

    #[test]
    fn test_tool_metadata_has_schema() {
        let tools = ToolRegistry::get_all_tools();
        assert_eq!(tools.len(), 14);
        for tool in tools {
            assert!(tool.description.is_some());
            assert_eq!(
                tool.input_schema.get("type").and_then(|v| v.as_str()),
                Some("object")
            );
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(offline_service());
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(result.is_err());
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_rejects_bad_arguments() {
        let registry = ToolRegistry::new(offline_service());
        let result = registry
            .call_tool("figma_get_style", serde_json::json!({ "style": 1 }))
            .await;
        assert!(result.is_err());
    }
}
