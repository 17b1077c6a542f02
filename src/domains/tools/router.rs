//! Tool Router - builds the rmcp ToolRouter for the STDIO transport.
//!
//! Each tool knows how to create its own route; this module only lists them.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{
    CheckResourceTool, FigmaTool, GetCommentsTool, GetComponentTool, GetImagesTool,
    GetProjectFilesTool, GetStyleTool, GetTeamComponentsTool, GetVariableCollectionsTool,
    GetVariablesTool, GetVersionsTool, ModifyVariablesTool, PostCommentTool, SearchResourcesTool,
    WatchResourceTool,
};
use crate::domains::resources::ResourceService;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(service: Arc<ResourceService>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(SearchResourcesTool::create_route(service.clone()))
        .with_route(WatchResourceTool::create_route(service.clone()))
        .with_route(CheckResourceTool::create_route(service.clone()))
        .with_route(GetCommentsTool::create_route(service.clone()))
        .with_route(PostCommentTool::create_route(service.clone()))
        .with_route(GetVersionsTool::create_route(service.clone()))
        .with_route(GetVariablesTool::create_route(service.clone()))
        .with_route(GetVariableCollectionsTool::create_route(service.clone()))
        .with_route(ModifyVariablesTool::create_route(service.clone()))
        .with_route(GetImagesTool::create_route(service.clone()))
        .with_route(GetComponentTool::create_route(service.clone()))
        .with_route(GetTeamComponentsTool::create_route(service.clone()))
        .with_route(GetStyleTool::create_route(service.clone()))
        .with_route(GetProjectFilesTool::create_route(service))
}
