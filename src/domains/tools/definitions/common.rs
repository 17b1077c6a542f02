//! Shared tool plumbing.
//!
//! Every tool is a unit struct implementing [`FigmaTool`]. The trait supplies
//! the rmcp route (STDIO) and the JSON dispatch entry (HTTP) from the tool's
//! name, description, parameter type and `execute` body.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::domains::resources::ResourceService;
use crate::domains::tools::ToolError;

/// A tool backed by the Figma API.
pub trait FigmaTool: Sized + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Arguments accepted by the tool.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Run the tool against the shared resource service.
    fn execute(
        service: &ResourceService,
        params: Self::Params,
    ) -> impl Future<Output = Result<Value, ToolError>> + Send;

    /// Tool metadata for `tools/list`.
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO transport.
    fn create_route<S>(service: Arc<ResourceService>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let service = service.clone();
            async move {
                let params = parse_params::<Self::Params>(args)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(into_call_result(
                    Self::NAME,
                    Self::execute(&service, params).await,
                ))
            }
            .boxed()
        })
    }

    /// HTTP handler: same semantics, JSON in and out.
    fn http_handler(
        service: &ResourceService,
        arguments: Value,
    ) -> impl Future<Output = Result<Value, String>> + Send {
        async move {
            let args = match arguments {
                Value::Object(map) => map,
                Value::Null => Map::new(),
                other => return Err(format!("Invalid arguments: expected an object, got {other}")),
            };
            let params = parse_params::<Self::Params>(args).map_err(|e| e.to_string())?;
            let result = into_call_result(Self::NAME, Self::execute(service, params).await);
            Ok(json!({
                "content": result.content,
                "isError": result.is_error.unwrap_or(false)
            }))
        }
    }
}

/// Decode tool arguments into the tool's parameter struct.
pub fn parse_params<P: DeserializeOwned>(args: Map<String, Value>) -> Result<P, ToolError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Turn an execution outcome into an MCP tool result.
///
/// Failures are results with `isError: true`, not protocol errors.
pub fn into_call_result(tool: &str, outcome: Result<Value, ToolError>) -> CallToolResult {
    match outcome {
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(e) => {
            warn!("Tool {} failed: {}", tool, e);
            CallToolResult::error(vec![Content::text(e.to_string())])
        }
    }
}
