//! Variable tools: read and modify variables and variable collections.

use reqwest::Method;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use super::common::FigmaTool;
use super::files::FileKeyParams;
use crate::domains::resources::ResourceService;
use crate::domains::tools::ToolError;

/// What a modification applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VariableTarget {
    Variable,
    Collection,
}

impl VariableTarget {
    /// Upstream path segment under `/files/{key}/`.
    fn path_segment(self) -> &'static str {
        match self {
            Self::Variable => "variables",
            Self::Collection => "variable_collections",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VariableAction {
    Create,
    Update,
    Delete,
}

/// Parameters for the modify tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ModifyVariablesParams {
    /// Key of the Figma file.
    pub file_key: String,

    /// `variable` or `collection`.
    pub target: VariableTarget,

    /// `create`, `update` or `delete`.
    pub action: VariableAction,

    /// Id of the variable or collection. Required for update and delete.
    #[serde(default)]
    pub id: Option<String>,

    /// Request body forwarded as-is. Required for create and update.
    #[serde(default)]
    pub body: Option<Value>,
}

impl ModifyVariablesParams {
    /// Map the action to an HTTP method, checking the id/body combination.
    fn method(&self) -> Result<Method, ToolError> {
        match (self.action, self.id.is_some(), self.body.is_some()) {
            (VariableAction::Create, false, true) => Ok(Method::POST),
            (VariableAction::Create, true, _) => Err(ToolError::invalid_arguments(
                "id must not be set when creating",
            )),
            (VariableAction::Update, true, true) => Ok(Method::PUT),
            (VariableAction::Delete, true, _) => Ok(Method::DELETE),
            (VariableAction::Update | VariableAction::Delete, false, _) => Err(
                ToolError::invalid_arguments("id is required for update and delete"),
            ),
            (_, _, false) => Err(ToolError::invalid_arguments(
                "body is required for create and update",
            )),
        }
    }
}

pub struct GetVariablesTool;

impl FigmaTool for GetVariablesTool {
    const NAME: &'static str = "figma_get_variables";
    const DESCRIPTION: &'static str = "List the variables defined in a Figma file.";
    type Params = FileKeyParams;

    #[instrument(skip_all, fields(file_key = %params.file_key))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        Ok(service.client().get_variables(&params.file_key).await?)
    }
}

pub struct GetVariableCollectionsTool;

impl FigmaTool for GetVariableCollectionsTool {
    const NAME: &'static str = "figma_get_variable_collections";
    const DESCRIPTION: &'static str = "List the variable collections defined in a Figma file.";
    type Params = FileKeyParams;

    #[instrument(skip_all, fields(file_key = %params.file_key))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        Ok(service
            .client()
            .get_variable_collections(&params.file_key)
            .await?)
    }
}

pub struct ModifyVariablesTool;

impl FigmaTool for ModifyVariablesTool {
    const NAME: &'static str = "figma_modify_variables";
    const DESCRIPTION: &'static str = "Create, update or delete a variable or variable \
         collection in a Figma file.";
    type Params = ModifyVariablesParams;

    #[instrument(skip_all, fields(file_key = %params.file_key, action = ?params.action))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        let method = params.method()?;
        info!("Modifying {:?}", params.target);
        Ok(service
            .client()
            .modify_variables(
                method,
                &params.file_key,
                params.target.path_segment(),
                params.id.as_deref(),
                params.body.as_ref(),
            )
            .await?)
    }
}
