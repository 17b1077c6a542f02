//! Library tools: rendered images, components, styles and project files.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::common::FigmaTool;
use crate::domains::resources::ResourceService;
use crate::domains::tools::ToolError;

const MIN_IMAGE_SCALE: f64 = 0.01;
const MAX_IMAGE_SCALE: f64 = 4.0;

/// Output format for rendered images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpg,
    Svg,
    Pdf,
}

impl ImageFormat {
    fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }
}

/// Parameters for the image render tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetImagesParams {
    /// Key of the Figma file.
    pub file_key: String,

    /// Node ids to render.
    pub ids: Vec<String>,

    /// Image format (default png).
    #[serde(default)]
    pub format: Option<ImageFormat>,

    /// Scale factor between 0.01 and 4.
    #[serde(default)]
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetComponentParams {
    /// Key of the Figma file.
    pub file_key: String,

    /// Node id of the component.
    pub node_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TeamParams {
    /// Id of the Figma team.
    pub team_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StyleParams {
    /// Key of the published style.
    pub style_key: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProjectParams {
    /// Id of the Figma project.
    pub project_id: String,
}

pub struct GetImagesTool;

impl FigmaTool for GetImagesTool {
    const NAME: &'static str = "figma_get_images";
    const DESCRIPTION: &'static str = "Render nodes of a Figma file as images. \
         Returns a map from node id to a temporary image URL.";
    type Params = GetImagesParams;

    #[instrument(skip_all, fields(file_key = %params.file_key, count = params.ids.len()))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        if params.ids.is_empty() || params.ids.iter().any(|id| id.trim().is_empty()) {
            return Err(ToolError::invalid_arguments("ids must be non-empty node ids"));
        }
        if let Some(scale) = params.scale {
            if !(MIN_IMAGE_SCALE..=MAX_IMAGE_SCALE).contains(&scale) {
                return Err(ToolError::invalid_arguments(format!(
                    "scale must be between {MIN_IMAGE_SCALE} and {MAX_IMAGE_SCALE}, got {scale}"
                )));
            }
        }

        Ok(service
            .client()
            .get_images(
                &params.file_key,
                &params.ids.join(","),
                params.format.map(ImageFormat::as_str),
                params.scale,
            )
            .await?)
    }
}

pub struct GetComponentTool;

impl FigmaTool for GetComponentTool {
    const NAME: &'static str = "figma_get_component";
    const DESCRIPTION: &'static str = "Get a component of a Figma file by node id.";
    type Params = GetComponentParams;

    #[instrument(skip_all, fields(file_key = %params.file_key, node_id = %params.node_id))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        Ok(service
            .client()
            .get_component(&params.file_key, &params.node_id)
            .await?)
    }
}

pub struct GetTeamComponentsTool;

impl FigmaTool for GetTeamComponentsTool {
    const NAME: &'static str = "figma_get_team_components";
    const DESCRIPTION: &'static str = "List the published components of a Figma team library.";
    type Params = TeamParams;

    #[instrument(skip_all, fields(team_id = %params.team_id))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        Ok(service.client().get_team_components(&params.team_id).await?)
    }
}

pub struct GetStyleTool;

impl FigmaTool for GetStyleTool {
    const NAME: &'static str = "figma_get_style";
    const DESCRIPTION: &'static str = "Get metadata of a published Figma style.";
    type Params = StyleParams;

    #[instrument(skip_all, fields(style_key = %params.style_key))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        Ok(service.client().get_style(&params.style_key).await?)
    }
}

pub struct GetProjectFilesTool;

impl FigmaTool for GetProjectFilesTool {
    const NAME: &'static str = "figma_get_project_files";
    const DESCRIPTION: &'static str = "List the files of a Figma project.";
    type Params = ProjectParams;

    #[instrument(skip_all, fields(project_id = %params.project_id))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        Ok(service
            .client()
            .get_project_files(&params.project_id)
            .await?)
    }
}
