//! File collaboration tools: comments and version history.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{info, instrument};

use super::common::FigmaTool;
use crate::domains::resources::ResourceService;
use crate::domains::tools::ToolError;

/// Parameters for tools addressing a single file.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileKeyParams {
    /// Key of the Figma file (the segment after `/file/` in a Figma URL).
    pub file_key: String,
}

/// Parameters for posting a comment.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PostCommentParams {
    /// Key of the Figma file.
    pub file_key: String,

    /// Comment text.
    pub message: String,

    /// Optional position of the comment (node id and offset, or canvas point).
    #[serde(default)]
    pub client_meta: Option<Value>,

    /// Reply to this root comment instead of starting a thread.
    #[serde(default)]
    pub comment_id: Option<String>,
}

pub struct GetCommentsTool;

impl FigmaTool for GetCommentsTool {
    const NAME: &'static str = "figma_get_comments";
    const DESCRIPTION: &'static str = "List the comments on a Figma file.";
    type Params = FileKeyParams;

    #[instrument(skip_all, fields(file_key = %params.file_key))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        Ok(service.client().get_comments(&params.file_key).await?)
    }
}

pub struct PostCommentTool;

impl FigmaTool for PostCommentTool {
    const NAME: &'static str = "figma_post_comment";
    const DESCRIPTION: &'static str = "Post a comment on a Figma file, optionally pinned to a \
         position or as a reply to an existing comment.";
    type Params = PostCommentParams;

    #[instrument(skip_all, fields(file_key = %params.file_key))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        if params.message.trim().is_empty() {
            return Err(ToolError::invalid_arguments("message must not be empty"));
        }

        let mut body = Map::new();
        body.insert("message".into(), json!(params.message));
        if let Some(meta) = params.client_meta {
            body.insert("client_meta".into(), meta);
        }
        if let Some(comment_id) = params.comment_id {
            body.insert("comment_id".into(), json!(comment_id));
        }

        info!("Posting comment");
        Ok(service
            .client()
            .post_comment(&params.file_key, &Value::Object(body))
            .await?)
    }
}

pub struct GetVersionsTool;

impl FigmaTool for GetVersionsTool {
    const NAME: &'static str = "figma_get_versions";
    const DESCRIPTION: &'static str = "List the version history of a Figma file.";
    type Params = FileKeyParams;

    #[instrument(skip_all, fields(file_key = %params.file_key))]
    async fn execute(service: &ResourceService, params: Self::Params) -> Result<Value, ToolError> {
        Ok(service.client().get_versions(&params.file_key).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::common::test_support::service_for;
    use super::*;
    use crate::domains::figma::FigmaError;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    #[tokio::test]
    async fn test_post_comment_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files/k1/comments"))
            .and(body_json(json!({
                "message": "Looks good",
                "client_meta": { "x": 10, "y": 20 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "c1" })))
            .expect(1)
            .mount(&server)
            .await;
        let service = service_for(&server);

        let value = PostCommentTool::execute(
            &service,
            PostCommentParams {
                file_key: "k1".into(),
                message: "Looks good".into(),
                client_meta: Some(json!({ "x": 10, "y": 20 })),
                comment_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(value["id"], "c1");
    }

    #[tokio::test]
    async fn test_post_empty_comment_is_rejected() {
        let server = MockServer::start().await;
        let service = service_for(&server);
        let result = PostCommentTool::execute(
            &service,
            PostCommentParams {
                file_key: "k1".into(),
                message: "   ".into(),
                client_meta: None,
                comment_id: None,
            },
        )
        .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_get_versions_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/missing/versions"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let service = service_for(&server);

        let result = GetVersionsTool::execute(
            &service,
            FileKeyParams {
                file_key: "missing".into(),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(ToolError::Figma(FigmaError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_get_comments_passthrough() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/k1/comments"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "comments": [{ "id": "1" }] })),
            )
            .mount(&server)
            .await;
        let service = service_for(&server);

        let value = GetCommentsTool::execute(
            &service,
            FileKeyParams {
                file_key: "k1".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(value["comments"][0]["id"], "1");
    }
}
