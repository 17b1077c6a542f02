//! Resource reader: dispatches a resource URI to the matching endpoint.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use super::error::ResourceError;
use super::uri::{ResourceAddress, ResourceKind};
use crate::domains::figma::{FigmaClient, FigmaError};

/// MIME type of every payload produced by the reader.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Text content returned for a read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPayload {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

impl ContentPayload {
    /// Pretty-prints a JSON body as the payload text.
    pub fn json(uri: impl Into<String>, body: &Value) -> Result<Self, ResourceError> {
        let text = serde_json::to_string_pretty(body)
            .map_err(|e| FigmaError::invalid_response(e.to_string()))?;
        Ok(Self {
            uri: uri.into(),
            mime_type: JSON_MIME_TYPE.to_string(),
            text,
        })
    }
}

impl From<ContentPayload> for rmcp::model::ResourceContents {
    fn from(payload: ContentPayload) -> Self {
        rmcp::model::ResourceContents::TextResourceContents {
            uri: payload.uri,
            mime_type: Some(payload.mime_type),
            text: payload.text,
            meta: None,
        }
    }
}

/// Reads files, components and variables.
pub struct ResourceReader {
    client: Arc<FigmaClient>,
}

impl ResourceReader {
    pub fn new(client: Arc<FigmaClient>) -> Self {
        Self { client }
    }

    /// Reads a resource. Always yields exactly one payload.
    #[instrument(skip(self))]
    pub async fn read(&self, uri: &str) -> Result<Vec<ContentPayload>, ResourceError> {
        let address = ResourceAddress::parse(uri)?;
        info!(
            kind = %address.kind,
            file_key = %address.file_key,
            resource_id = ?address.resource_id,
            "Reading Figma resource"
        );

        let body = match address.kind {
            ResourceKind::File => self.client.get_file(&address.file_key).await?,
            ResourceKind::Component => {
                let id = address.required_resource_id()?;
                self.client.get_file_component(&address.file_key, id).await?
            }
            ResourceKind::Variable => {
                let id = address.required_resource_id()?;
                self.client.get_file_variable(&address.file_key, id).await?
            }
        };

        Ok(vec![ContentPayload::json(uri, &body)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FigmaConfig;
    use crate::core::security::AccessToken;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn reader_for(server: &MockServer) -> ResourceReader {
        let config = FigmaConfig {
            access_token: AccessToken::new("figd_test"),
            api_base_url: server.uri(),
            ..FigmaConfig::default()
        };
        ResourceReader::new(Arc::new(FigmaClient::new(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_read_file_pretty_prints_body() {
        let server = MockServer::start().await;
        let body = json!({
            "name": "Mock File",
            "lastModified": "2024-05-01T10:00:00Z",
            "document": { "id": "0:0", "children": [] }
        });
        Mock::given(method("GET"))
            .and(path("/files/mock-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let contents = reader_for(&server).read("figma:///file/mock-key").await.unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].uri, "figma:///file/mock-key");
        assert_eq!(contents[0].mime_type, "application/json");
        assert_eq!(contents[0].text, serde_json::to_string_pretty(&body).unwrap());
    }

    #[tokio::test]
    async fn test_read_component_uses_component_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/F/components/C1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "key": "C1" })))
            .expect(1)
            .mount(&server)
            .await;

        let contents = reader_for(&server)
            .read("figma:///component/F/C1")
            .await
            .unwrap();
        assert_eq!(contents.len(), 1);
        assert!(contents[0].text.contains("C1"));
    }

    #[tokio::test]
    async fn test_read_variable_uses_variable_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/F/variables/V1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "V1" })))
            .expect(1)
            .mount(&server)
            .await;

        let contents = reader_for(&server)
            .read("figma:///variable/F/V1")
            .await
            .unwrap();
        assert!(contents[0].text.contains("V1"));
    }

    #[tokio::test]
    async fn test_read_component_without_id_fails_before_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let reader = reader_for(&server);
        let err = reader.read("figma:///component/F").await.unwrap_err();
        assert!(matches!(
            err,
            ResourceError::MissingResourceId {
                kind: ResourceKind::Component,
                ..
            }
        ));

        let err = reader.read("figma:///variable/F").await.unwrap_err();
        assert!(matches!(
            err,
            ResourceError::MissingResourceId {
                kind: ResourceKind::Variable,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_read_invalid_uri_fails_before_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = reader_for(&server).read("invalid-uri").await.unwrap_err();
        assert!(matches!(err, ResourceError::InvalidUri(_)));
    }

    #[tokio::test]
    async fn test_read_maps_404_and_403() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/F/components/secret"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let reader = reader_for(&server);
        assert!(matches!(
            reader.read("figma:///file/gone").await,
            Err(ResourceError::Upstream(FigmaError::NotFound(_)))
        ));
        assert!(matches!(
            reader.read("figma:///component/F/secret").await,
            Err(ResourceError::Upstream(FigmaError::AccessDenied(_)))
        ));
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload = ContentPayload::json("figma:///file/a", &json!({})).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["mimeType"], "application/json");
    }
}
