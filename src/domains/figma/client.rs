//! Authenticated client for the Figma REST API.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::error::FigmaError;
use super::models::{FileDocument, FileListResponse};
use crate::core::config::FigmaConfig;
use crate::core::security::AccessToken;

/// Header carrying the personal access token on every request.
pub const TOKEN_HEADER: &str = "X-Figma-Token";

/// HTTP client for the Figma API.
///
/// Performs no retries. Network failures surface as
/// [`FigmaError::TemporarilyUnavailable`] and the caller decides.
#[derive(Clone)]
pub struct FigmaClient {
    http: Client,
    base_url: String,
    token: AccessToken,
}

impl std::fmt::Debug for FigmaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FigmaClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token)
            .finish()
    }
}

impl FigmaClient {
    /// Creates a client from the Figma section of the configuration.
    pub fn new(config: &FigmaConfig) -> Result<Self, FigmaError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("figma-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FigmaError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.access_token.clone(),
        })
    }

    /// The API base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a request against `path` (relative to the base URL) and returns
    /// the JSON body.
    ///
    /// An empty 2xx body (e.g. from `DELETE`) decodes as `null`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, FigmaError> {
        self.send(method, path, body).await
    }

    /// Sends a request and decodes the response bytes straight into `T`.
    #[instrument(skip(self, body))]
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, FigmaError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Figma request {} {}", method, path);

        let mut request = self
            .http
            .request(method, &url)
            .header(TOKEN_HEADER, self.token.expose());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FigmaError::from_transport(path, e))?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            warn!("Figma resource not found: {}", path);
            return Err(FigmaError::not_found(path));
        }

        if status == StatusCode::FORBIDDEN {
            warn!(
                "Figma denied access to {} (token {})",
                path,
                self.token.redacted()
            );
            return Err(FigmaError::access_denied(path));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = upstream_message(&text).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
            warn!("Figma API error {} on {}: {}", status.as_u16(), path, message);
            return Err(FigmaError::upstream(status.as_u16(), message));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FigmaError::from_transport(path, e))?;
        let decoded = if bytes.is_empty() {
            T::deserialize(Value::Null)
        } else {
            serde_json::from_slice(&bytes)
        };
        decoded.map_err(|e| FigmaError::invalid_response(format!("{path}: {e}")))
    }

    /// `GET` a path and return the raw JSON body.
    pub async fn get(&self, path: &str) -> Result<Value, FigmaError> {
        self.request(Method::GET, path, None).await
    }

    /// `GET` a path and decode it into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FigmaError> {
        self.send(Method::GET, path, None).await
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Lists files, scoped to a project when one is given.
    pub async fn list_files(&self, project_id: Option<&str>) -> Result<FileListResponse, FigmaError> {
        match project_id {
            Some(project) => {
                self.get_json(&format!("/projects/{}/files", segment(project)?))
                    .await
            }
            None => self.get_json("/files").await,
        }
    }

    /// Searches files by free text. The query is form-encoded.
    pub async fn search_files(&self, query: &str) -> Result<FileListResponse, FigmaError> {
        let encoded = serde_urlencoded::to_string([("query", query)])
            .map_err(|e| FigmaError::invalid_argument(e.to_string()))?;
        self.get_json(&format!("/search?{encoded}")).await
    }

    /// Full document of a file.
    pub async fn get_file(&self, file_key: &str) -> Result<Value, FigmaError> {
        self.get(&format!("/files/{}", segment(file_key)?)).await
    }

    /// File document decoded just far enough to read its version marker.
    pub async fn get_file_document(&self, file_key: &str) -> Result<FileDocument, FigmaError> {
        self.get_json(&format!("/files/{}", segment(file_key)?))
            .await
    }

    /// A component inside a file.
    pub async fn get_file_component(
        &self,
        file_key: &str,
        component_id: &str,
    ) -> Result<Value, FigmaError> {
        self.get(&format!(
            "/files/{}/components/{}",
            segment(file_key)?,
            segment(component_id)?
        ))
        .await
    }

    /// A variable inside a file.
    pub async fn get_file_variable(
        &self,
        file_key: &str,
        variable_id: &str,
    ) -> Result<Value, FigmaError> {
        self.get(&format!(
            "/files/{}/variables/{}",
            segment(file_key)?,
            segment(variable_id)?
        ))
        .await
    }

    // ========================================================================
    // Comments and versions
    // ========================================================================

    pub async fn get_comments(&self, file_key: &str) -> Result<Value, FigmaError> {
        self.get(&format!("/files/{}/comments", segment(file_key)?))
            .await
    }

    pub async fn post_comment(&self, file_key: &str, body: &Value) -> Result<Value, FigmaError> {
        self.request(
            Method::POST,
            &format!("/files/{}/comments", segment(file_key)?),
            Some(body),
        )
        .await
    }

    pub async fn get_versions(&self, file_key: &str) -> Result<Value, FigmaError> {
        self.get(&format!("/files/{}/versions", segment(file_key)?))
            .await
    }

    // ========================================================================
    // Variables
    // ========================================================================

    pub async fn get_variables(&self, file_key: &str) -> Result<Value, FigmaError> {
        self.get(&format!("/files/{}/variables", segment(file_key)?))
            .await
    }

    pub async fn get_variable_collections(&self, file_key: &str) -> Result<Value, FigmaError> {
        self.get(&format!(
            "/files/{}/variable_collections",
            segment(file_key)?
        ))
        .await
    }

    /// Creates, updates or deletes a variable or variable collection.
    ///
    /// `collection` is the path segment (`variables` or
    /// `variable_collections`); `id` is required for `PUT` and `DELETE`.
    pub async fn modify_variables(
        &self,
        method: Method,
        file_key: &str,
        collection: &str,
        id: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, FigmaError> {
        let mut path = format!("/files/{}/{}", segment(file_key)?, segment(collection)?);
        if let Some(id) = id {
            path.push('/');
            path.push_str(segment(id)?);
        }
        self.request(method, &path, body).await
    }

    // ========================================================================
    // Images, components, styles, projects
    // ========================================================================

    /// Renders nodes of a file. `ids` is a comma separated node id list.
    pub async fn get_images(
        &self,
        file_key: &str,
        ids: &str,
        format: Option<&str>,
        scale: Option<f64>,
    ) -> Result<Value, FigmaError> {
        let mut params: Vec<(&str, String)> = vec![("ids", ids.to_string())];
        if let Some(format) = format {
            params.push(("format", format.to_string()));
        }
        if let Some(scale) = scale {
            params.push(("scale", scale.to_string()));
        }
        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| FigmaError::invalid_argument(e.to_string()))?;
        self.get(&format!("/images/{}?{query}", segment(file_key)?))
            .await
    }

    pub async fn get_component(&self, file_key: &str, node_id: &str) -> Result<Value, FigmaError> {
        self.get(&format!(
            "/components/{}/{}",
            segment(file_key)?,
            segment(node_id)?
        ))
        .await
    }

    pub async fn get_team_components(&self, team_id: &str) -> Result<Value, FigmaError> {
        self.get(&format!("/teams/{}/components", segment(team_id)?))
            .await
    }

    pub async fn get_style(&self, style_key: &str) -> Result<Value, FigmaError> {
        self.get(&format!("/styles/{}", segment(style_key)?)).await
    }

    pub async fn get_project_files(&self, project_id: &str) -> Result<Value, FigmaError> {
        self.get(&format!("/projects/{}/files", segment(project_id)?))
            .await
    }
}

/// Validates a value used as a single path segment.
///
/// Keys and ids coming from tool arguments are free text; anything that
/// would change the path structure is rejected before a request is built.
fn segment(value: &str) -> Result<&str, FigmaError> {
    if value.is_empty() {
        return Err(FigmaError::invalid_argument("empty path segment"));
    }
    if value
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '%' | '\\') || c.is_whitespace() || c.is_control())
    {
        return Err(FigmaError::invalid_argument(format!(
            "'{value}' is not a valid identifier"
        )));
    }
    Ok(value)
}

/// Extracts the error text Figma puts in error bodies (`err` or `message`).
fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("err")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
