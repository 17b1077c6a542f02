//! HTTP transport implementation.
//!
//! JSON-RPC over POST on the rpc path, plus an SSE channel: `GET` on the
//! events path opens a stream whose first `endpoint` event names the URL to
//! POST messages to; responses to those messages are pushed on the stream.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::{Stream, StreamExt, stream};
use http::{Method, header};
use rmcp::ServerHandler;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::resources::ResourceError;

/// Protocol version announced on `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Responses buffered per SSE session before senders wait.
const SESSION_CHANNEL_CAPACITY: usize = 32;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Error response for a failed resource operation.
    ///
    /// The code comes from the error kind; `data.retryable` tells the client
    /// whether retrying can help.
    pub fn resource_error(id: Option<Value>, err: &ResourceError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: err.code(),
                message: err.to_string(),
                data: Some(json!({ "retryable": err.is_retryable() })),
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }
}

type Sessions = Arc<RwLock<HashMap<String, mpsc::Sender<JsonRpcResponse>>>>;

/// Removes its session from the map when the SSE stream is dropped.
struct SessionGuard {
    sessions: Sessions,
    session_id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let session_id = std::mem::take(&mut self.session_id);
        if let Ok(mut sessions) = self.sessions.try_write() {
            sessions.remove(&session_id);
            info!("SSE session closed: {}", session_id);
            return;
        }
        // Contended: finish the removal on the runtime.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let sessions = Arc::clone(&self.sessions);
            handle.spawn(async move {
                sessions.write().await.remove(&session_id);
                info!("SSE session closed: {}", session_id);
            });
        } else {
            warn!("SSE session {} left open: no runtime to remove it", session_id);
        }
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    server: McpServer,
    /// Open SSE sessions, keyed by session id.
    sessions: Sessions,
    rpc_path: String,
    /// Path clients POST session messages to.
    events_path: String,
    next_session: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(server: McpServer, config: &HttpConfig) -> Self {
        Self {
            server,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            rpc_path: config.rpc_path.clone(),
            events_path: config.events_path.clone(),
            next_session: Arc::new(AtomicU64::new(1)),
        }
    }

    fn new_session_id(&self) -> String {
        let seq = self.next_session.fetch_add(1, Ordering::Relaxed);
        format!("{:x}-{:x}", chrono::Utc::now().timestamp_micros(), seq)
    }
}

/// Query string of a session message.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum router for this transport.
    pub fn router(&self, server: McpServer) -> Router {
        let state = AppState::new(server, &self.config);

        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route(
                &self.config.events_path,
                get(handle_events).post(handle_session_message),
            )
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Events:   GET {} (SSE)", self.config.events_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "rpc": state.rpc_path,
            "events": state.events_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "watched": state.server.watched_resources().await
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", &request.method);
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, request).await;

    (StatusCode::OK, Json(response))
}

/// Open an SSE session.
async fn handle_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let session_id = state.new_session_id();
    let (tx, rx) = mpsc::channel::<JsonRpcResponse>(SESSION_CHANNEL_CAPACITY);
    state.sessions.write().await.insert(session_id.clone(), tx);
    info!("SSE session opened: {}", session_id);

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?sessionId={}", state.events_path, session_id));

    let guard = SessionGuard {
        sessions: Arc::clone(&state.sessions),
        session_id,
    };
    let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        rx.recv().await.map(|response| (response, (rx, guard)))
    })
    .map(|response| Event::default().event("message").json_data(response));

    let events = stream::once(async move { Ok::<_, axum::Error>(endpoint) }).chain(messages);

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle a message posted to an SSE session.
///
/// The response is delivered on the session stream; the POST itself only
/// acknowledges receipt.
async fn handle_session_message(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    Json(request): Json<JsonRpcRequest>,
) -> StatusCode {
    info!(
        "Received session message: {} (session {})",
        request.method, query.session_id
    );
    let sender = state.sessions.read().await.get(&query.session_id).cloned();
    let Some(sender) = sender else {
        warn!("Message for unknown session: {}", query.session_id);
        return StatusCode::NOT_FOUND;
    };

    let is_notification = request.method.starts_with("notifications/");
    let response = process_request(&state, request).await;
    if is_notification {
        return StatusCode::ACCEPTED;
    }

    if sender.send(response).await.is_err() {
        debug!("SSE stream closed, dropping session");
        state.sessions.write().await.remove(&query.session_id);
        return StatusCode::GONE;
    }

    StatusCode::ACCEPTED
}

/// Process a JSON-RPC request and return the response.
async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request),
        "tools/list" => handle_tools_list(state, request),
        "tools/call" => handle_tools_call(state, request).await,
        "resources/list" => handle_resources_list(state, request).await,
        "resources/templates/list" => handle_resources_templates_list(state, request),
        "resources/read" => handle_resources_read(state, request).await,
        "resources/search" => handle_resources_search(state, request).await,
        "resources/watch" => handle_resources_watch(state, request).await,
        "resources/check" => handle_resources_check(state, request).await,

        // Notifications (no response needed for stateless HTTP)
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            JsonRpcResponse::success(request.id, Value::Null)
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Extract a required string parameter, or build the invalid-params response.
fn string_param(request: &JsonRpcRequest, key: &str) -> Result<String, JsonRpcResponse> {
    let Some(params) = request.params.as_ref() else {
        return Err(JsonRpcResponse::invalid_params(
            request.id.clone(),
            "Missing params",
        ));
    };
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            JsonRpcResponse::invalid_params(request.id.clone(), format!("Missing parameter: {key}"))
        })
}

fn resource_response(
    id: Option<Value>,
    outcome: Result<Value, ResourceError>,
) -> JsonRpcResponse {
    match outcome {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(e) => {
            warn!("Resource request failed: {}", e);
            JsonRpcResponse::resource_error(id, &e)
        }
    }
}

fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let result = json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {},
            "resources": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": state.server.get_info().instructions
    });

    JsonRpcResponse::success(request.id, result)
}

fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");
    JsonRpcResponse::success(request.id, json!({ "tools": state.server.list_tools() }))
}

async fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/call request");

    let name = match string_param(&request, "name") {
        Ok(name) => name,
        Err(response) => return response,
    };

    let arguments = request
        .params
        .as_ref()
        .and_then(|p| p.get("arguments"))
        .cloned()
        .unwrap_or_else(|| json!({}));

    match state.server.call_tool(&name, arguments).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::invalid_params(request.id, e),
    }
}

async fn handle_resources_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing resources/list request");
    resource_response(request.id, state.server.list_resources().await)
}

fn handle_resources_templates_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing resources/templates/list request");
    JsonRpcResponse::success(
        request.id,
        json!({ "resourceTemplates": state.server.list_resource_templates() }),
    )
}

async fn handle_resources_read(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let uri = match string_param(&request, "uri") {
        Ok(uri) => uri,
        Err(response) => return response,
    };
    info!("Processing resources/read request: {}", uri);
    resource_response(request.id, state.server.read_resource(&uri).await)
}

async fn handle_resources_search(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let query = match string_param(&request, "query") {
        Ok(query) => query,
        Err(response) => return response,
    };
    info!("Processing resources/search request: {}", query);
    resource_response(request.id, state.server.search_resources(&query).await)
}

async fn handle_resources_watch(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let uri = match string_param(&request, "uri") {
        Ok(uri) => uri,
        Err(response) => return response,
    };
    info!("Processing resources/watch request: {}", uri);
    resource_response(request.id, state.server.watch_resource(&uri).await)
}

async fn handle_resources_check(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let uri = match string_param(&request, "uri") {
        Ok(uri) => uri,
        Err(response) => return response,
    };
    info!("Processing resources/check request: {}", uri);
    resource_response(request.id, state.server.check_resource(&uri).await)
}
