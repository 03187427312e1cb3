//! Axum routes for the mind map service.

use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::editor::{ChildRequest, ColorOutcome, Editor, UiState};
use crate::export::{ExportError, ExportFormat};
use crate::import::{self, ImportError};
use crate::store::{GraphStore, InMemoryGraphStore};
use crate::types::{Color, Graph, NodeId, Position, Slide};
use crate::MINDMAP_SCHEMA_VERSION;

use super::middleware::{record_export, record_import};
use super::state::ServiceState;

/// Type alias for the service state with the in-memory store.
pub type AppState = ServiceState<InMemoryGraphStore>;

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Request/Response Types
// ============================================================================

/// The current map and presentation state.
#[derive(Debug, Clone, Serialize)]
pub struct GraphResponse {
    /// Nodes and edges.
    pub graph: Graph,
    /// Node that can never be deleted.
    pub anchor: NodeId,
    /// Store revision.
    pub revision: u64,
    /// Content fingerprint.
    pub fingerprint: String,
    /// Selection, open editors and color picker.
    pub ui: UiState,
}

/// Outcome of a mutation.
///
/// A request that could not apply is not an error: `applied` is false and
/// nothing changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    /// Whether the map changed.
    pub applied: bool,
    /// Node created by the request, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    /// True when a color picker is now open.
    #[serde(default)]
    pub awaiting_color: bool,
    /// Store revision after the request.
    pub revision: u64,
}

/// Request to add a child.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateChildRequest {
    /// Color for the child, overriding inheritance.
    #[serde(default)]
    pub color: Option<Color>,
    /// Ask for the parent's color first when it has none.
    #[serde(default)]
    pub prompt: bool,
}

/// Request carrying a color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorRequest {
    /// The color.
    pub color: Color,
}

/// Request to connect two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectRequest {
    /// Edge source.
    pub source: NodeId,
    /// Edge target.
    pub target: NodeId,
}

/// Request carrying edited text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    /// The text as typed.
    pub text: String,
}

/// Slides for presentation mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidesResponse {
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Document schema version.
    pub schema_version: String,
    /// Node count.
    pub nodes: usize,
    /// Edge count.
    pub edges: usize,
    /// Store revision.
    pub revision: u64,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    /// Always `alive`.
    pub status: String,
}

/// Structured error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

fn api_error(status: StatusCode, response: ErrorResponse) -> ApiError {
    tracing::warn!(code = %response.code, error = %response.error, "Request error");
    (status, Json(response))
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        let (status, code) = match &err {
            ExportError::UnknownFormat(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_FORMAT"),
            ExportError::FormatUnavailable(_) => (StatusCode::NOT_IMPLEMENTED, "FORMAT_UNAVAILABLE"),
            ExportError::Serialize(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED"),
        };
        let mut response = ErrorResponse::new(code, err.to_string());
        if matches!(err, ExportError::UnknownFormat(_)) {
            let supported: Vec<_> = ExportFormat::ALL.iter().map(|f| f.extension()).collect();
            response = response.with_details(format!("supported: {}", supported.join(", ")));
        }
        api_error(status, response)
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        let code = match &err {
            ImportError::Parse(_) => "INVALID_JSON",
            ImportError::Invalid(_) => "INVALID_MINDMAP",
            ImportError::UnsupportedFile(_) => "UNSUPPORTED_FILE",
            ImportError::InvalidLink(_) => "INVALID_LINK",
            ImportError::Fetch(_) => "FETCH_FAILED",
        };
        api_error(StatusCode::BAD_REQUEST, ErrorResponse::new(code, err.to_string()))
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

// Built under the same guard as the mutation it reports.
fn mutation(
    editor: &Editor<InMemoryGraphStore>,
    applied: bool,
    node: Option<NodeId>,
) -> Json<MutationResponse> {
    Json(MutationResponse {
        applied,
        node,
        awaiting_color: editor.ui().pending_color.is_some(),
        revision: editor.store().revision(),
    })
}

/// Current map, fingerprint and UI state.
async fn graph_handler(State(state): State<Arc<AppState>>) -> Result<Json<GraphResponse>, ApiError> {
    let editor = state.editor.lock();
    let snapshot = editor.snapshot();
    let fingerprint = editor.fingerprint().map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("FINGERPRINT_FAILED", e.to_string()),
        )
    })?;

    Ok(Json(GraphResponse {
        graph: snapshot.graph.clone(),
        anchor: snapshot.anchor.clone(),
        revision: editor.store().revision(),
        fingerprint: fingerprint.to_string(),
        ui: editor.ui().clone(),
    }))
}

/// Add a root; a color picker opens for it.
async fn create_root_handler(State(state): State<Arc<AppState>>) -> Json<MutationResponse> {
    let mut editor = state.editor.lock();
    let node = editor.create_root_node();
    mutation(&editor, node.is_some(), node)
}

/// Add a child under a node.
async fn create_child_handler(
    State(state): State<Arc<AppState>>,
    Path(parent): Path<String>,
    body: Option<Json<CreateChildRequest>>,
) -> Json<MutationResponse> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let parent = NodeId::from(parent);

    let mut editor = state.editor.lock();
    let child = if request.prompt {
        match editor.request_child_with_color_prompt(&parent) {
            Some(ChildRequest::Created(child)) => Some(child),
            Some(ChildRequest::AwaitingColor) | None => None,
        }
    } else {
        editor.create_child_node(&parent, request.color.as_ref())
    };
    mutation(&editor, child.is_some(), child)
}

/// Confirm the open color picker.
async fn confirm_color_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ColorRequest>,
) -> Json<MutationResponse> {
    let mut editor = state.editor.lock();
    let outcome = editor.confirm_color(request.color);
    let node = match &outcome {
        Some(ColorOutcome::ChildCreated { child, .. }) => Some(child.clone()),
        Some(ColorOutcome::Recolored(id)) => Some(id.clone()),
        None => None,
    };
    mutation(&editor, outcome.is_some(), node)
}

/// Close the open color picker.
async fn cancel_color_handler(State(state): State<Arc<AppState>>) -> Json<MutationResponse> {
    let mut editor = state.editor.lock();
    let closed = editor.cancel_color();
    mutation(&editor, closed, None)
}

/// Connect two nodes.
async fn connect_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConnectRequest>,
) -> Json<MutationResponse> {
    let mut editor = state.editor.lock();
    let applied = editor.connect(&request.source, &request.target);
    mutation(&editor, applied, None)
}

/// Recolor a node.
async fn recolor_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<ColorRequest>,
) -> Json<MutationResponse> {
    let mut editor = state.editor.lock();
    let applied = editor.recolor(&NodeId::from(id), request.color);
    mutation(&editor, applied, None)
}

/// Save a label.
async fn label_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<TextRequest>,
) -> Json<MutationResponse> {
    let mut editor = state.editor.lock();
    let applied = editor.rename_label(&NodeId::from(id), &request.text);
    mutation(&editor, applied, None)
}

/// Save a description.
async fn description_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<TextRequest>,
) -> Json<MutationResponse> {
    let mut editor = state.editor.lock();
    let applied = editor.set_description(&NodeId::from(id), &request.text);
    mutation(&editor, applied, None)
}

/// Store where a drag ended.
async fn position_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(position): Json<Position>,
) -> Json<MutationResponse> {
    let mut editor = state.editor.lock();
    let applied = editor.move_node(&NodeId::from(id), position);
    mutation(&editor, applied, None)
}

/// Delete a node and its edges.
async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<MutationResponse> {
    let mut editor = state.editor.lock();
    let applied = editor.delete_node(&NodeId::from(id));
    mutation(&editor, applied, None)
}

/// Select a node.
async fn select_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<MutationResponse> {
    let mut editor = state.editor.lock();
    let applied = editor.select(&NodeId::from(id));
    mutation(&editor, applied, None)
}

/// Slides for the current map.
async fn slides_handler(State(state): State<Arc<AppState>>) -> Json<SlidesResponse> {
    Json(SlidesResponse {
        slides: state.editor.lock().slides(),
    })
}

/// Download the map in a format.
async fn export_handler(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = format.parse()?;
    let file = state.editor.lock().export(format)?;
    record_export(format.extension(), file.bytes.len());

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, file.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

/// Replace the map with an uploaded JSON document.
async fn import_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<MutationResponse>, ApiError> {
    let graph = import::parse_graph(&body).map_err(|e| {
        record_import(false, 0, 0);
        e
    })?;
    let (nodes, edges) = (graph.nodes.len(), graph.edges.len());

    let mut editor = state.editor.lock();
    let result = editor.import_snapshot(graph);
    record_import(result.is_ok(), nodes, edges);
    result?;
    Ok(mutation(&editor, true, None))
}

/// Health check endpoint (detailed).
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let editor = state.editor.lock();
    let snapshot = editor.snapshot();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: MINDMAP_SCHEMA_VERSION.to_string(),
        nodes: snapshot.graph.nodes.len(),
        edges: snapshot.graph.edges.len(),
        revision: editor.store().revision(),
    })
}

/// Liveness probe endpoint.
///
/// Returns 200 if the process is alive.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the mind map service.
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Map
        .route("/api/graph", get(graph_handler))
        .route("/api/slides", get(slides_handler))
        // Structure
        .route("/api/nodes", post(create_root_handler))
        .route("/api/nodes/:id", delete(delete_handler))
        .route("/api/nodes/:id/children", post(create_child_handler))
        .route("/api/edges", post(connect_handler))
        // Node fields
        .route("/api/nodes/:id/color", put(recolor_handler))
        .route("/api/nodes/:id/label", put(label_handler))
        .route("/api/nodes/:id/description", put(description_handler))
        .route("/api/nodes/:id/position", put(position_handler))
        .route("/api/nodes/:id/select", post(select_handler))
        // Color picker
        .route("/api/color/confirm", post(confirm_color_handler))
        .route("/api/color/cancel", post(cancel_color_handler))
        // Import / export
        .route("/api/export/:format", get(export_handler))
        .route("/api/import", post(import_handler))
        // Health checks
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .with_state(state)
}
