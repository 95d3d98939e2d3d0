//! HTTP API server.
//!
//! Exposes federated search to the chat layer as a small JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/search` | Run a federated search |
//! | `GET`  | `/sources` | List the record stores a search queries |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # `POST /search`
//!
//! ```json
//! { "query": "Alex Miller", "include_diagnostics": false }
//! ```
//!
//! responds with
//!
//! ```json
//! { "context": "No exact match, but found similar names: ...", "diagnostics": null, "people_found": true }
//! ```
//!
//! `include_diagnostics` defaults to `true`. The chat layer should pass
//! `context` to the language model and show `diagnostics` to operators only.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shepherd_core::backend::Backend;
use shepherd_core::search::Orchestrator;
use shepherd_core::sources::SourceKind;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::client::HttpBackend;
use crate::config::{Config, Credentials};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    orchestrator: Orchestrator,
}

/// Starts the HTTP server against the configured record-store API.
///
/// Credentials are read from the environment before binding; the server
/// refuses to start without them.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let credentials = Credentials::from_env(&config.backend)?;
    let backend = HttpBackend::new(&config.backend, credentials)?;
    run_server_with_backend(config, Arc::new(backend)).await
}

/// Starts the HTTP server with an explicit [`Backend`].
///
/// Used by tests and by embedders that bring their own record store.
pub async fn run_server_with_backend(
    config: &Config,
    backend: Arc<dyn Backend>,
) -> anyhow::Result<()> {
    let state = AppState {
        orchestrator: Orchestrator::new(backend, config.search.clone()),
    };

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "shepherd server listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", post(handle_search))
        .route("/sources", get(handle_sources))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /sources ============

#[derive(Serialize)]
struct SourceInfo {
    kind: SourceKind,
    name: String,
    endpoint: String,
}

#[derive(Serialize)]
struct SourcesResponse {
    sources: Vec<SourceInfo>,
}

async fn handle_sources(State(state): State<AppState>) -> Json<SourcesResponse> {
    let sources = state
        .orchestrator
        .sources()
        .iter()
        .map(|s| SourceInfo {
            kind: s.kind(),
            name: s.name().to_string(),
            endpoint: s.endpoint().to_string(),
        })
        .collect();
    Json(SourcesResponse { sources })
}

// ============ POST /search ============

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default = "default_include_diagnostics")]
    include_diagnostics: bool,
}

fn default_include_diagnostics() -> bool {
    true
}

#[derive(Serialize)]
struct SearchResponse {
    context: String,
    diagnostics: Option<String>,
    people_found: bool,
}

async fn handle_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    if req.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let outcome = state.orchestrator.search(&req.query).await;
    Ok(Json(SearchResponse {
        context: outcome.context,
        diagnostics: req.include_diagnostics.then_some(outcome.diagnostics),
        people_found: outcome.people_found,
    }))
}
