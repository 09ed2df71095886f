use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::broadcast::{build_snapshot, SnapshotPayload};
use crate::catalog::now_epoch;
use crate::demo;

use super::server::AppState;

/// Root page: the prebuilt frontend when one is configured, otherwise a
/// hint that the UI is hosted elsewhere and the API is still usable.
pub async fn index(State(state): State<AppState>) -> Response {
    if let Some(dir) = &state.config.web.frontend {
        let path = dir.join("index.html");
        match tokio::fs::read_to_string(&path).await {
            Ok(html) => return Html(html).into_response(),
            Err(e) => log::warn!("frontend index not readable at {}: {}", path.display(), e),
        }
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "frontend_not_packaged",
            "message": "No frontend directory is configured. Call /api/snapshot for data.",
        })),
    )
        .into_response()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub tracked: usize,
    pub clients: usize,
    pub has_api_key: bool,
    pub demo_mode: bool,
    pub last_error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health and counters", body = HealthResponse)
    ),
    tag = "status"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        tracked: state.catalog.len(),
        clients: state.hub.count(),
        has_api_key: state.config.upstream.api_key().is_some(),
        demo_mode: state.config.demo,
        last_error: state.last_error.get(),
    })
}

#[utoipa::path(
    get,
    path = "/api/snapshot",
    responses(
        (status = 200, description = "Current catalog snapshot with proximity alerts", body = SnapshotPayload)
    ),
    tag = "snapshot"
)]
pub async fn snapshot(State(state): State<AppState>) -> Json<SnapshotPayload> {
    // Polling fallback for clients without WebSocket support. Never fails:
    // it reports whatever the catalog currently knows. Without a live
    // source the simulated population is seeded and advanced on demand.
    if state.config.demo || state.config.upstream.api_key().is_none() {
        let now = now_epoch();
        demo::ensure_catalog(&state.catalog, now);
        demo::step(&state.catalog, now);
    }
    Json(build_snapshot(
        &state.catalog,
        state.config.screening.threshold_km,
    ))
}
