//! REST endpoints for missions and health checks.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::mission::{MissionService, Mode};

/// Shared state for API handlers
pub struct AppState {
    pub missions: Arc<MissionService>,
}

/// Every route as (method, path), for the startup banner
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/api/health-check"),
    ("GET", "/api/missions/:mission_id/verify"),
    ("GET", "/api/missions/:mission_id/requirements"),
];

/// Build API router
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health-check", get(health_check))
        .route("/api/missions/:mission_id/verify", get(verify_mission))
        .route(
            "/api/missions/:mission_id/requirements",
            get(get_mission_requirements),
        )
}

/// GET /api/health-check
async fn health_check() -> &'static str {
    "OK"
}

/// GET /api/missions/:mission_id/verify - Run the mission and return its report
async fn verify_mission(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<String>,
) -> Response {
    run_mission(state, Mode::Verify, mission_id).await
}

/// GET /api/missions/:mission_id/requirements - List the mission's tests
async fn get_mission_requirements(
    State(state): State<Arc<AppState>>,
    Path(mission_id): Path<String>,
) -> Response {
    run_mission(state, Mode::Requirements, mission_id).await
}

async fn run_mission(state: Arc<AppState>, mode: Mode, mission_id: String) -> Response {
    if mission_id.trim().is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }

    // Spawned so the engine run completes even if the client goes away
    let missions = state.missions.clone();
    let task = tokio::spawn(async move { missions.run(mode, &mission_id).await });

    match task.await {
        Ok(Ok(report)) => Json(report).into_response(),
        Ok(Err(e)) => internal_error(e.to_string()),
        Err(e) => internal_error(format!("Mission task failed: {}", e)),
    }
}

fn internal_error(message: String) -> Response {
    log::error!("Something went wrong: {}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}
