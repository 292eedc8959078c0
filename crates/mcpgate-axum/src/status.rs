//! Health, status and fallback routes.

use crate::state::McpState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use mcpgate_server::{HealthReport, StatusReport};

/// `GET /health`: liveness plus session and connection counts.
pub async fn handle_health(State(state): State<McpState>) -> Json<HealthReport> {
    Json(state.server.health_report())
}

/// `GET /status`: server identity, capability names and uptime.
pub async fn handle_status(State(state): State<McpState>) -> Json<StatusReport> {
    Json(state.server.status_report())
}

/// Fallback for unmatched routes.
pub async fn handle_not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
