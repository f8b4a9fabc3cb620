//! Liveness endpoint, mounted at the root (not under `/api/v1`).

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
///
/// Pings the database so load balancers see a failing dependency.
async fn health(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    relieftrack_db::health_check(&state.pool)
        .await
        .map_err(|e| AppError::InternalError(format!("Database unreachable: {e}")))?;
    Ok(Json(json!({ "status": "ok" })))
}
