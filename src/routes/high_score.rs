use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Best score recorded so far
pub async fn get_high_score(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, StatusCode> {
    let high_score = state.high_scores.get_high_score().await.map_err(|e| {
        tracing::error!("Failed to read high score: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(json!({ "high_score": high_score })))
}
