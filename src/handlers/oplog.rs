use axum::{extract::State, Json};
use std::sync::Arc;

use crate::models::OperationEntry;
use crate::AppState;

use super::SuccessResponse;

/// Recent downtime operations, newest first
pub async fn list_log(State(state): State<Arc<AppState>>) -> Json<Vec<OperationEntry>> {
    Json(state.oplog.list().await)
}

pub async fn clear_log(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    state.oplog.clear().await;
    tracing::info!("Operation log cleared");
    SuccessResponse::ok()
}
