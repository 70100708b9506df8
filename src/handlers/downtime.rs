use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::downtime;
use crate::models::{CascadeMode, DowntimeRequest, DowntimeResponse, OperationEntry};
use crate::AppState;

use super::{created, ApiError};

/// Set a host or service downtime, optionally cascading to child hosts
pub async fn create_downtime(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DowntimeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DowntimeResponse>), ApiError> {
    let Json(req) = payload?;
    let downtime = downtime::validate(&req).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let mode = downtime.effective_mode();

    let report = downtime::schedule(state.checkmk.as_ref(), &state.config.checkmk_site, &downtime)
        .await
        .map_err(|e| {
            tracing::error!("Error setting downtime on {}: {}", downtime.host, e);
            ApiError::upstream("Failed to set downtime", e)
        })?;

    let response = DowntimeResponse {
        success: true,
        hosts_affected: report.succeeded.len(),
        failed: (mode != CascadeMode::None).then_some(report.failed.len()),
    };

    state
        .oplog
        .record(OperationEntry {
            id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            parent_host: downtime.host,
            mode,
            downtime_type: downtime.kind,
            comment: downtime.comment,
            start_time: downtime.start_time,
            end_time: downtime.end_time,
            succeeded: report.succeeded,
            failed: report.failed,
        })
        .await;

    Ok(created(response))
}
