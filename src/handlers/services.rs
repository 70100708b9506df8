use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::checkmk::types::CmkService;
use crate::models::{ServiceSummary, ServicesQuery};
use crate::AppState;

use super::{by_name_ignoring_case, ApiError};

fn summarize_services(services: Vec<CmkService>) -> Vec<ServiceSummary> {
    let mut summaries: Vec<ServiceSummary> = services
        .into_iter()
        .map(|s| {
            let name = s.extensions.description.clone().unwrap_or_else(|| s.id.clone());
            let display_name = s
                .extensions
                .display_name
                .or(s.extensions.description)
                .unwrap_or(s.id);
            ServiceSummary { name, display_name }
        })
        .collect();
    summaries.sort_by(|a, b| by_name_ignoring_case(&a.name, &b.name));
    summaries
}

/// List all services of a host
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ServicesQuery>,
) -> Result<Json<Vec<ServiceSummary>>, ApiError> {
    let Some(host) = query.host.filter(|h| !h.is_empty()) else {
        return Err(ApiError::bad_request("host parameter required"));
    };

    let services = state.checkmk.list_services(&host).await.map_err(|e| {
        tracing::error!("Error fetching services for {}: {}", host, e);
        ApiError::upstream("Failed to fetch services", e)
    })?;

    Ok(Json(summarize_services(services)))
}
