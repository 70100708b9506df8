use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::checkmk::CmkHost;
use crate::models::{HostSummary, HostsQuery};
use crate::AppState;

use super::{by_name_ignoring_case, ApiError};

/// Online hosts as the UI lists them, sorted by name
fn summarize_hosts(hosts: Vec<CmkHost>) -> Vec<HostSummary> {
    let mut summaries: Vec<HostSummary> = hosts
        .into_iter()
        .filter(|h| !h.is_offline())
        .map(|h| HostSummary {
            display_name: h
                .extensions
                .alias
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| h.id.clone()),
            name: h.id,
        })
        .collect();
    summaries.sort_by(|a, b| by_name_ignoring_case(&a.name, &b.name));
    summaries
}

/// List all hosts of a site
pub async fn list_hosts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HostsQuery>,
) -> Result<Json<Vec<HostSummary>>, ApiError> {
    let Some(site) = query.site.filter(|s| !s.is_empty()) else {
        return Err(ApiError::bad_request("site parameter required"));
    };

    let hosts = state.checkmk.list_hosts(&site).await.map_err(|e| {
        tracing::error!("Error fetching hosts for site {}: {}", site, e);
        ApiError::upstream("Failed to fetch hosts", e)
    })?;

    Ok(Json(summarize_hosts(hosts)))
}
