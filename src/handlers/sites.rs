use axum::{extract::State, Json};
use std::sync::Arc;

use crate::checkmk::types::CmkSiteConnection;
use crate::models::Site;
use crate::AppState;

/// Turn site connections into UI sites, making sure the local site is listed
fn merge_sites(local_site: &str, connections: Vec<CmkSiteConnection>) -> Vec<Site> {
    let mut sites: Vec<Site> = connections
        .into_iter()
        .filter_map(|c| {
            let id = c
                .id
                .clone()
                .or(c.extensions.site_id)
                .or_else(|| c.title.clone())?;
            let name = c.title.or(c.id).unwrap_or_else(|| id.clone());
            Some(Site { id, name })
        })
        .collect();

    if !sites.iter().any(|s| s.id == local_site) {
        sites.insert(0, Site::local(local_site));
    }
    sites
}

/// List Checkmk site connections.
///
/// Falls back to just the configured site when the call fails, which is what
/// single-site installations without site management permissions see.
pub async fn list_sites(State(state): State<Arc<AppState>>) -> Json<Vec<Site>> {
    let local_site = &state.config.checkmk_site;
    match state.checkmk.list_site_connections().await {
        Ok(connections) => Json(merge_sites(local_site, connections)),
        Err(e) => {
            tracing::warn!(
                "Failed to list site connections, falling back to {}: {}",
                local_site,
                e
            );
            Json(vec![Site::local(local_site)])
        }
    }
}
