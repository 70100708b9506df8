pub mod client;
pub mod types;

pub use client::{CheckmkClient, MonitoringApi, UpstreamError};
pub use types::{CmkFolder, CmkHost, DowntimeCreate, DowntimeKind};

/// Convert a Checkmk folder id into a slash-delimited folder path.
///
/// Checkmk encodes folder paths with `~` separators (`~vmware~esxi`), and the
/// root folder is a lone `~`. The result always starts with a single `/`.
pub fn folder_path_from_id(id: &str) -> String {
    let path = format!("/{}", id.strip_prefix('~').unwrap_or(id).replace('~', "/"));
    match path.strip_prefix("//") {
        Some(rest) => format!("/{}", rest),
        None => path,
    }
}
