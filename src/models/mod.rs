use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checkmk::DowntimeKind;

// ========== Inventory ==========

/// Site is a Checkmk site connection offered to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
}

impl Site {
    /// The site this server is configured against
    pub fn local(site: &str) -> Self {
        Self {
            id: site.to_string(),
            name: site.to_string(),
        }
    }
}

/// HostSummary is a host as listed in the UI host picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSummary {
    pub name: String,
    pub display_name: String,
}

/// ServiceSummary is a service as listed in the UI service picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub name: String,
    pub display_name: String,
}

/// Query parameters for `GET /api/hosts`
#[derive(Debug, Deserialize)]
pub struct HostsQuery {
    pub site: Option<String>,
}

/// Query parameters for `GET /api/services`
#[derive(Debug, Deserialize)]
pub struct ServicesQuery {
    pub host: Option<String>,
}

// ========== Downtime ==========

/// How far a host downtime spreads down the parent/child topology
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadeMode {
    #[default]
    None,
    Direct,
    Recursive,
}

impl CascadeMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "direct" => Some(Self::Direct),
            "recursive" => Some(Self::Recursive),
            _ => None,
        }
    }
}

/// DowntimeRequest is the raw body of `POST /api/downtime`.
///
/// Everything is optional here so that missing fields are reported with a
/// readable message instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DowntimeRequest {
    pub host: Option<String>,
    #[serde(rename = "type")]
    pub downtime_type: Option<String>,
    pub services: Option<Vec<String>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub comment: Option<String>,
    pub include_children: Option<String>,
    pub site: Option<String>,
}

/// DowntimeResponse is returned with 201 Created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DowntimeResponse {
    pub success: bool,
    pub hosts_affected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
}

/// HostFailure records why one host of a cascade was not put into downtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostFailure {
    pub host: String,
    pub reason: String,
}

// ========== Operation log ==========

/// OperationEntry is one downtime request as kept in the operation log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub parent_host: String,
    pub mode: CascadeMode,
    #[serde(rename = "type")]
    pub downtime_type: DowntimeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub succeeded: Vec<String>,
    pub failed: Vec<HostFailure>,
}

/// Build metadata for `GET /api/build`
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_mode_parse() {
        assert_eq!(CascadeMode::parse("none"), Some(CascadeMode::None));
        assert_eq!(CascadeMode::parse("direct"), Some(CascadeMode::Direct));
        assert_eq!(CascadeMode::parse("recursive"), Some(CascadeMode::Recursive));
        assert_eq!(CascadeMode::parse("Recursive"), None);
    }

    #[test]
    fn test_downtime_request_camel_case() {
        let req: DowntimeRequest = serde_json::from_str(
            r#"{"host":"web01","type":"host","startTime":"s","endTime":"e","includeChildren":"direct"}"#,
        )
        .unwrap();
        assert_eq!(req.host.as_deref(), Some("web01"));
        assert_eq!(req.downtime_type.as_deref(), Some("host"));
        assert_eq!(req.include_children.as_deref(), Some("direct"));
        assert!(req.services.is_none());
    }

    #[test]
    fn test_downtime_response_shape() {
        let single = serde_json::to_value(DowntimeResponse {
            success: true,
            hosts_affected: 1,
            failed: None,
        })
        .unwrap();
        assert_eq!(single, serde_json::json!({"success": true, "hostsAffected": 1}));

        let cascade = serde_json::to_value(DowntimeResponse {
            success: true,
            hosts_affected: 2,
            failed: Some(1),
        })
        .unwrap();
        assert_eq!(cascade["failed"], 1);
    }
}
