use serde::{Deserialize, Serialize};

// --- Checkmk REST API types ---

/// Envelope returned by every `collections/all` endpoint
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentAttributes {
    #[serde(default)]
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CmkFolder {
    /// Tilde-encoded folder path, e.g. `~vmware~esxi`
    pub id: String,
    #[serde(default)]
    pub extensions: FolderExtensions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderExtensions {
    #[serde(default)]
    pub attributes: ParentAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CmkHost {
    pub id: String,
    #[serde(default)]
    pub extensions: HostExtensions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostExtensions {
    #[serde(default)]
    pub is_offline: bool,
    #[serde(default)]
    pub folder: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub attributes: ParentAttributes,
}

impl CmkHost {
    pub fn is_offline(&self) -> bool {
        self.extensions.is_offline
    }

    pub fn explicit_parents(&self) -> &[String] {
        &self.extensions.attributes.parents
    }

    pub fn folder(&self) -> &str {
        &self.extensions.folder
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CmkService {
    pub id: String,
    #[serde(default)]
    pub extensions: ServiceExtensions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceExtensions {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CmkSiteConnection {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub extensions: SiteExtensions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteExtensions {
    #[serde(default)]
    pub site_id: Option<String>,
}

/// Which downtime collection a request is posted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DowntimeKind {
    Host,
    Service,
}

impl DowntimeKind {
    pub fn collection_path(self) -> &'static str {
        match self {
            DowntimeKind::Host => "/domain-types/downtime/collections/host",
            DowntimeKind::Service => "/domain-types/downtime/collections/service",
        }
    }
}

/// Body of `POST /domain-types/downtime/collections/{host|service}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DowntimeCreate {
    pub downtime_type: DowntimeKind,
    pub host_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_descriptions: Option<Vec<String>>,
    pub start_time: String,
    pub end_time: String,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_payload_tolerates_missing_extensions() {
        let json = r#"{"value": [
            {"id": "web01", "extensions": {"folder": "/dc1", "is_offline": true,
                "attributes": {"parents": ["sw01"]}}},
            {"id": "bare"}
        ]}"#;
        let hosts: Collection<CmkHost> = serde_json::from_str(json).unwrap();
        assert_eq!(hosts.value.len(), 2);
        assert!(hosts.value[0].is_offline());
        assert_eq!(hosts.value[0].explicit_parents(), ["sw01".to_string()]);
        assert_eq!(hosts.value[0].folder(), "/dc1");
        assert!(!hosts.value[1].is_offline());
        assert!(hosts.value[1].explicit_parents().is_empty());
        assert_eq!(hosts.value[1].folder(), "");
    }

    #[test]
    fn test_service_downtime_body() {
        let body = DowntimeCreate {
            downtime_type: DowntimeKind::Service,
            host_name: "web01".to_string(),
            service_descriptions: Some(vec!["CPU load".to_string()]),
            start_time: "2026-01-01T00:00:00Z".to_string(),
            end_time: "2026-01-01T02:00:00Z".to_string(),
            comment: "patching".to_string(),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["downtime_type"], "service");
        assert_eq!(v["service_descriptions"][0], "CPU load");
    }

    #[test]
    fn test_host_downtime_body_omits_services() {
        let body = DowntimeCreate {
            downtime_type: DowntimeKind::Host,
            host_name: "web01".to_string(),
            service_descriptions: None,
            start_time: "a".to_string(),
            end_time: "b".to_string(),
            comment: "c".to_string(),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["downtime_type"], "host");
        assert!(v.get("service_descriptions").is_none());
    }
}
