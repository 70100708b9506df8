use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;

use super::types::*;

/// Typed error for a failed upstream call. Carries the HTTP status (absent
/// when the request never got a response) and the raw response body so the
/// API layer can pass both through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError {
    pub status: Option<u16>,
    pub body: String,
}

impl UpstreamError {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: body.into(),
        }
    }

    fn transport(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "Checkmk API error {}: {}", status, self.body),
            None => write!(f, "Checkmk API unreachable: {}", self.body),
        }
    }
}

impl std::error::Error for UpstreamError {}

/// The subset of the Checkmk REST API this service consumes.
#[async_trait]
pub trait MonitoringApi: Send + Sync {
    /// All folders, recursively, without their host lists
    async fn list_folders(&self) -> Result<Vec<CmkFolder>>;

    async fn list_hosts(&self, site: &str) -> Result<Vec<CmkHost>>;

    async fn list_services(&self, host: &str) -> Result<Vec<CmkService>>;

    async fn list_site_connections(&self) -> Result<Vec<CmkSiteConnection>>;

    async fn create_downtime(&self, downtime: &DowntimeCreate) -> Result<()>;
}

/// Checkmk REST API client
pub struct CheckmkClient {
    base_url: String,
    auth: String,
    client: Client,
}

impl CheckmkClient {
    pub fn new(config: &Config) -> Result<Self> {
        if config.ignore_ssl {
            tracing::warn!("TLS certificate verification disabled for Checkmk API");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.ignore_ssl)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: config.api_base(),
            auth: config.auth_header(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Return the body of a successful response, or an `UpstreamError`
    /// holding status and raw body otherwise.
    async fn read_body(resp: Response) -> Result<String> {
        let status = resp.status();
        let text = resp.text().await.map_err(UpstreamError::transport)?;
        if !status.is_success() {
            return Err(UpstreamError::new(status.as_u16(), text).into());
        }
        Ok(text)
    }

    /// Helper to perform a GET against a `collections/all` endpoint
    async fn list_collection<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let resp = self
            .client
            .get(self.api_url(endpoint))
            .query(query)
            .header(AUTHORIZATION, &self.auth)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(UpstreamError::transport)?;

        let body = Self::read_body(resp).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let collection: Collection<T> = serde_json::from_str(&body)
            .map_err(|e| anyhow::anyhow!("Invalid response from {}: {}", endpoint, e))?;
        Ok(collection.value)
    }
}

#[async_trait]
impl MonitoringApi for CheckmkClient {
    async fn list_folders(&self) -> Result<Vec<CmkFolder>> {
        self.list_collection(
            "/domain-types/folder_config/collections/all",
            &[("recursive", "true"), ("show_hosts", "false")],
        )
        .await
    }

    async fn list_hosts(&self, site: &str) -> Result<Vec<CmkHost>> {
        self.list_collection(
            "/domain-types/host_config/collections/all",
            &[("site", site)],
        )
        .await
    }

    async fn list_services(&self, host: &str) -> Result<Vec<CmkService>> {
        self.list_collection(
            "/domain-types/service/collections/all",
            &[("host_name", host)],
        )
        .await
    }

    async fn list_site_connections(&self) -> Result<Vec<CmkSiteConnection>> {
        self.list_collection("/domain-types/site_connection/collections/all", &[])
            .await
    }

    async fn create_downtime(&self, downtime: &DowntimeCreate) -> Result<()> {
        let resp = self
            .client
            .post(self.api_url(downtime.downtime_type.collection_path()))
            .header(AUTHORIZATION, &self.auth)
            .header(ACCEPT, "application/json")
            .json(downtime)
            .send()
            .await
            .map_err(UpstreamError::transport)?;

        Self::read_body(resp).await?;
        Ok(())
    }
}
