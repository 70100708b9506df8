//! Downtime scheduling: request validation, payload construction and the
//! parent/child cascade.

use anyhow::Result;
use futures::future::join_all;
use serde_json::Value;

use crate::checkmk::{DowntimeCreate, DowntimeKind, MonitoringApi, UpstreamError};
use crate::models::{CascadeMode, DowntimeRequest, HostFailure};
use crate::topology;

/// Comment used when the request carries none
pub const DEFAULT_COMMENT: &str = "Downtime set via Downtime Manager";

/// A request that failed validation before any upstream call was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

/// A downtime request with every required field present and checked
#[derive(Debug, Clone, PartialEq)]
pub struct Downtime {
    pub host: String,
    pub kind: DowntimeKind,
    pub services: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub comment: Option<String>,
    pub mode: CascadeMode,
    pub site: Option<String>,
}

fn required(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(String::from)
}

/// Check a raw `POST /api/downtime` body
pub fn validate(req: &DowntimeRequest) -> Result<Downtime, ValidationError> {
    let (Some(host), Some(kind), Some(start_time), Some(end_time)) = (
        required(&req.host),
        required(&req.downtime_type),
        required(&req.start_time),
        required(&req.end_time),
    ) else {
        return Err(ValidationError(
            "host, type, startTime, endTime are required".to_string(),
        ));
    };

    let kind = match kind.as_str() {
        "host" => DowntimeKind::Host,
        "service" => DowntimeKind::Service,
        other => {
            return Err(ValidationError(format!(
                "type must be 'host' or 'service', got '{}'",
                other
            )))
        }
    };

    let services = req.services.clone().unwrap_or_default();
    if kind == DowntimeKind::Service && services.is_empty() {
        return Err(ValidationError(
            "services array required for service downtime".to_string(),
        ));
    }

    let mode = match req.include_children.as_deref() {
        None | Some("") => CascadeMode::None,
        Some(value) => CascadeMode::parse(value).ok_or_else(|| {
            ValidationError(format!(
                "includeChildren must be one of none, direct, recursive, got '{}'",
                value
            ))
        })?,
    };

    Ok(Downtime {
        host,
        kind,
        services,
        start_time,
        end_time,
        comment: required(&req.comment),
        mode,
        site: required(&req.site),
    })
}

impl Downtime {
    /// Cascade mode actually applied. Service downtimes never cascade.
    pub fn effective_mode(&self) -> CascadeMode {
        match self.kind {
            DowntimeKind::Host => self.mode,
            DowntimeKind::Service => CascadeMode::None,
        }
    }

    /// Upstream body for putting `host` into this downtime
    pub fn payload_for(&self, host: &str) -> DowntimeCreate {
        DowntimeCreate {
            downtime_type: self.kind,
            host_name: host.to_string(),
            service_descriptions: match self.kind {
                DowntimeKind::Host => None,
                DowntimeKind::Service => Some(self.services.clone()),
            },
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            comment: self
                .comment
                .clone()
                .unwrap_or_else(|| DEFAULT_COMMENT.to_string()),
        }
    }
}

/// Per-host outcome of a downtime request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<HostFailure>,
}

/// Best-effort human readable reason for a failed downtime call.
///
/// Uses `detail`, then `title` of a JSON problem body, else the raw body.
pub fn failure_reason(err: &anyhow::Error) -> String {
    let Some(upstream) = err.downcast_ref::<UpstreamError>() else {
        return err.to_string();
    };
    if upstream.body.trim().is_empty() {
        return upstream.to_string();
    }

    serde_json::from_str::<Value>(&upstream.body)
        .ok()
        .and_then(|v| {
            ["detail", "title"]
                .iter()
                .filter_map(|key| v.get(*key))
                .find(|field| !field.is_null())
                .map(|field| match field.as_str() {
                    Some(s) => s.to_string(),
                    None => field.to_string(),
                })
        })
        .unwrap_or_else(|| upstream.body.clone())
}

/// Issue one downtime per host concurrently. Failures are collected, never
/// propagated, and do not stop the other calls.
pub async fn apply_to_hosts(
    api: &dyn MonitoringApi,
    downtime: &Downtime,
    hosts: &[String],
) -> CascadeReport {
    let calls = hosts.iter().map(|host| {
        let payload = downtime.payload_for(host);
        async move { api.create_downtime(&payload).await }
    });
    let outcomes = join_all(calls).await;

    let mut report = CascadeReport::default();
    for (host, outcome) in hosts.iter().zip(outcomes) {
        match outcome {
            Ok(()) => report.succeeded.push(host.clone()),
            Err(e) => report.failed.push(HostFailure {
                host: host.clone(),
                reason: failure_reason(&e),
            }),
        }
    }
    report
}

/// Schedule `downtime`, cascading to descendants when requested.
///
/// Without a cascade the single upstream failure is returned as an error.
/// With one, graph construction failures are fatal but per-host failures are
/// only reported.
pub async fn schedule(
    api: &dyn MonitoringApi,
    default_site: &str,
    downtime: &Downtime,
) -> Result<CascadeReport> {
    let mode = downtime.effective_mode();
    if mode == CascadeMode::None {
        api.create_downtime(&downtime.payload_for(&downtime.host))
            .await?;
        tracing::info!(host = %downtime.host, kind = ?downtime.kind, "Downtime scheduled");
        return Ok(CascadeReport {
            succeeded: vec![downtime.host.clone()],
            failed: Vec::new(),
        });
    }

    let site = downtime.site.as_deref().unwrap_or(default_site);
    let children = topology::build_children_map(api, site).await?;
    let descendants =
        topology::descendants_of(&downtime.host, &children, mode == CascadeMode::Recursive);

    let mut hosts = Vec::with_capacity(descendants.len() + 1);
    hosts.push(downtime.host.clone());
    hosts.extend(descendants);
    tracing::info!(
        host = %downtime.host,
        ?mode,
        site,
        targets = hosts.len(),
        "Scheduling cascading downtime"
    );

    let report = apply_to_hosts(api, downtime, &hosts).await;
    if !report.failed.is_empty() {
        tracing::warn!(
            "{} downtime request(s) failed: {:?}",
            report.failed.len(),
            report.failed
        );
    }
    Ok(report)
}
