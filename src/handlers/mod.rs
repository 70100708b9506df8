pub mod downtime;
pub mod hosts;
pub mod oplog;
pub mod services;
pub mod sites;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::cmp::Ordering;

use crate::checkmk::UpstreamError;
use crate::models::BuildInfo;

/// Error response - `{"error": "message"}`, plus the upstream body when there is one
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// API error type
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
            detail: None,
        }
    }

    /// Wrap a failed upstream operation: reuse the Checkmk status code (500 if
    /// there was none) and pass its raw body through as `detail`.
    pub fn upstream(msg: impl Into<String>, err: anyhow::Error) -> Self {
        match err.downcast_ref::<UpstreamError>() {
            Some(up) => Self {
                status: up
                    .status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message: msg.into(),
                detail: Some(up.body.clone()),
            },
            None => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: msg.into(),
                detail: Some(err.to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Order of the UI pick lists: case-insensitive, exact name breaks ties
pub fn by_name_ignoring_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Response for operations with nothing else to report
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Response helper: return 201 Created with JSON body
pub fn created<T: Serialize>(item: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(item))
}

/// Healthcheck endpoint, returns 200 OK with status
pub async fn healthcheck() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "downtime-manager",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Crate version of the running server
pub async fn build_info() -> Json<BuildInfo> {
    Json(BuildInfo::current())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use axum::Router;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::oplog::OperationLog;
    use crate::testing::{test_config, FakeMonitoring};
    use crate::AppState;

    pub fn app(fake: FakeMonitoring) -> (Router, Arc<FakeMonitoring>, OperationLog) {
        let fake = Arc::new(fake);
        let oplog = OperationLog::default();
        let state = Arc::new(AppState {
            config: test_config(),
            checkmk: fake.clone(),
            oplog: oplog.clone(),
        });
        (crate::router::build(state, "/nonexistent-frontend"), fake, oplog)
    }

    /// Send a request and return status plus parsed JSON body
    pub async fn send(
        router: Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let resp = router.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[test]
    fn test_upstream_error_keeps_status_and_body() {
        let err = ApiError::upstream("Failed", UpstreamError::new(409, "conflict").into());
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.detail.as_deref(), Some("conflict"));

        let err = ApiError::upstream(
            "Failed",
            UpstreamError {
                status: None,
                body: "timed out".to_string(),
            }
            .into(),
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_plain_errors_are_internal() {
        let err = ApiError::upstream("Failed", anyhow::anyhow!("boom"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed");
        assert_eq!(err.detail.as_deref(), Some("boom"));
    }

    #[test]
    fn test_name_order_ignores_case() {
        let mut names = vec!["df", "Memory", "CPU load", "uptime", "memory"];
        names.sort_by(|a, b| by_name_ignoring_case(a, b));
        assert_eq!(names, vec!["CPU load", "df", "Memory", "memory", "uptime"]);
    }

    #[tokio::test]
    async fn test_healthcheck_and_build() {
        let (router, _, _) = app(FakeMonitoring::default());
        let (status, body) = send(router.clone(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(router, Method::GET, "/api/build", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
