use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::json;
use tracing::Instrument;

use nef_common::QodSessionRequest;

use crate::state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

fn error_response(
    status: StatusCode,
    kind: &str,
    stage: Option<&str>,
    message: String,
    request_id: &str,
) -> Response {
    let body = json!({
        "error": {
            "message": message,
            "type": kind,
            "stage": stage,
            "request_id": request_id,
        }
    });
    (status, Json(body)).into_response()
}

/// Rejects requests the decoder accepts but the pipeline cannot act on.
fn validate(req: &QodSessionRequest) -> Option<String> {
    if req.device.network_access_identifier.is_empty() {
        return Some("device.networkAccessIdentifier must not be empty".to_string());
    }
    if !req.application_server.has_address() {
        return Some("applicationServer needs an ipv4Address or ipv6Address".to_string());
    }
    if let Some(r) = req.unordered_port_ranges().first() {
        return Some(format!(
            "devicePorts range {}-{} has from greater than to",
            r.from, r.to
        ));
    }
    None
}

pub async fn create_qod_session(State(st): State<AppState>, body: Bytes) -> Response {
    let request_id = format!("req_{}", uuid::Uuid::new_v4());

    let req: QodSessionRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(request_id=%request_id, error=%e, "malformed qod session body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "malformed_inbound_body",
                None,
                e.to_string(),
                &request_id,
            );
        }
    };

    if let Some(msg) = validate(&req) {
        tracing::warn!(request_id=%request_id, reason=%msg, "invalid qod session body");
        return error_response(
            StatusCode::BAD_REQUEST,
            "malformed_inbound_body",
            None,
            msg,
            &request_id,
        );
    }

    let span = tracing::info_span!("qod_session", request_id = %request_id);
    match st.sessions.create_session(req).instrument(span).await {
        Ok(accepted) => {
            st.metrics.record_outcome(accepted.outcome);
            (StatusCode::CREATED, Json(accepted.request)).into_response()
        }
        Err(e) => {
            st.metrics.record_error(&e);
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
            error_response(
                status,
                e.kind(),
                Some(e.stage().as_str()),
                e.to_string(),
                &request_id,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use nef_qod::{PolicyCatalog, QodConfig, QodSessionService, RegistryConfig};

    use super::*;
    use crate::metrics::Metrics;

    const BODY: &str = r#"{"device":{"networkAccessIdentifier":"user@example.com"},"applicationServer":{"ipv4Address":"203.0.113.5"},"duration":3600,"qosProfile":"QOS_E"}"#;

    fn make_state(registry_url: String, pcf_url: Option<String>) -> AppState {
        let config = QodConfig {
            registry: RegistryConfig {
                base_url: registry_url,
                consumer_id: "c49c146d-65d8-4c00-b627-73ccf62ecd47".to_string(),
                target_service: "npcf-policyauthorization".to_string(),
            },
            policy_control_url: pcf_url,
            notification_uri: "http://nef/qod/v1/notifications".to_string(),
            catalog: PolicyCatalog::default(),
        };
        AppState {
            sessions: Arc::new(QodSessionService::from_config(&config).unwrap()),
            metrics: Arc::new(Metrics::default()),
        }
    }

    async fn post_session(st: AppState, body: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/qod/v1/sessions")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = crate::build_router(st).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_forwarding_disabled_returns_request_verbatim() {
        let st = make_state("http://127.0.0.1:9".to_string(), None);
        let metrics = st.metrics.clone();

        let (status, body) = post_session(st, BODY).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, serde_json::from_str::<serde_json::Value>(BODY).unwrap());
        assert_eq!(metrics.sessions_forward_skipped_total.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.status_2xx.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_forwarded_returns_request_verbatim() {
        let registry = MockServer::start().await;
        let pcf = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc123"})),
            )
            .mount(&registry)
            .await;
        Mock::given(method("POST"))
            .and(path("/app-sessions"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&pcf)
            .await;

        let st = make_state(registry.uri(), Some(format!("{}/app-sessions", pcf.uri())));
        let (status, body) = post_session(st, BODY).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, serde_json::from_str::<serde_json::Value>(BODY).unwrap());
    }

    #[tokio::test]
    async fn test_registry_unauthorized_is_internal_error() {
        let registry = MockServer::start().await;
        let pcf = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&registry)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&pcf)
            .await;

        let st = make_state(registry.uri(), Some(format!("{}/app-sessions", pcf.uri())));
        let metrics = st.metrics.clone();
        let (status, body) = post_session(st, BODY).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["type"], "token_acquisition_failed");
        assert_eq!(body["error"]["stage"], "token");
        assert!(body["error"]["request_id"].as_str().unwrap().starts_with("req_"));
        assert_eq!(metrics.token_failures_total.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_upstream_rejection_status_passes_through() {
        let registry = MockServer::start().await;
        let pcf = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
            .mount(&registry)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&pcf)
            .await;

        let st = make_state(registry.uri(), Some(format!("{}/app-sessions", pcf.uri())));
        let (status, body) = post_session(st, BODY).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["type"], "upstream_rejected");
        assert_eq!(body["error"]["stage"], "forward");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let st = make_state("http://127.0.0.1:9".to_string(), None);
        let (status, body) = post_session(st, "{\"device\":").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "malformed_inbound_body");
        assert!(body["error"]["stage"].is_null());
    }

    #[tokio::test]
    async fn test_unordered_port_range_is_bad_request() {
        let st = make_state("http://127.0.0.1:9".to_string(), None);
        let raw = r#"{"device":{"networkAccessIdentifier":"user@example.com"},"applicationServer":{"ipv4Address":"203.0.113.5"},"devicePorts":{"ranges":[{"from":9000,"to":8000}]},"duration":3600,"qosProfile":"QOS_E"}"#;
        let (status, body) = post_session(st, raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("9000-8000"));
    }

    #[tokio::test]
    async fn test_missing_server_address_is_bad_request() {
        let st = make_state("http://127.0.0.1:9".to_string(), None);
        let raw = r#"{"device":{"networkAccessIdentifier":"user@example.com"},"applicationServer":{},"duration":3600,"qosProfile":"QOS_E"}"#;
        let (status, _) = post_session(st, raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
