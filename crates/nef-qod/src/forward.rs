use std::time::Duration;

use nef_common::SmPolicyContextData;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::error::QodError;

/// Upper bound for one forwarding call, independent of the caller's deadline.
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(10);

// A connect timeout reports both `is_connect` and `is_timeout`; it belongs to "connect".
fn classify_reqwest_error(error: &reqwest::Error) -> &'static str {
    if error.is_connect() {
        return "connect";
    }
    if error.is_timeout() {
        return "timeout";
    }
    "other"
}

/// Posts policy contexts to the policy-control application-session endpoint.
///
/// The client must not follow redirects: any status >= 300 is a rejection.
#[derive(Debug, Clone)]
pub struct PolicyControlClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl PolicyControlClient {
    pub fn new(http: reqwest::Client, endpoint: String) -> Self {
        Self {
            http,
            endpoint,
            timeout: FORWARD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn create_app_session(
        &self,
        token: &str,
        ctx: &SmPolicyContextData,
    ) -> Result<(), QodError> {
        let payload = serde_json::to_vec(ctx).map_err(QodError::PayloadSerializationFailed)?;

        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            QodError::RequestConstructionFailed(format!("invalid endpoint '{}': {e}", self.endpoint))
        })?;

        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    return QodError::RequestConstructionFailed(e.to_string());
                }
                match classify_reqwest_error(&e) {
                    "timeout" => QodError::UpstreamTimeout {
                        timeout: self.timeout,
                    },
                    kind => QodError::UpstreamUnreachable {
                        kind,
                        message: e.to_string(),
                    },
                }
            })?;

        let status = resp.status();
        if status.as_u16() >= 300 {
            let body = resp.text().await.unwrap_or_default();
            return Err(QodError::UpstreamRejected {
                status: status.as_u16(),
                body,
            });
        }

        // Drain so the connection goes back to the pool.
        let _ = resp.bytes().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nef_common::{AccessType, PduSessionType, Snssai};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn make_http() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    fn make_ctx() -> SmPolicyContextData {
        SmPolicyContextData::new(
            "user@example.com".to_string(),
            10,
            "internet".to_string(),
            Snssai {
                sst: 1,
                sd: Some("010203".to_string()),
            },
            "http://nef/notify".to_string(),
            PduSessionType::Ipv4v6,
            AccessType::ThreeGppAccess,
        )
    }

    fn app_sessions_url(server: &MockServer) -> String {
        format!("{}/npcf-policyauthorization/v1/app-sessions", server.uri())
    }

    #[tokio::test]
    async fn test_created_is_success() {
        let server = MockServer::start().await;
        let ctx = make_ctx();
        Mock::given(method("POST"))
            .and(path("/npcf-policyauthorization/v1/app-sessions"))
            .and(header("authorization", "Bearer abc123"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::to_value(&ctx).unwrap()))
            .respond_with(ResponseTemplate::new(201).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = PolicyControlClient::new(make_http(), app_sessions_url(&server));
        client.create_app_session("abc123", &ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejection_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("policy denied"))
            .mount(&server)
            .await;

        let client = PolicyControlClient::new(make_http(), app_sessions_url(&server));
        match client.create_app_session("t", &make_ctx()).await {
            Err(QodError::UpstreamRejected { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "policy denied");
            }
            other => panic!("expected UpstreamRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_redirect_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(307).insert_header("location", "http://elsewhere/"))
            .mount(&server)
            .await;

        let client = PolicyControlClient::new(make_http(), app_sessions_url(&server));
        let err = client.create_app_session("t", &make_ctx()).await.unwrap_err();
        assert_eq!(err.status_code(), 307);
    }

    #[tokio::test]
    async fn test_deadline_exceeded_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = PolicyControlClient::new(make_http(), app_sessions_url(&server))
            .with_timeout(Duration::from_millis(200));
        let err = client.create_app_session("t", &make_ctx()).await.unwrap_err();
        assert!(matches!(err, QodError::UpstreamTimeout { .. }), "{err:?}");
        assert_eq!(err.status_code(), 502);
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PolicyControlClient::new(make_http(), format!("http://{addr}/app-sessions"));
        let err = client.create_app_session("t", &make_ctx()).await.unwrap_err();
        match err {
            QodError::UpstreamUnreachable { kind, .. } => assert_eq!(kind, "connect"),
            other => panic!("expected UpstreamUnreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connect_timeout_is_unreachable_not_deadline() {
        // Unroutable address: the TCP handshake never completes.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(50))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        let client = PolicyControlClient::new(http, "http://10.255.255.1/app-sessions".to_string());
        let err = client.create_app_session("t", &make_ctx()).await.unwrap_err();
        match &err {
            QodError::UpstreamUnreachable { kind, .. } => assert_eq!(*kind, "connect"),
            other => panic!("expected UpstreamUnreachable, got {other:?}"),
        }
        assert_eq!(err.status_code(), 502);
        assert!(!err.to_string().contains("after 10s"), "{err}");
    }

    #[tokio::test]
    async fn test_malformed_endpoint_is_construction_error() {
        let client = PolicyControlClient::new(make_http(), "not a url".to_string());
        let err = client.create_app_session("t", &make_ctx()).await.unwrap_err();
        assert!(matches!(err, QodError::RequestConstructionFailed(_)), "{err:?}");
        assert_eq!(err.status_code(), 500);
    }
}
