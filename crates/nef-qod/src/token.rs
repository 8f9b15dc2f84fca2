use std::time::Duration;

use async_trait::async_trait;
use nef_common::AccessTokenResponse;
use reqwest::header::ACCEPT;

use crate::error::TokenError;

/// Upper bound for one token exchange.
pub const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

const TARGET_NF_TYPE: &str = "PCF";
const REQUESTER_NF_TYPE: &str = "SMF";

/// Hands out a bearer token for the policy-control service.
///
/// Every call performs a fresh exchange; a caching source would wrap an
/// implementation of this trait rather than change it.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<AccessTokenResponse, TokenError>;
}

/// OAuth2 client-credentials exchange against the registry (NRF).
#[derive(Debug, Clone)]
pub struct NrfTokenClient {
    http: reqwest::Client,
    token_url: String,
    consumer_id: String,
    target_service: String,
    timeout: Duration,
}

impl NrfTokenClient {
    pub fn new(
        http: reqwest::Client,
        registry_base_url: &str,
        consumer_id: String,
        target_service: String,
    ) -> Self {
        let base = registry_base_url.trim_end_matches('/');
        Self {
            http,
            token_url: format!("{base}/oauth2/token"),
            consumer_id,
            target_service,
            timeout: TOKEN_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl AccessTokenSource for NrfTokenClient {
    async fn access_token(&self) -> Result<AccessTokenResponse, TokenError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("nfInstanceId", self.consumer_id.as_str()),
            ("targetNfType", TARGET_NF_TYPE),
            ("nfType", REQUESTER_NF_TYPE),
            ("scope", self.target_service.as_str()),
        ];

        let timeout = self.timeout;
        let to_error = |e: reqwest::Error| {
            if !e.is_connect() && e.is_timeout() {
                TokenError::Timeout { timeout }
            } else {
                TokenError::Transport(e)
            }
        };

        let resp = self
            .http
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .form(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(to_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(to_error)?;

        if !status.is_success() {
            return Err(TokenError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let token: AccessTokenResponse = serde_json::from_str(&body).map_err(TokenError::Decode)?;
        if token.access_token.is_empty() {
            return Err(TokenError::EmptyToken);
        }

        tracing::debug!(
            token_len = token.access_token.len(),
            expires_in = ?token.expires_in,
            scope = ?token.scope,
            "access token issued"
        );
        Ok(token)
    }
}
