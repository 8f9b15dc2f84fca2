use std::sync::Arc;
use std::time::Duration;

use nef_common::QodSessionRequest;

use crate::config::QodConfig;
use crate::error::QodError;
use crate::forward::PolicyControlClient;
use crate::token::{AccessTokenSource, NrfTokenClient};
use crate::translate::RequestTranslator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// No policy-control endpoint is configured.
    ForwardingDisabled,
    Forwarded,
}

/// Successful invocation. The caller gets its own request back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub request: QodSessionRequest,
    pub outcome: SessionOutcome,
}

/// Token source plus policy-control client; present only when forwarding is enabled.
#[derive(Clone)]
pub struct Forwarder {
    pub tokens: Arc<dyn AccessTokenSource>,
    pub client: PolicyControlClient,
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("endpoint", &self.client.endpoint())
            .finish()
    }
}

/// Entry point for "create QoD session". Holds no per-invocation state, so one
/// instance serves any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct QodSessionService {
    translator: RequestTranslator,
    forwarder: Option<Forwarder>,
}

impl QodSessionService {
    pub fn new(translator: RequestTranslator, forwarder: Option<Forwarder>) -> Self {
        Self {
            translator,
            forwarder,
        }
    }

    pub fn from_config(config: &QodConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let translator =
            RequestTranslator::new(config.catalog.clone(), config.notification_uri.clone());

        let forwarder = config.policy_control_url.clone().map(|endpoint| {
            let tokens = NrfTokenClient::new(
                http.clone(),
                &config.registry.base_url,
                config.registry.consumer_id.clone(),
                config.registry.target_service.clone(),
            );
            Forwarder {
                tokens: Arc::new(tokens),
                client: PolicyControlClient::new(http.clone(), endpoint),
            }
        });

        Ok(Self::new(translator, forwarder))
    }

    pub fn forwarding_enabled(&self) -> bool {
        self.forwarder.is_some()
    }

    pub async fn create_session(&self, req: QodSessionRequest) -> Result<Accepted, QodError> {
        tracing::info!(
            supi = %req.device.network_access_identifier,
            qos_profile = %req.qos_profile,
            duration = req.duration,
            "qod session received"
        );

        let Some(forwarder) = self.forwarder.as_ref() else {
            tracing::warn!("policy control endpoint not set; skipping forward");
            return Ok(Accepted {
                request: req,
                outcome: SessionOutcome::ForwardingDisabled,
            });
        };

        let token = forwarder.tokens.access_token().await.map_err(|e| {
            tracing::error!(error = %e, "failed to obtain access token");
            QodError::from(e)
        })?;
        tracing::debug!(token_len = token.access_token.len(), "access token acquired");

        let ctx = self.translator.translate(&req);
        tracing::debug!(pdu_session_id = ctx.pdu_session_id, dnn = %ctx.dnn, "policy context built");

        if let Err(e) = forwarder
            .client
            .create_app_session(&token.access_token, &ctx)
            .await
        {
            tracing::error!(
                error = %e,
                kind = e.kind(),
                status = e.status_code(),
                endpoint = %forwarder.client.endpoint(),
                "policy control forward failed"
            );
            return Err(e);
        }

        tracing::info!(endpoint = %forwarder.client.endpoint(), "qod session forwarded");
        Ok(Accepted {
            request: req,
            outcome: SessionOutcome::Forwarded,
        })
    }
}
