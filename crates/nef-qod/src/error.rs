use std::time::Duration;

use thiserror::Error;

/// Why the registry did not hand out a usable access token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("registry request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("registry request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("registry responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("registry response is not valid token JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("registry response carries no access_token")]
    EmptyToken,
}

/// Pipeline stage at which an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Token,
    Translate,
    Forward,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Token => "token",
            Stage::Translate => "translate",
            Stage::Forward => "forward",
        }
    }
}

#[derive(Debug, Error)]
pub enum QodError {
    #[error("token acquisition failed: {0}")]
    TokenAcquisitionFailed(#[from] TokenError),

    /// Reserved: the translator is currently total.
    #[error("translation failed: {0}")]
    TranslationFailed(String),

    #[error("failed to serialize policy context: {0}")]
    PayloadSerializationFailed(#[source] serde_json::Error),

    #[error("failed to build policy control request: {0}")]
    RequestConstructionFailed(String),

    #[error("policy control request timed out after {timeout:?}")]
    UpstreamTimeout { timeout: Duration },

    #[error("policy control unreachable ({kind}): {message}")]
    UpstreamUnreachable { kind: &'static str, message: String },

    #[error("policy control rejected the session with status {status}: {body}")]
    UpstreamRejected { status: u16, body: String },
}

impl QodError {
    /// HTTP status reported to the caller of the invocation.
    pub fn status_code(&self) -> u16 {
        match self {
            QodError::TokenAcquisitionFailed(_)
            | QodError::TranslationFailed(_)
            | QodError::PayloadSerializationFailed(_)
            | QodError::RequestConstructionFailed(_) => 500,
            QodError::UpstreamTimeout { .. } | QodError::UpstreamUnreachable { .. } => 502,
            QodError::UpstreamRejected { status, .. } => *status,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            QodError::TokenAcquisitionFailed(_) => "token_acquisition_failed",
            QodError::TranslationFailed(_) => "translation_failed",
            QodError::PayloadSerializationFailed(_) => "payload_serialization_failed",
            QodError::RequestConstructionFailed(_) => "request_construction_failed",
            QodError::UpstreamTimeout { .. } => "upstream_timeout",
            QodError::UpstreamUnreachable { .. } => "upstream_unreachable",
            QodError::UpstreamRejected { .. } => "upstream_rejected",
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            QodError::TokenAcquisitionFailed(_) => Stage::Token,
            QodError::TranslationFailed(_) => Stage::Translate,
            _ => Stage::Forward,
        }
    }
}
